//! # Request and Response Bodies
//!
//! Request fields are optional on the wire so that a missing field is
//! reported by name rather than as a generic decode failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Satoshis;

use crate::domain::entities::{Campaign, CampaignQuestion, CampaignStatus, FundingRecord};
use crate::domain::errors::CampaignError;
use crate::domain::wallet::CreateActionResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCampaignRequest {
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<String>>,
    #[serde(default)]
    pub answers: Option<Vec<String>>,
    #[serde(default)]
    pub satoshis_balance: Option<Satoshis>,
    #[serde(default)]
    pub reward_per_answer: Option<Satoshis>,
}

impl FundCampaignRequest {
    /// Validate and turn into a new funding record with an empty txid.
    ///
    /// Zero amounts and empty campaign ids count as missing.
    pub fn into_record(self, created_at: DateTime<Utc>) -> Result<FundingRecord, CampaignError> {
        let campaign_id = self
            .campaign_id
            .filter(|id| !id.is_empty())
            .ok_or(CampaignError::MissingField("campaignId"))?;
        let questions = self.questions.ok_or(CampaignError::MissingField("questions array"))?;
        let answers = self.answers.ok_or(CampaignError::MissingField("answers array"))?;
        let satoshis_balance = self
            .satoshis_balance
            .filter(|&v| v > 0)
            .ok_or(CampaignError::MissingField("satoshisBalance"))?;
        let reward_per_answer = self
            .reward_per_answer
            .filter(|&v| v > 0)
            .ok_or(CampaignError::MissingField("rewardPerAnswer"))?;

        if questions.len() != answers.len() {
            return Err(CampaignError::LengthMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }

        Ok(FundingRecord {
            campaign_id,
            questions,
            answers,
            satoshis_balance,
            reward_per_answer,
            txid: String::new(),
            created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCampaignResponse {
    pub success: bool,
    pub message: String,
    pub satoshis_balance: Satoshis,
    pub reward_per_answer: Satoshis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub media_id: Option<String>,
    #[serde(default)]
    pub advertiser_id: Option<String>,
    #[serde(default)]
    pub reward_per_answer: Option<Satoshis>,
    #[serde(default)]
    pub total_funded: Option<Satoshis>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Option<Vec<CampaignQuestion>>,
}

impl CreateCampaignRequest {
    /// Validate and turn into a draft whose whole funding is still unspent.
    pub fn into_draft(self, id: String, now: DateTime<Utc>) -> Result<Campaign, CampaignError> {
        let media_id = self
            .media_id
            .filter(|v| !v.is_empty())
            .ok_or(CampaignError::MissingField("mediaId"))?;
        let advertiser_id = self
            .advertiser_id
            .filter(|v| !v.is_empty())
            .ok_or(CampaignError::MissingField("advertiserId"))?;
        let reward_per_answer = self
            .reward_per_answer
            .filter(|&v| v > 0)
            .ok_or(CampaignError::MissingField("rewardPerAnswer"))?;
        let total_funded = self
            .total_funded
            .filter(|&v| v > 0)
            .ok_or(CampaignError::MissingField("totalFunded"))?;
        let start_date = self.start_date.ok_or(CampaignError::MissingField("startDate"))?;
        let end_date = self.end_date.ok_or(CampaignError::MissingField("endDate"))?;
        let questions = self.questions.ok_or(CampaignError::MissingField("questions array"))?;

        if end_date <= start_date {
            return Err(CampaignError::InvalidSchedule);
        }

        Ok(Campaign {
            id,
            media_id,
            advertiser_id,
            reward_per_answer,
            total_funded,
            remaining_balance: total_funded,
            start_date,
            end_date,
            status: CampaignStatus::Draft,
            questions,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignResponse {
    pub campaign_id: String,
    /// The wallet's answer to the funding payment request.
    pub payment_request: CreateActionResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    pub ad_id: Option<String>,
    #[serde(default)]
    pub answers: Option<Vec<String>>,
    #[serde(default)]
    pub public_key: Option<String>,
}

/// What the viewer needs to recognise and spend the reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPayment {
    /// Atomic BEEF of the payment transaction.
    pub transaction: Vec<u8>,
    pub derivation_prefix: String,
    pub derivation_suffix: String,
    pub amount: Satoshis,
    pub sender_identity_key: String,
    pub correct_answers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> FundCampaignRequest {
        serde_json::from_value(json!({
            "campaignId": "ab12",
            "questions": ["Colour of the car?", "Brand?"],
            "answers": ["red", "Acme"],
            "satoshisBalance": 1000,
            "rewardPerAnswer": 10
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_becomes_record() {
        let now = Utc::now();
        let record = request().into_record(now).unwrap();
        assert_eq!(record.campaign_id, "ab12");
        assert_eq!(record.satoshis_balance, 1000);
        assert!(record.txid.is_empty());
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_missing_fields_are_named() {
        let cases: Vec<(fn(&mut FundCampaignRequest), &str)> = vec![
            (|r| r.campaign_id = None, "campaignId"),
            (|r| r.questions = None, "questions array"),
            (|r| r.answers = None, "answers array"),
            (|r| r.satoshis_balance = Some(0), "satoshisBalance"),
            (|r| r.reward_per_answer = None, "rewardPerAnswer"),
        ];
        for (mutate, field) in cases {
            let mut req = request();
            mutate(&mut req);
            match req.into_record(Utc::now()) {
                Err(CampaignError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("expected missing {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_length_mismatch() {
        let mut req = request();
        req.answers = Some(vec!["red".into()]);
        assert!(matches!(
            req.into_record(Utc::now()),
            Err(CampaignError::LengthMismatch {
                questions: 2,
                answers: 1
            })
        ));
    }

    #[test]
    fn test_non_numeric_balance_is_rejected_by_decoding() {
        let parsed: Result<FundCampaignRequest, _> =
            serde_json::from_value(json!({"campaignId": "x", "satoshisBalance": "lots"}));
        assert!(parsed.is_err());
    }

    fn draft_request() -> CreateCampaignRequest {
        serde_json::from_value(json!({
            "mediaId": "m-1",
            "advertiserId": "adv-1",
            "rewardPerAnswer": 5,
            "totalFunded": 500,
            "startDate": "2030-01-01T00:00:00Z",
            "endDate": "2030-02-01T00:00:00Z",
            "questions": [{"id": "q1", "text": "Colour?", "correctAnswer": "red"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_draft_starts_fully_funded() {
        let now = Utc::now();
        let campaign = draft_request().into_draft("c1".into(), now).unwrap();
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert_eq!(campaign.remaining_balance, 500);
        assert_eq!(campaign.questions[0].correct_answer, "red");
        assert_eq!(campaign.created_at, campaign.updated_at);
        assert_eq!(serde_json::to_value(&campaign).unwrap()["status"], "draft");
    }

    #[test]
    fn test_draft_validation() {
        let mut req = draft_request();
        req.total_funded = Some(0);
        assert!(matches!(
            req.into_draft("c".into(), Utc::now()),
            Err(CampaignError::MissingField("totalFunded"))
        ));

        let mut req = draft_request();
        req.end_date = req.start_date;
        assert!(matches!(
            req.into_draft("c".into(), Utc::now()),
            Err(CampaignError::InvalidSchedule)
        ));

        let bad_date: Result<CreateCampaignRequest, _> =
            serde_json::from_value(json!({"startDate": "next tuesday"}));
        assert!(bad_date.is_err());
    }
}
