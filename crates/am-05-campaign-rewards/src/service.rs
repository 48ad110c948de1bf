//! # Campaign Service
//!
//! Funding intake and the quiz reward flow, over the store and wallet ports.

use am_01_transaction_bundle::Transaction;
use shared_types::TimeSource;
use tracing::{info, warn};

use crate::domain::entities::{Campaign, FundingRecord, PayoutRecord};
use crate::domain::errors::CampaignError;
use crate::domain::keys::{p2pkh_locking_script, random_campaign_id, random_derivation_id};
use crate::domain::requests::{
    CreateCampaignRequest, CreateCampaignResponse, FundCampaignRequest, FundCampaignResponse,
    RewardPayment, SubmitAnswersRequest,
};
use crate::domain::scoring::count_correct_answers;
use crate::domain::wallet::{
    ActionOptions, ActionOutput, CreateActionArgs, GetPublicKeyArgs, CAMPAIGN_FUNDING_BASKET,
};
use crate::ports::outbound::{CampaignStore, WalletClient};

pub struct CampaignService<S, W, TS> {
    store: S,
    wallet: W,
    time_source: TS,
    /// Compressed public key of the server, hex.
    sender_identity_key: String,
}

impl<S, W, TS> CampaignService<S, W, TS>
where
    S: CampaignStore,
    W: WalletClient,
    TS: TimeSource,
{
    pub fn new(store: S, wallet: W, time_source: TS, sender_identity_key: String) -> Self {
        Self {
            store,
            wallet,
            time_source,
            sender_identity_key,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sender_identity_key(&self) -> &str {
        &self.sender_identity_key
    }

    pub async fn fund(&self, request: FundCampaignRequest) -> Result<FundCampaignResponse, CampaignError> {
        let record = request.into_record(self.time_source.now())?;
        let response = FundCampaignResponse {
            success: true,
            message: "Campaign funded successfully".to_string(),
            satoshis_balance: record.satoshis_balance,
            reward_per_answer: record.reward_per_answer,
        };

        info!(
            campaign_id = %record.campaign_id,
            balance = record.satoshis_balance,
            "[am-05] Storing campaign funding"
        );
        self.store.store_funding(record).await?;
        Ok(response)
    }

    pub async fn funding_records(&self, ids: &[String]) -> Result<Vec<FundingRecord>, CampaignError> {
        Ok(self.store.funding_records_by_ids(ids).await?)
    }

    pub async fn funded_ads(&self) -> Result<Vec<String>, CampaignError> {
        Ok(self.store.funded_ads().await?)
    }

    /// Store a draft campaign and request its funding from the wallet.
    ///
    /// The funding output pays the server identity key. The draft stays
    /// stored if the payment request fails.
    pub async fn create_campaign(
        &self,
        request: CreateCampaignRequest,
    ) -> Result<CreateCampaignResponse, CampaignError> {
        let campaign = request.into_draft(random_campaign_id(), self.time_source.now())?;
        let campaign_id = campaign.id.clone();
        let media_id = campaign.media_id.clone();
        let advertiser_id = campaign.advertiser_id.clone();
        let total_funded = campaign.total_funded;

        self.store.create_campaign(campaign).await?;
        info!(
            campaign_id = %campaign_id,
            advertiser_id = %advertiser_id,
            total_funded,
            "[am-05] Created draft campaign"
        );

        let locking_script = p2pkh_locking_script(&self.sender_identity_key)?;
        let output_description = serde_json::json!({
            "type": CAMPAIGN_FUNDING_BASKET,
            "campaignId": campaign_id,
            "advertiserId": advertiser_id,
        });
        let payment_request = self
            .wallet
            .create_action(CreateActionArgs {
                description: format!("Campaign funding for media {media_id}"),
                outputs: vec![ActionOutput {
                    satoshis: total_funded,
                    locking_script: locking_script.to_hex(),
                    custom_instructions: None,
                    output_description: output_description.to_string(),
                    basket: Some(CAMPAIGN_FUNDING_BASKET.to_string()),
                }],
                options: ActionOptions::default(),
            })
            .await?;

        Ok(CreateCampaignResponse {
            campaign_id,
            payment_request,
        })
    }

    pub async fn advertiser_campaigns(&self, advertiser_id: &str) -> Result<Vec<Campaign>, CampaignError> {
        Ok(self.store.advertiser_campaigns(advertiser_id).await?)
    }

    /// Score a viewer's answers and pay the reward.
    pub async fn submit_answers(&self, request: SubmitAnswersRequest) -> Result<RewardPayment, CampaignError> {
        let (ad_id, answers, public_key) = match (request.ad_id, request.answers, request.public_key) {
            (Some(ad_id), Some(answers), Some(public_key)) if !ad_id.is_empty() && !public_key.is_empty() => {
                (ad_id, answers, public_key)
            }
            _ => return Err(CampaignError::MissingField("required fields")),
        };

        if self.store.has_submitted_answers(&ad_id, &public_key).await? {
            return Err(CampaignError::AlreadySubmitted);
        }

        let funding = self
            .store
            .campaign_funding(&ad_id)
            .await?
            .ok_or_else(|| CampaignError::FundingNotFound(ad_id.clone()))?;

        if answers.len() != funding.answers.len() {
            return Err(CampaignError::AnswerCountMismatch {
                expected: funding.answers.len(),
                actual: answers.len(),
            });
        }

        let correct_answers = count_correct_answers(&answers, &funding.answers);
        let reward = funding.reward_per_answer.saturating_mul(correct_answers as u64);
        if reward > funding.satoshis_balance {
            return Err(CampaignError::InsufficientBalance {
                reward,
                balance: funding.satoshis_balance,
            });
        }

        let derivation_prefix = random_derivation_id();
        let derivation_suffix = random_derivation_id();
        let derived_key = self
            .wallet
            .get_public_key(GetPublicKeyArgs::reward_key(
                &derivation_prefix,
                &derivation_suffix,
                &public_key,
            ))
            .await?;
        let locking_script = p2pkh_locking_script(&derived_key)?;

        let custom_instructions = serde_json::json!({
            "derivationPrefix": derivation_prefix,
            "derivationSuffix": derivation_suffix,
            "payee": self.sender_identity_key,
        });
        let result = self
            .wallet
            .create_action(CreateActionArgs {
                description: format!("Advertisement quiz reward for user: {public_key}"),
                outputs: vec![ActionOutput {
                    satoshis: reward,
                    locking_script: locking_script.to_hex(),
                    custom_instructions: Some(custom_instructions.to_string()),
                    output_description: "Advertisement quiz reward".to_string(),
                    basket: None,
                }],
                options: ActionOptions {
                    randomize_outputs: false,
                },
            })
            .await?;
        let transaction = result.tx.ok_or(CampaignError::MissingTransaction)?;
        let txid = Transaction::from_beef(&transaction)?.id();

        // Two independent writes; a failure between them leaves the balance
        // reduced without a payout record.
        self.store
            .update_campaign_balance(&ad_id, funding.satoshis_balance - reward)
            .await?;
        if let Err(e) = self
            .store
            .store_payout(PayoutRecord {
                ad_id: ad_id.clone(),
                public_key: public_key.clone(),
                correct_answers,
                reward,
                txid: txid.to_hex(),
                created_at: self.time_source.now(),
            })
            .await
        {
            warn!("[am-05] Balance of {} reduced but payout not recorded: {}", ad_id, e);
            return Err(e.into());
        }

        info!(
            ad_id = %ad_id,
            txid = %txid,
            correct_answers,
            reward,
            "[am-05] Paid quiz reward"
        );

        Ok(RewardPayment {
            transaction,
            derivation_prefix,
            derivation_suffix,
            amount: reward,
            sender_identity_key: self.sender_identity_key.clone(),
            correct_answers,
        })
    }
}
