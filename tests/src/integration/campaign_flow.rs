//! # Campaign Flow
//!
//! Fund -> submit answers -> wallet payment -> payout record, over the
//! node's campaign service (am-05).

#[cfg(test)]
mod tests {
    use am_01_transaction_bundle::Transaction;
    use am_05_campaign_rewards::{
        p2pkh_locking_script, CampaignError, CampaignStore, FundCampaignRequest,
        SubmitAnswersRequest, REWARD_PROTOCOL_ID,
    };

    use crate::fixtures::*;

    fn funding(campaign_id: &str, balance: u64, reward: u64) -> FundCampaignRequest {
        FundCampaignRequest {
            campaign_id: Some(campaign_id.into()),
            questions: Some(vec![
                "What is roasted?".into(),
                "Where is it grown?".into(),
                "Which day is the sale?".into(),
            ]),
            answers: Some(vec!["Coffee".into(), "Mountains".into(), "Friday".into()]),
            satoshis_balance: Some(balance),
            reward_per_answer: Some(reward),
        }
    }

    fn answers(campaign_id: &str, answers: &[&str], viewer: &str) -> SubmitAnswersRequest {
        SubmitAnswersRequest {
            ad_id: Some(campaign_id.into()),
            answers: Some(answers.iter().map(|a| a.to_string()).collect()),
            public_key: Some(viewer.into()),
        }
    }

    #[tokio::test]
    async fn test_full_reward_flow() {
        let test = TestNode::new();
        let campaigns = &test.node.campaigns;

        let funded = campaigns.fund(funding("ad-42", 1_000, 100)).await.unwrap();
        assert!(funded.success);
        assert_eq!(funded.message, "Campaign funded successfully");
        assert_eq!(campaigns.funded_ads().await.unwrap(), vec!["ad-42"]);

        let payment = campaigns
            .submit_answers(answers("ad-42", &["COFFEE", "mountains", "Monday"], "03viewer"))
            .await
            .unwrap();
        assert_eq!(payment.correct_answers, 2);
        assert_eq!(payment.amount, 200);
        assert_eq!(payment.sender_identity_key, SERVER_IDENTITY_KEY);

        // The wallet was asked for the key shared with the viewer.
        let key_request = test.wallet.key_requests.lock()[0].clone();
        assert_eq!(key_request.protocol_id.1, REWARD_PROTOCOL_ID);
        assert_eq!(key_request.counterparty, "03viewer");
        assert_eq!(
            key_request.key_id,
            format!("{} {}", payment.derivation_prefix, payment.derivation_suffix)
        );

        // ... and paid a P2PKH output to that key.
        let action = test.wallet.actions.lock()[0].clone();
        let expected_script = p2pkh_locking_script(RecordingWallet::DERIVED_KEY).unwrap();
        assert_eq!(action.outputs[0].locking_script, expected_script.to_hex());
        assert_eq!(action.outputs[0].satoshis, 200);

        let paid = Transaction::from_beef(&payment.transaction).unwrap();
        assert_eq!(paid.outputs[0].satoshis, 200);

        let store = campaigns.store();
        let record = store.campaign_funding("ad-42").await.unwrap().unwrap();
        assert_eq!(record.satoshis_balance, 800);
        assert!(store.has_submitted_answers("ad-42", "03viewer").await.unwrap());
    }

    #[tokio::test]
    async fn test_each_viewer_is_paid_once() {
        let test = TestNode::new();
        let campaigns = &test.node.campaigns;
        campaigns.fund(funding("ad-1", 1_000, 10)).await.unwrap();

        campaigns
            .submit_answers(answers("ad-1", &["coffee", "x", "y"], "02alice"))
            .await
            .unwrap();
        let again = campaigns
            .submit_answers(answers("ad-1", &["coffee", "mountains", "friday"], "02alice"))
            .await;
        assert!(matches!(again, Err(CampaignError::AlreadySubmitted)));

        // A different viewer is still welcome.
        let other = campaigns
            .submit_answers(answers("ad-1", &["coffee", "mountains", "friday"], "02bob"))
            .await
            .unwrap();
        assert_eq!(other.amount, 30);

        let record = campaigns.store().campaign_funding("ad-1").await.unwrap().unwrap();
        assert_eq!(record.satoshis_balance, 1_000 - 10 - 30);
    }

    #[tokio::test]
    async fn test_balance_cannot_go_negative() {
        let test = TestNode::new();
        let campaigns = &test.node.campaigns;
        campaigns.fund(funding("ad-1", 150, 100)).await.unwrap();

        let result = campaigns
            .submit_answers(answers("ad-1", &["coffee", "mountains", "no"], "02carol"))
            .await;
        assert!(matches!(
            result,
            Err(CampaignError::InsufficientBalance {
                reward: 200,
                balance: 150
            })
        ));
        assert!(test.wallet.actions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_zero_correct_answers_pays_nothing() {
        let test = TestNode::new();
        let campaigns = &test.node.campaigns;
        campaigns.fund(funding("ad-1", 150, 100)).await.unwrap();

        let payment = campaigns
            .submit_answers(answers("ad-1", &["tea", "sea", "never"], "02dave"))
            .await
            .unwrap();
        assert_eq!(payment.correct_answers, 0);
        assert_eq!(payment.amount, 0);
    }

    #[tokio::test]
    async fn test_funding_validation() {
        let test = TestNode::new();
        let campaigns = &test.node.campaigns;

        let mut request = funding("ad-1", 100, 10);
        request.answers = Some(vec!["only one".into()]);
        assert!(matches!(
            campaigns.fund(request).await,
            Err(CampaignError::LengthMismatch {
                questions: 3,
                answers: 1
            })
        ));

        let mut request = funding("ad-1", 100, 10);
        request.reward_per_answer = None;
        assert!(matches!(
            campaigns.fund(request).await,
            Err(CampaignError::MissingField("rewardPerAnswer"))
        ));

        let unknown = campaigns
            .submit_answers(answers("ad-missing", &["a", "b", "c"], "02erin"))
            .await;
        assert!(matches!(unknown, Err(CampaignError::FundingNotFound(_))));
    }

    #[tokio::test]
    async fn test_funding_records_by_ids() {
        let test = TestNode::new();
        let campaigns = &test.node.campaigns;
        campaigns.fund(funding("ad-1", 100, 10)).await.unwrap();
        campaigns.fund(funding("ad-2", 200, 10)).await.unwrap();

        let records = campaigns
            .funding_records(&["ad-2".into(), "ad-3".into()])
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].campaign_id, "ad-2");
        assert!(records[0].txid.is_empty());
    }
}
