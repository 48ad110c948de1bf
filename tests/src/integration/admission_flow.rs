//! # Admission Flow
//!
//! Submit -> topic manager (am-03) -> lookup index (am-04) -> lookup, over
//! the node's overlay host.

#[cfg(test)]
mod tests {
    use am_04_lookup_service::AdvertisementStorage;
    use chrono::Duration;
    use serde_json::json;
    use shared_types::{
        LookupAnswer, LookupQuestion, LookupResponse, Txid, UtxoReference,
        ADVERTISEMENT_LOOKUP_SERVICE, ADVERTISEMENT_TOPIC,
    };

    use crate::fixtures::*;

    fn topics() -> Vec<String> {
        vec![ADVERTISEMENT_TOPIC.to_string()]
    }

    fn question(query: serde_json::Value) -> LookupQuestion {
        LookupQuestion::new(ADVERTISEMENT_LOOKUP_SERVICE, query)
    }

    fn output_list(response: LookupResponse) -> Vec<(Txid, u32, Vec<u8>)> {
        match response {
            LookupResponse::Answer(LookupAnswer::OutputList { outputs }) => outputs
                .into_iter()
                .map(|o| (o.txid, o.output_index, o.beef))
                .collect(),
            other => panic!("expected an output list, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_admitted_advertisement_is_found_by_every_query() {
        let node = TestNode::new();
        let host = &node.node.host;
        let token = advertisement("02sponsor", 10);
        let tx = transaction(Txid([1; 32]), vec![p2pkh_like_script(), advertisement_script(&token)]);
        let bundle = beef(&tx);

        let steak = host.submit(&bundle, &topics()).await.unwrap();
        assert_eq!(steak[ADVERTISEMENT_TOPIC].outputs_to_admit, vec![1]);
        assert!(steak[ADVERTISEMENT_TOPIC].coins_to_retain.is_empty());

        let all = output_list(host.lookup(&question(json!({"findAll": true}))).await.unwrap());
        assert_eq!(all, vec![(tx.id(), 1, bundle)]);

        let expected = LookupResponse::Formula(vec![UtxoReference::new(tx.id(), 1)]);
        let by_id = host
            .lookup(&question(json!({"ids": [tx.id().to_hex()]})))
            .await
            .unwrap();
        assert_eq!(by_id, expected);

        let by_sponsor = host
            .lookup(&question(json!({"publicKey": "02sponsor"})))
            .await
            .unwrap();
        assert_eq!(by_sponsor, expected);

        let record = host
            .lookup_service()
            .storage()
            .find_by_txid(&tx.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.title, token.title);
        assert_eq!(record.reward_per_answer, 100);
    }

    #[tokio::test]
    async fn test_atomic_bundle_is_admitted() {
        let node = TestNode::new();
        let tx = transaction(Txid([2; 32]), vec![advertisement_script(&advertisement("02s", 3))]);

        let steak = node.node.host.submit(&atomic_beef(&tx), &topics()).await.unwrap();
        assert_eq!(steak[ADVERTISEMENT_TOPIC].outputs_to_admit, vec![0]);
    }

    #[tokio::test]
    async fn test_foreign_marker_is_neither_admitted_nor_indexed() {
        let node = TestNode::new();
        let host = &node.node.host;
        let token = advertisement("02sponsor", 10);
        let tx = transaction(Txid([3; 32]), vec![foreign_marker_script(&token)]);

        let steak = host.submit(&beef(&tx), &topics()).await.unwrap();
        assert!(steak[ADVERTISEMENT_TOPIC].outputs_to_admit.is_empty());

        let all = host.lookup(&question(json!({"findAll": true}))).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_short_token_is_admitted_but_not_indexed() {
        let node = TestNode::new();
        let host = &node.node.host;
        let fields = advertisement("02sponsor", 10).to_fields();
        let tx = transaction(Txid([4; 32]), vec![pushdrop_script(&fields[..5])]);

        let steak = host.submit(&beef(&tx), &topics()).await.unwrap();
        assert_eq!(steak[ADVERTISEMENT_TOPIC].outputs_to_admit, vec![0]);

        let all = host.lookup(&question(json!({"findAll": true}))).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_expired_advertisement_drops_out_of_lookups() {
        let node = TestNode::new();
        let host = &node.node.host;
        let tx = transaction(Txid([5; 32]), vec![advertisement_script(&advertisement("02s", 2))]);
        host.submit(&beef(&tx), &topics()).await.unwrap();
        assert_eq!(host.lookup(&question(json!({"findAll": true}))).await.unwrap().len(), 1);

        node.clock.advance(Duration::days(2));
        assert!(host.lookup(&question(json!({"findAll": true}))).await.unwrap().is_empty());
        assert!(host
            .lookup(&question(json!({"publicKey": "02s"})))
            .await
            .unwrap()
            .is_empty());

        let expired = host.lookup_service().storage().expired_ads().await.unwrap();
        assert_eq!(expired.len(), 1);
    }

    #[tokio::test]
    async fn test_resubmission_keeps_a_single_record() {
        let node = TestNode::new();
        let host = &node.node.host;
        let tx = transaction(Txid([6; 32]), vec![advertisement_script(&advertisement("02s", 9))]);

        host.submit(&beef(&tx), &topics()).await.unwrap();
        host.submit(&beef(&tx), &topics()).await.unwrap();

        let all = host.lookup(&question(json!({"findAll": true}))).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_legacy_zero_output_index() {
        let mut config = test_config();
        config.lookup.legacy_zero_output_index = true;
        let node = TestNode::with_config(config);
        let host = &node.node.host;
        let tx = transaction(
            Txid([7; 32]),
            vec![
                p2pkh_like_script(),
                advertisement_script(&advertisement("02s", 9)),
                advertisement_script(&advertisement("02s", 4)),
            ],
        );

        let steak = host.submit(&beef(&tx), &topics()).await.unwrap();
        assert_eq!(steak[ADVERTISEMENT_TOPIC].outputs_to_admit, vec![1, 2]);

        let by_id = host
            .lookup(&question(json!({"ids": [tx.id().to_hex()]})))
            .await
            .unwrap();
        assert_eq!(
            by_id,
            LookupResponse::Formula(vec![
                UtxoReference::new(tx.id(), 0),
                UtxoReference::new(tx.id(), 0),
            ])
        );
    }

    #[tokio::test]
    async fn test_lookup_contract_errors() {
        let node = TestNode::new();
        let host = &node.node.host;

        let wrong_service = LookupQuestion::new("ls_other", json!({"findAll": true}));
        assert!(host.lookup(&wrong_service).await.is_err());

        let no_query = LookupQuestion {
            service: ADVERTISEMENT_LOOKUP_SERVICE.to_string(),
            query: None,
        };
        assert!(host.lookup(&no_query).await.is_err());

        assert!(host.lookup(&question(json!({"findAll": false}))).await.is_err());
    }
}
