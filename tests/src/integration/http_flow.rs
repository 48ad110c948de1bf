//! # HTTP Flow
//!
//! The overlay and campaign flows driven through the axum router.

#[cfg(test)]
mod tests {
    use ad_node::container::HttpConfig;
    use ad_node::{build_router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use shared_types::{Txid, ADVERTISEMENT_TOPIC};
    use tower::ServiceExt;

    use crate::fixtures::*;

    fn router(test: &TestNode) -> Router {
        build_router(AppState::new(&test.node), &HttpConfig::default())
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_submit_and_lookup_over_http() {
        let test = TestNode::new();
        let router = router(&test);
        let tx = transaction(Txid([8; 32]), vec![advertisement_script(&advertisement("02s", 5))]);

        let submit = Request::post("/submit")
            .header("content-type", "application/octet-stream")
            .header("x-topics", json!([ADVERTISEMENT_TOPIC]).to_string())
            .body(Body::from(beef(&tx)))
            .unwrap();
        let (status, steak) = send(&router, submit).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(steak[ADVERTISEMENT_TOPIC]["outputsToAdmit"], json!([0]));

        let (status, answer) = send(
            &router,
            post_json("/lookup", json!({"service": "ls_advertisement", "query": {"findAll": true}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(answer["type"], "output-list");
        assert_eq!(answer["outputs"][0]["txid"], tx.id().to_hex());

        let (status, formula) = send(
            &router,
            post_json("/lookup", json!({"service": "ls_advertisement", "query": {"publicKey": "02s"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(formula, json!([{"txid": tx.id().to_hex(), "outputIndex": 0}]));
    }

    #[tokio::test]
    async fn test_overlay_errors_are_json() {
        let test = TestNode::new();
        let router = router(&test);

        let no_topics = Request::post("/submit").body(Body::from(vec![1, 2, 3])).unwrap();
        let (status, body) = send(&router, no_topics).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("x-topics"));

        let garbage = Request::post("/submit")
            .header("x-topics", json!([ADVERTISEMENT_TOPIC]).to_string())
            .body(Body::from(vec![1, 2, 3]))
            .unwrap();
        let (status, _) = send(&router, garbage).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            post_json("/lookup", json!({"service": "ls_other", "query": {"findAll": true}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_campaign_routes() {
        let test = TestNode::new();
        let router = router(&test);

        let (status, body) = send(
            &router,
            post_json(
                "/fund",
                json!({
                    "campaignId": "ad-7",
                    "questions": ["Q1", "Q2"],
                    "answers": ["Yes", "No"],
                    "satoshisBalance": 500,
                    "rewardPerAnswer": 50
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["satoshisBalance"], 500);

        let (status, body) = send(&router, get("/funded-ads")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ads"], json!(["ad-7"]));

        let (status, body) = send(&router, post_json("/funding-records", json!({"ids": ["ad-7"]}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fundingRecords"][0]["campaignId"], "ad-7");

        let (status, body) = send(
            &router,
            post_json(
                "/submit-answers",
                json!({"adId": "ad-7", "answers": ["yes", "no"], "publicKey": "02frank"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], 100);
        assert_eq!(body["correctAnswers"], 2);
        assert_eq!(body["senderIdentityKey"], SERVER_IDENTITY_KEY);
        assert!(body["transaction"].is_array());

        let (status, body) = send(
            &router,
            post_json(
                "/submit-answers",
                json!({"adId": "ad-7", "answers": ["yes", "no"], "publicKey": "02frank"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You have already submitted answers for this ad");
    }

    #[tokio::test]
    async fn test_campaign_error_statuses() {
        let test = TestNode::new();
        let router = router(&test);

        let (status, body) = send(&router, post_json("/funding-records", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing or invalid ids array in request body");

        let (status, body) = send(
            &router,
            post_json(
                "/submit-answers",
                json!({"adId": "nope", "answers": ["a"], "publicKey": "02g"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Campaign funding not found");

        let (status, _) = send(&router, post_json("/submit-answers", json!({"adId": "nope"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_draft_campaign_routes() {
        let test = TestNode::new();
        let router = router(&test);

        let (status, created) = send(
            &router,
            post_json(
                "/campaigns",
                json!({
                    "mediaId": "media-3",
                    "advertiserId": "adv-42",
                    "rewardPerAnswer": 10,
                    "totalFunded": 1000,
                    "startDate": "2030-01-01T00:00:00Z",
                    "endDate": "2030-03-01T00:00:00Z",
                    "questions": [{"id": "q1", "text": "Colour?", "correctAnswer": "blue"}]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let campaign_id = created["campaignId"].as_str().unwrap().to_string();
        assert!(created["paymentRequest"]["tx"].is_array());
        assert_eq!(test.wallet.actions.lock()[0].outputs[0].satoshis, 1000);

        let (status, campaigns) = send(&router, get("/advertisers/adv-42/campaigns")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(campaigns[0]["id"], campaign_id.as_str());
        assert_eq!(campaigns[0]["status"], "draft");
        assert_eq!(campaigns[0]["remainingBalance"], 1000);

        let (status, campaigns) = send(&router, get("/advertisers/adv-0/campaigns")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(campaigns, json!([]));

        let (status, body) = send(
            &router,
            post_json("/campaigns", json!({"mediaId": "media-3", "advertiserId": "adv-42"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing rewardPerAnswer in request body");
    }

    #[tokio::test]
    async fn test_metadata_routes() {
        let test = TestNode::new();
        let router = router(&test);

        let (status, body) = send(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&router, get("/listTopicManagers")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body[ADVERTISEMENT_TOPIC]["name"].is_string());

        let (status, body) = send(&router, get("/listLookupServiceProviders")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["ls_advertisement"]["shortDescription"].is_string());

        let (status, _) = send(
            &router,
            get("/getDocumentationForTopicManager?manager=tm_advertisement"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &router,
            get("/getDocumentationForLookupServiceProvider?lookupService=ls_unknown"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
