mod common;

use common::{sample_request, unreachable_base_url, MockApi, SUCCEEDED_BODY};
use paygate_client::{
    Config, FixedDelay, NoDelay, NormalizedResult, PaymentClient, PaymentError, ProbeAttempt,
    RawApiResponse,
};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_failing_then_succeeding_url() {
    let dead = unreachable_base_url();
    let api = MockApi::start(200, SUCCEEDED_BODY).await;
    let urls = vec![dead.clone(), api.base_url.clone()];
    let client = PaymentClient::new("sk_probe");
    let delay = FixedDelay::new(Duration::from_millis(100));

    let started = Instant::now();
    let outcomes = client
        .probe_urls_with(&sample_request(10.5), &urls, &delay)
        .await;
    let elapsed = started.elapsed();

    assert_eq!(outcomes.len(), 2);
    assert!(elapsed >= Duration::from_millis(200));

    assert_eq!(outcomes[0].url, dead);
    assert_eq!(
        outcomes[0].attempt,
        ProbeAttempt::Completed {
            response: RawApiResponse::Failed(PaymentError::NoResponse),
            result: NormalizedResult::Failure {
                message: "No response received from the server".to_string()
            },
        }
    );

    assert_eq!(outcomes[1].url, api.base_url);
    assert!(outcomes[1].is_success());
    assert_eq!(api.requests()[0].api_key.as_deref(), Some("sk_probe"));
}

#[tokio::test]
async fn test_probing_does_not_stop_at_first_success() {
    let good = MockApi::start(200, SUCCEEDED_BODY).await;
    let bad = MockApi::start(500, r#"{"error":"boom"}"#).await;
    let urls = [good.base_url.as_str(), bad.base_url.as_str()];

    let outcomes = PaymentClient::new("key")
        .probe_urls_with(&sample_request(3.0), &urls, &NoDelay)
        .await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_success());
    assert_eq!(
        outcomes[1].result(),
        Some(&NormalizedResult::Failure {
            message: "Server error: 500".to_string()
        })
    );
    assert_eq!(good.requests().len(), 1);
    assert_eq!(bad.requests().len(), 1);
}

#[tokio::test]
async fn test_multiple_urls_uses_configured_delay() {
    let first = MockApi::start(200, r#"{"status":"FAILED","message":"declined"}"#).await;
    let second = MockApi::start(200, SUCCEEDED_BODY).await;
    let config = Config {
        api_key: "key".to_string(),
        probe_delay_ms: 50,
        ..Config::default()
    };
    let client = PaymentClient::from_config(&config).unwrap();
    let payload = serde_json::to_string(&sample_request(42.0)).unwrap();

    let started = Instant::now();
    let outcomes = client
        .test_multiple_urls(&payload, &[&first.base_url, &second.base_url])
        .await;

    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(
        outcomes.iter().map(|o| o.url.as_str()).collect::<Vec<_>>(),
        vec![first.base_url.as_str(), second.base_url.as_str()]
    );
    assert_eq!(
        outcomes[0].result(),
        Some(&NormalizedResult::Failure {
            message: "declined".to_string()
        })
    );
    assert!(outcomes[1].is_success());
    assert_eq!(first.requests()[0].body["amount"], serde_json::json!(42));
}

#[tokio::test]
async fn test_invalid_payload_is_recorded_per_url() {
    let api = MockApi::start(200, SUCCEEDED_BODY).await;
    let urls = [api.base_url.clone()];

    let outcomes = PaymentClient::new("key")
        .probe_urls_with("{broken", &urls, &NoDelay)
        .await;

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        &outcomes[0].attempt,
        ProbeAttempt::Completed {
            response: RawApiResponse::Failed(PaymentError::InvalidInputJson(_)),
            ..
        }
    ));
    assert!(api.requests().is_empty());
}
