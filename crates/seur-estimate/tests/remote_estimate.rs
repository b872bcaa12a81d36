//! Remote estimation against a mock pricing service.

use std::time::Duration;

use serde_json::json;
use seur_commerce::{CartItem, CartSnapshot, EstimateMethod};
use seur_estimate::{EstimateError, EstimatorConfig, HealthState, ShippingEstimator};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cart() -> CartSnapshot {
    CartSnapshot::from_items(vec![
        CartItem::new("Camiseta", 12.5, 2, "TSHIRT-M", "p-1"),
        CartItem::new("Gorra", 15.0, 1, "CAP", "p-2"),
    ])
    .unwrap()
}

fn config(server: &MockServer) -> EstimatorConfig {
    EstimatorConfig::default()
        .with_endpoint(format!("{}/checkout-shipping", server.uri()))
        .with_timeout(Duration::from_millis(300))
}

#[tokio::test]
async fn test_remote_quote_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkout-shipping"))
        .and(body_partial_json(json!({
            "order_total": 40.0,
            "shipping_address": {"countryCode": "ES", "city": "", "postalCode": ""}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "shipping_cost": 7.45,
            "shipping_payment_required": true,
            "shipping_message": "Envío SEUR 24h",
            "calculation_method": "seur_api",
            "total_weight": 3.0,
            "parcels_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();
    let estimate = estimator.estimate(&cart()).await;

    assert_eq!(estimate.method, EstimateMethod::Remote);
    assert_eq!(estimate.cost, 7.45);
    assert_eq!(estimate.message, "Envío SEUR 24h");
    assert_eq!(estimate.calculation_method, "seur_api");
    assert_eq!(estimate.remaining_for_free, 10.0);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();

    let err = estimator.remote_estimate(&cart()).await.unwrap_err();
    assert!(matches!(err, EstimateError::Server { status: 502, .. }));

    let estimate = estimator.estimate(&cart()).await;
    assert_eq!(estimate.method, EstimateMethod::Local);
    assert_eq!(estimate.cost, 15.0 + 3.0 * 1.5);
    assert!(estimate.message.contains("10.00"));
}

#[tokio::test]
async fn test_success_false_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "postal code required"
        })))
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();

    match estimator.remote_estimate(&cart()).await {
        Err(EstimateError::Rejected(reason)) => assert_eq!(reason, "postal code required"),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(estimator.estimate(&cart()).await.method, EstimateMethod::Local);
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "shipping_cost": 1.0}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();

    let err = estimator.remote_estimate(&cart()).await.unwrap_err();
    assert!(matches!(err, EstimateError::Timeout(_)));
    assert_eq!(estimator.estimate(&cart()).await.method, EstimateMethod::Local);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();

    assert!(matches!(
        estimator.remote_estimate(&cart()).await,
        Err(EstimateError::Json(_))
    ));
    assert_eq!(estimator.estimate(&cart()).await.method, EstimateMethod::Local);
}

#[tokio::test]
async fn test_offline_never_calls_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server).offline()).unwrap();
    let estimate = estimator.estimate(&cart()).await;

    assert_eq!(estimate.method, EstimateMethod::Local);
    assert!(!estimate.is_free_shipping);
}

#[tokio::test]
async fn test_free_shipping_over_threshold_locally() {
    let cart = CartSnapshot::from_items(vec![CartItem::new("Chaqueta", 60.0, 1, "JACKET", "p-9")])
        .unwrap();
    let estimator = ShippingEstimator::new(EstimatorConfig::default().offline()).unwrap();
    let estimate = estimator.estimate(&cart).await;

    assert!(estimate.is_free_shipping);
    assert_eq!(estimate.cost, 0.0);
}

#[tokio::test]
async fn test_unhealthy_service_is_skipped_within_interval() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkout-shipping"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();

    assert_eq!(estimator.estimate(&cart()).await.method, EstimateMethod::Local);
    assert_eq!(estimator.estimate(&cart()).await.method, EstimateMethod::Local);

    let health = estimator.health().unwrap();
    assert_eq!(health.state, HealthState::Unhealthy);
    assert!(health.last_error.unwrap().contains("503"));
}

#[tokio::test]
async fn test_unhealthy_service_is_retried_after_interval() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "shipping_cost": 6.0,
            "shipping_message": "Envío SEUR"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(
        config(&server).with_health_check_interval(Duration::from_millis(50)),
    )
    .unwrap();

    assert_eq!(estimator.estimate(&cart()).await.method, EstimateMethod::Local);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let estimate = estimator.estimate(&cart()).await;
    assert_eq!(estimate.method, EstimateMethod::Remote);
    assert_eq!(estimate.cost, 6.0);
    assert_eq!(estimator.health().unwrap().state, HealthState::Healthy);
}

#[tokio::test]
async fn test_rejection_keeps_service_healthy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "postal code required"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let estimator = ShippingEstimator::new(config(&server)).unwrap();
    estimator.estimate(&cart()).await;
    estimator.estimate(&cart()).await;

    assert_eq!(estimator.health().unwrap().state, HealthState::Healthy);
}
