use storefront_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_healthy() {
    let response = health_check().await;
    assert_eq!(response.0.status, "healthy");
}
