use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use billing_engine::{events::EventProducers, OrderFlowApi};

use super::{
    helpers::{admin_auth, bearer, send_request, ADMIN_TOKEN},
    mocks::MockOrderBackend,
};
use crate::routes::PaymentsRoute;

fn configure(backend: MockOrderBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(backend, EventProducers::default())))
            .service(web::scope("/api").wrap(admin_auth()).service(PaymentsRoute::<MockOrderBackend>::new()));
    }
}

fn untouched_backend() -> MockOrderBackend {
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_payments().never();
    backend
}

#[actix_web::test]
async fn no_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/api/payments"), configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Unauthorized. An admin bearer token is required."}"#);
}

#[actix_web::test]
async fn wrong_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/payments").insert_header(("Authorization", "Bearer not-the-token"));
    let (status, body) = send_request(req, configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Unauthorized. The admin token is not valid."}"#);
}

#[actix_web::test]
async fn token_without_bearer_scheme() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/payments").insert_header(("Authorization", ADMIN_TOKEN));
    let (status, _) = send_request(req, configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn correct_token() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_payments().times(1).returning(|| Ok(vec![]));
    let req = TestRequest::get().uri("/api/payments").insert_header(bearer());
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
