use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use billing_engine::{
    db_types::{OrderStatusType, Payment, PaymentMethod},
    events::EventProducers,
    traits::BillingError,
    OrderFlowApi,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::{
    helpers::{admin_auth, bearer, money, order, payment, priced_item, send_request},
    mocks::MockOrderBackend,
};
use crate::routes::{CreatePaymentRoute, OrderPaymentsRoute, PaymentByIdRoute, PaymentsRoute, UpdatePaymentStatusRoute};

fn configure(backend: MockOrderBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(backend, EventProducers::default())))
            .service(CreatePaymentRoute::<MockOrderBackend>::new())
            .service(
                web::scope("/api")
                    .wrap(admin_auth())
                    .service(PaymentsRoute::<MockOrderBackend>::new())
                    .service(PaymentByIdRoute::<MockOrderBackend>::new())
                    .service(OrderPaymentsRoute::<MockOrderBackend>::new())
                    .service(UpdatePaymentStatusRoute::<MockOrderBackend>::new()),
            );
    }
}

fn stored(p: billing_engine::db_types::NewPayment) -> Result<Payment, BillingError> {
    Ok(Payment {
        id: 10,
        order_id: p.order_id,
        amount: p.amount,
        status: p.status,
        payment_method: p.payment_method,
        created_at: Utc::now(),
    })
}

#[actix_web::test]
async fn payment_amount_defaults_to_order_total() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(order(id, OrderStatusType::Created))));
    backend.expect_fetch_priced_items().returning(|id| {
        Ok(vec![priced_item(1, id, 1, 2, Some("10.00")), priced_item(2, id, 2, 1, Some("20.00"))])
    });
    backend
        .expect_insert_payment()
        .withf(|p| {
            p.order_id == 1 && p.amount == money("40.00") && p.status == "pending" && p.payment_method == PaymentMethod::Card
        })
        .times(1)
        .returning(stored);
    let req = TestRequest::post().uri("/payments").set_json(json!({"order": 1}));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["amount"], "40.00");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["payment_method"], "card");
}

#[actix_web::test]
async fn explicit_amount_and_method_are_kept() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_priced_items().never();
    backend
        .expect_insert_payment()
        .withf(|p| p.amount == money("0.00") && p.payment_method == PaymentMethod::Paypal && p.status == "paid")
        .returning(stored);
    let req = TestRequest::post()
        .uri("/payments")
        .set_json(json!({"order": 1, "payment_type": "paypal", "amount": 0, "status": "paid"}));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains(r#""amount":"0.00""#), "{body}");
}

#[actix_web::test]
async fn payment_for_unknown_order_is_404() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|_| Ok(None));
    backend.expect_insert_payment().never();
    let req = TestRequest::post().uri("/payments").set_json(json!({"order": 77}));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_payment_method_is_400() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/payments").set_json(json!({"order": 1, "payment_type": "cash"}));
    let (status, _) = send_request(req, configure(MockOrderBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn payments_for_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(order(id, OrderStatusType::Created))));
    backend
        .expect_fetch_payments_for_order()
        .returning(|id| Ok(vec![payment(1, id, "15.00", "pending"), payment(2, id, "25.00", "paid")]));
    let req = TestRequest::get().uri("/api/orders/3/payments").insert_header(bearer());
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["order_id"], 3);
    assert_eq!(body["total_payments"], "40.00");
    assert_eq!(body["payments"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn list_and_fetch_payments() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_payments().returning(|| Ok(vec![payment(1, 1, "40.00", "paid")]));
    backend.expect_fetch_payment().returning(|id| Ok((id == 1).then(|| payment(1, 1, "40.00", "paid"))));
    let (status, body) =
        send_request(TestRequest::get().uri("/api/payments").insert_header(bearer()), configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"[{"id":1,"order_id":1,"amount":"40.00","status":"paid","payment_method":"card","created_at":"2024-06-10T09:15:00Z"}]"#
    );

    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_payment().returning(|_| Ok(None));
    let (status, _) =
        send_request(TestRequest::get().uri("/api/payments/2").insert_header(bearer()), configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn mark_payment_as_paid() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_update_payment_status()
        .withf(|id, status| *id == 1 && status == "paid")
        .times(1)
        .returning(|id, status| Ok(payment(id, 1, "40.00", status)));
    let req =
        TestRequest::patch().uri("/api/payments/1/status").insert_header(bearer()).set_json(json!({"status": "paid"}));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""status":"paid""#));
}

#[actix_web::test]
async fn blank_status_is_400() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_update_payment_status().never();
    let req =
        TestRequest::patch().uri("/api/payments/1/status").insert_header(bearer()).set_json(json!({"status": "  "}));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
