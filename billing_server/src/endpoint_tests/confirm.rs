use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use billing_engine::{
    db_types::{OrderStatusType, PAID_STATUS},
    events::{EventHandlers, EventHooks, EventProducers, OrderConfirmedEvent},
    traits::{BillingError, ConfirmationOutcome, RejectionReason},
    OrderFlowApi,
};
use serde_json::Value;

use super::{
    helpers::{admin_auth, bearer, money, order, priced_item, send_request},
    mocks::MockOrderBackend,
};
use crate::routes::ConfirmOrderRoute;

type Published = Arc<Mutex<Vec<OrderConfirmedEvent>>>;

fn configure(backend: MockOrderBackend, producers: EventProducers) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(backend, producers)))
            .service(web::scope("/api").wrap(admin_auth()).service(ConfirmOrderRoute::<MockOrderBackend>::new()));
    }
}

async fn recording_producers() -> (EventProducers, Published) {
    let published = Published::default();
    let sink = Arc::clone(&published);
    let mut hooks = EventHooks::default();
    hooks.on_order_confirmed(move |ev| {
        let sink = Arc::clone(&sink);
        Box::pin(async move {
            sink.lock().unwrap().push(ev);
        })
    });
    let handlers = EventHandlers::new(5, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    (producers, published)
}

fn backend_with_total(outcome: fn(i64) -> Result<ConfirmationOutcome, BillingError>) -> MockOrderBackend {
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(order(id, OrderStatusType::Created))));
    backend.expect_fetch_priced_items().returning(|id| {
        Ok(vec![priced_item(1, id, 1, 2, Some("10.00")), priced_item(2, id, 2, 1, Some("20.00"))])
    });
    backend
        .expect_confirm_order()
        .withf(|_, paid_status, _| paid_status == PAID_STATUS)
        .times(1)
        .returning(move |id, _, _| outcome(id));
    backend
}

fn confirm_request(id: i64) -> TestRequest {
    TestRequest::post().uri(&format!("/api/orders/{id}/confirm")).insert_header(bearer())
}

#[actix_web::test]
async fn confirm_publishes_one_event() {
    let _ = env_logger::try_init().ok();
    let (producers, published) = recording_producers().await;
    let backend = backend_with_total(|id| Ok(ConfirmationOutcome::Confirmed(order(id, OrderStatusType::Confirmed))));
    let (status, body) = send_request(confirm_request(1), configure(backend, producers)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "confirmed");
    assert_eq!(body["order"]["status"], "confirmed");
    assert!(body.get("reason").is_none());

    tokio::time::sleep(Duration::from_millis(100)).await;
    let published = published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].order.id, 1);
    assert_eq!(published[0].total, money("40.00"));
}

#[actix_web::test]
async fn already_confirmed_is_ok_but_silent() {
    let _ = env_logger::try_init().ok();
    let (producers, published) = recording_producers().await;
    let backend =
        backend_with_total(|id| Ok(ConfirmationOutcome::AlreadyConfirmed(order(id, OrderStatusType::Confirmed))));
    let (status, body) = send_request(confirm_request(2), configure(backend, producers)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "already_confirmed");
    assert_eq!(body["message"], "Order #2 was already confirmed");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(published.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn unpaid_order_is_rejected_with_409() {
    let _ = env_logger::try_init().ok();
    let (producers, published) = recording_producers().await;
    let backend = backend_with_total(|id| {
        Ok(ConfirmationOutcome::Rejected {
            order: order(id, OrderStatusType::Created),
            reason: RejectionReason::NoPaidPayment,
        })
    });
    let (status, body) = send_request(confirm_request(3), configure(backend, producers)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "rejected");
    assert_eq!(body["reason"], "no_paid_payment");
    assert_eq!(body["message"], "The order has no paid payment");
    assert_eq!(body["order"]["status"], "created");
    assert_eq!(body["order"]["confirmed_at"], Value::Null);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(published.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn completed_order_is_rejected() {
    let _ = env_logger::try_init().ok();
    let backend = backend_with_total(|id| {
        Ok(ConfirmationOutcome::Rejected {
            order: order(id, OrderStatusType::Completed),
            reason: RejectionReason::OrderCompleted,
        })
    });
    let (status, body) = send_request(confirm_request(4), configure(backend, EventProducers::default())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains(r#""reason":"order_completed""#), "{body}");
}

#[actix_web::test]
async fn broken_order_is_never_confirmed() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(order(id, OrderStatusType::Created))));
    backend.expect_fetch_priced_items().returning(|id| Ok(vec![priced_item(1, id, 8, 1, None)]));
    backend.expect_confirm_order().never();
    let (status, _) = send_request(confirm_request(5), configure(backend, EventProducers::default())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn confirm_missing_order_is_404() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|_| Ok(None));
    backend.expect_confirm_order().never();
    let (status, _) = send_request(confirm_request(6), configure(backend, EventProducers::default())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
