use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use billing_engine::{
    db_types::{NewOrderItem, OrderStatusType},
    events::EventProducers,
    traits::BillingError,
    OrderFlowApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{admin_auth, bearer, order, priced_item, send_request},
    mocks::MockOrderBackend,
};
use crate::routes::{
    AddOrderItemRoute,
    CompleteOrderRoute,
    CreateOrderRoute,
    DeleteOrderRoute,
    OrderByIdRoute,
    OrdersRoute,
};

fn configure(backend: MockOrderBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(backend, EventProducers::default())))
            .service(CreateOrderRoute::<MockOrderBackend>::new())
            .service(OrderByIdRoute::<MockOrderBackend>::new())
            .service(
                web::scope("/api")
                    .wrap(admin_auth())
                    .service(OrdersRoute::<MockOrderBackend>::new())
                    .service(AddOrderItemRoute::<MockOrderBackend>::new())
                    .service(DeleteOrderRoute::<MockOrderBackend>::new())
                    .service(CompleteOrderRoute::<MockOrderBackend>::new()),
            );
    }
}

#[actix_web::test]
async fn create_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_insert_order()
        .withf(|o| o.items == vec![NewOrderItem::new(1, 2), NewOrderItem::new(2, 1)])
        .times(1)
        .returning(|_| Ok(order(1, OrderStatusType::Created)));
    backend.expect_fetch_priced_items().returning(|id| {
        Ok(vec![priced_item(1, id, 1, 2, Some("10.00")), priced_item(2, id, 2, 1, Some("20.00"))])
    });
    let req = TestRequest::post()
        .uri("/orders")
        .set_json(json!({"items": [{"product": 1, "quantity": 2}, {"product": 2}]}));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["status"], "created");
    assert_eq!(body["confirmed_at"], Value::Null);
    assert_eq!(body["total"], "40.00");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn create_empty_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_insert_order().returning(|_| Ok(order(5, OrderStatusType::Created)));
    backend.expect_fetch_priced_items().returning(|_| Ok(vec![]));
    let req = TestRequest::post().uri("/orders").set_json(json!({"items": []}));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains(r#""total":"0.00""#), "{body}");
}

#[actix_web::test]
async fn zero_quantity_is_rejected_before_anything_is_stored() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_insert_order().never();
    let req = TestRequest::post().uri("/orders").set_json(json!({"items": [{"product": 1, "quantity": 0}]}));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_product_is_404() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_insert_order().returning(|_| Err(BillingError::ProductNotFound(42)));
    let req = TestRequest::post().uri("/orders").set_json(json!({"items": [{"product": 42}]}));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("product (id 42)"), "{body}");
}

#[actix_web::test]
async fn order_with_a_missing_product_is_an_integrity_error() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(order(id, OrderStatusType::Created))));
    backend
        .expect_fetch_priced_items()
        .returning(|id| Ok(vec![priced_item(1, id, 1, 1, Some("10.00")), priced_item(2, id, 9, 1, None)]));
    let (status, body) = send_request(TestRequest::get().uri("/orders/3"), configure(backend)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("product #9"), "{body}");
}

#[actix_web::test]
async fn fetch_missing_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_fetch_order().returning(|_| Ok(None));
    let (status, _) = send_request(TestRequest::get().uri("/orders/3"), configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_orders_with_totals() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_orders()
        .returning(|| Ok(vec![order(1, OrderStatusType::Confirmed), order(2, OrderStatusType::Created)]));
    backend.expect_fetch_priced_items().returning(|id| match id {
        1 => Ok(vec![priced_item(1, 1, 1, 3, Some("1.50"))]),
        _ => Ok(vec![]),
    });
    let req = TestRequest::get().uri("/api/orders").insert_header(bearer());
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body[0]["total"], "4.50");
    assert_eq!(body[0]["confirmed_at"], "2024-06-10T09:30:00Z");
    assert_eq!(body[1]["total"], "0.00");
}

#[actix_web::test]
async fn add_item_to_confirmed_order_is_409() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_insert_order_item()
        .returning(|id, _| Err(BillingError::OrderModificationForbidden(id, "confirmed".into())));
    let req = TestRequest::post().uri("/api/orders/1/items").insert_header(bearer()).set_json(json!({"product": 2}));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn delete_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_delete_order().withf(|id| *id == 4).returning(|id| Ok(order(id, OrderStatusType::Created)));
    let req = TestRequest::delete().uri("/api/orders/4").insert_header(bearer());
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Order #4 deleted"}"#);
}

#[actix_web::test]
async fn complete_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_complete_order().returning(|id| Ok(order(id, OrderStatusType::Completed)));
    let req = TestRequest::post().uri("/api/orders/4/complete").insert_header(bearer());
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""status":"completed""#));
}
