use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use billing_engine::{db_types::ProductUpdate, traits::BillingError, CatalogApi};
use serde_json::{json, Value};

use super::{
    helpers::{admin_auth, bearer, product, send_request},
    mocks::MockCatalogManager,
};
use crate::routes::{CreateProductRoute, DeleteProductRoute, ProductByIdRoute, ProductsRoute, UpdateProductRoute};

fn configure(catalog: MockCatalogManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CatalogApi::new(catalog)))
            .service(ProductsRoute::<MockCatalogManager>::new())
            .service(ProductByIdRoute::<MockCatalogManager>::new())
            .service(
                web::scope("/api")
                    .wrap(admin_auth())
                    .service(CreateProductRoute::<MockCatalogManager>::new())
                    .service(UpdateProductRoute::<MockCatalogManager>::new())
                    .service(DeleteProductRoute::<MockCatalogManager>::new()),
            );
    }
}

#[actix_web::test]
async fn list_products() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_products().returning(|| Ok(vec![product(1, "A", "10.00"), product(2, "B", "20.00")]));
    let (status, body) = send_request(TestRequest::get().uri("/products"), configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"[{"id":1,"name":"A","content":"All about A","cost":"10.00"},{"id":2,"name":"B","content":"All about B","cost":"20.00"}]"#
    );
}

#[actix_web::test]
async fn missing_product_is_404() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product().returning(|_| Ok(None));
    let (status, body) = send_request(TestRequest::get().uri("/products/99"), configure(catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[actix_web::test]
async fn non_numeric_id_is_400() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        send_request(TestRequest::get().uri("/products/abc"), configure(MockCatalogManager::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("error"));
}

#[actix_web::test]
async fn create_product_as_admin() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_insert_product()
        .withf(|p| p.name == "Widget" && p.cost.cents() == 1999)
        .times(1)
        .returning(|p| Ok(product(3, &p.name, &p.cost.to_string())));
    let req = TestRequest::post()
        .uri("/api/products")
        .insert_header(bearer())
        .set_json(json!({"name": "Widget", "content": "A widget", "cost": "19.99"}));
    let (status, body) = send_request(req, configure(catalog)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], 3);
    assert_eq!(body["cost"], "19.99");
}

#[actix_web::test]
async fn invalid_cost_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/products")
        .insert_header(bearer())
        .set_json(json!({"name": "Widget", "cost": "19.999"}));
    let (status, body) = send_request(req, configure(MockCatalogManager::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body"#), "{body}");
}

#[actix_web::test]
async fn blank_name_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req =
        TestRequest::post().uri("/api/products").insert_header(bearer()).set_json(json!({"name": " ", "cost": "1"}));
    let (status, _) = send_request(req, configure(MockCatalogManager::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_product_cost() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_update_product()
        .withf(|id, update| *id == 1 && *update == ProductUpdate::default().with_cost("12.50".parse().unwrap()))
        .returning(|_, _| Ok(product(1, "A", "12.50")));
    let req = TestRequest::patch().uri("/api/products/1").insert_header(bearer()).set_json(json!({"cost": "12.50"}));
    let (status, body) = send_request(req, configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""cost":"12.50""#));
}

#[actix_web::test]
async fn empty_update_is_400() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_update_product().returning(|_, _| Err(BillingError::ModificationNoOp));
    let req = TestRequest::patch().uri("/api/products/1").insert_header(bearer()).set_json(json!({}));
    let (status, _) = send_request(req, configure(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_product() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_delete_product().withf(|id| *id == 2).returning(|_| Ok(product(2, "B", "20.00")));
    let req = TestRequest::delete().uri("/api/products/2").insert_header(bearer());
    let (status, body) = send_request(req, configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Product #2 (B) deleted"}"#);
}
