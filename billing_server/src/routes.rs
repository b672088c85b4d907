//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! etc.) should be expressed as futures or asynchronous functions, so that worker threads can process other requests
//! while they wait.
//!
//! Public routes:
//! * `GET /products`, `GET /products/{id}`
//! * `POST /orders`, `GET /orders/{id}`
//! * `POST /payments`
//!
//! Admin routes (mounted under `/api`, behind the admin token):
//! * `POST /products`, `PATCH /products/{id}`, `DELETE /products/{id}`
//! * `GET /orders`, `DELETE /orders/{id}`, `POST /orders/{id}/items`
//! * `POST /orders/{id}/confirm`, `POST /orders/{id}/complete`, `GET /orders/{id}/payments`
//! * `GET /payments`, `GET /payments/{id}`, `PATCH /payments/{id}/status`
use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use billing_engine::{
    db_types::{NewOrderItem, NewProduct, ProductUpdate},
    order_objects::{ConfirmationSummary, NewOrderRequest},
    payment_objects::{PaymentRequest, PaymentStatusUpdate},
    traits::{CatalogManagement, ConfirmationOutcome, OrderManagement, PaymentManagement},
    CatalogApi,
    OrderFlowApi,
};
use log::*;

use crate::{data_objects::JsonResponse, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(products => Get "/products" impl CatalogManagement);
/// Route handler for the product catalog. Anyone can browse the catalog.
pub async fn products<A: CatalogManagement>(api: web::Data<CatalogApi<A>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET products");
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/products/{id}" impl CatalogManagement);
pub async fn product_by_id<A: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET product #{id}");
    let product = api.product(id).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(create_product => Post "/products" impl CatalogManagement);
/// Admin route. Adds a product to the catalog, returning the new product with its id.
pub async fn create_product<A: CatalogManagement>(
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let product = body.into_inner();
    debug!("💻️ POST new product '{}'", product.name);
    let product = api.create_product(product).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(update_product => Patch "/products/{id}" impl CatalogManagement);
/// Admin route. Edits the name, content or cost of a product. Fields that are omitted are left unchanged.
///
/// A change in cost is reflected in the total of every order that contains the product, but never in payments that
/// have already been recorded.
pub async fn update_product<A: CatalogManagement>(
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH product #{id}");
    let product = api.update_product(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/products/{id}" impl CatalogManagement);
pub async fn delete_product<A: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE product #{id}");
    let product = api.delete_product(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Product #{id} ({}) deleted", product.name))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement, PaymentManagement);
/// Route handler for placing an order.
///
/// The body is a list of items, e.g. `{"items": [{"product": 1, "quantity": 2}, {"product": 2}]}`. The order and all
/// its items are stored in one step; if any item is invalid, nothing is stored. The response carries the new order,
/// its items and its total.
pub async fn create_order<A: OrderManagement + PaymentManagement>(
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST new order with {} items", request.items.len());
    let order = api.create_order(request.items).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(order_by_id => Get "/orders/{id}" impl OrderManagement, PaymentManagement);
pub async fn order_by_id<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET order #{id}");
    let order = api.order_details(id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(orders => Get "/orders" impl OrderManagement, PaymentManagement);
/// Admin route. Every order, with its items and computed total.
pub async fn orders<A: OrderManagement + PaymentManagement>(
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET all orders");
    let orders = api.orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(add_order_item => Post "/orders/{id}/items" impl OrderManagement, PaymentManagement);
/// Admin route. Adds an item to an order that is still in the `created` state.
pub async fn add_order_item<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    body: web::Json<NewOrderItem>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let item = body.into_inner();
    debug!("💻️ POST {} x product #{} to order #{id}", item.quantity, item.product_id);
    let order = api.add_item(id, item).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(delete_order => Delete "/orders/{id}" impl OrderManagement, PaymentManagement);
pub async fn delete_order<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE order #{id}");
    api.delete_order(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order #{id} deleted"))))
}

route!(confirm_order => Post "/orders/{id}/confirm" impl OrderManagement, PaymentManagement);
/// Admin route. Runs the confirmation workflow for the order.
///
/// Responds with 200 when the order was confirmed by this call, or had already been confirmed. If the order does not
/// qualify (no payment with status `paid`, or it has been completed), the response is 409, and the body says why.
///
/// The webhook notification is sent in the background after the preparation delay, so this call returns as soon as the
/// confirmation has been stored.
pub async fn confirm_order<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ POST confirm order #{id}");
    let outcome = api.confirm_order(id).await?;
    let status = match outcome {
        ConfirmationOutcome::Rejected { .. } => StatusCode::CONFLICT,
        _ => StatusCode::OK,
    };
    Ok(HttpResponse::build(status).json(ConfirmationSummary::from(outcome)))
}

route!(complete_order => Post "/orders/{id}/complete" impl OrderManagement, PaymentManagement);
/// Admin route. Marks a confirmed order as completed.
pub async fn complete_order<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ POST complete order #{id}");
    let order = api.complete_order(id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_payments => Get "/orders/{id}/payments" impl OrderManagement, PaymentManagement);
pub async fn order_payments<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET payments for order #{id}");
    let payments = api.payments_for_order(id).await?;
    Ok(HttpResponse::Ok().json(payments))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(create_payment => Post "/payments" impl OrderManagement, PaymentManagement);
/// Route handler for recording a payment.
///
/// The body is `{"order": 1, "payment_type": "card", "amount": "40.00", "status": "pending"}`. Only `order` is
/// required. If `amount` is left out, the payment takes the order's total at this moment, and keeps that amount even if
/// the order changes later.
pub async fn create_payment<A: OrderManagement + PaymentManagement>(
    body: web::Json<PaymentRequest>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST payment for order #{}", request.order_id);
    let payment = api.create_payment(request).await?;
    Ok(HttpResponse::Created().json(payment))
}

route!(payments => Get "/payments" impl OrderManagement, PaymentManagement);
pub async fn payments<A: OrderManagement + PaymentManagement>(
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET all payments");
    let payments = api.payments().await?;
    Ok(HttpResponse::Ok().json(payments))
}

route!(payment_by_id => Get "/payments/{id}" impl OrderManagement, PaymentManagement);
pub async fn payment_by_id<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET payment #{id}");
    let payment = api.payment(id).await?;
    Ok(HttpResponse::Ok().json(payment))
}

route!(update_payment_status => Patch "/payments/{id}/status" impl OrderManagement, PaymentManagement);
/// Admin route. Sets the status of a payment, e.g. `{"status": "paid"}`.
pub async fn update_payment_status<A: OrderManagement + PaymentManagement>(
    path: web::Path<i64>,
    body: web::Json<PaymentStatusUpdate>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PATCH payment #{id} status to '{}'", update.status);
    let payment = api.update_payment_status(id, &update.status).await?;
    Ok(HttpResponse::Ok().json(payment))
}
