use std::time::Duration;

use actix_web::{dev::Server, error::InternalError, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use billing_engine::{events::EventProducers, CatalogApi, OrderFlowApi, SqliteDatabase};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::AdminAuthMiddlewareFactory,
    notifier::create_notification_handlers,
    routes::{
        health,
        AddOrderItemRoute,
        CompleteOrderRoute,
        ConfirmOrderRoute,
        CreateOrderRoute,
        CreatePaymentRoute,
        CreateProductRoute,
        DeleteOrderRoute,
        DeleteProductRoute,
        OrderByIdRoute,
        OrderPaymentsRoute,
        OrdersRoute,
        PaymentByIdRoute,
        PaymentsRoute,
        ProductByIdRoute,
        ProductsRoute,
        UpdatePaymentStatusRoute,
        UpdateProductRoute,
    },
};

const MAX_DB_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, MAX_DB_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🚀️ Skipping database migrations");
    }
    let handlers = create_notification_handlers(&config.notifier)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("billing::access_log"))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(json_config())
            .app_data(path_config());
        // Routes that require the admin token
        let admin_scope = web::scope("/api")
            .wrap(AdminAuthMiddlewareFactory::new(config.admin_token.clone()))
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(DeleteOrderRoute::<SqliteDatabase>::new())
            .service(AddOrderItemRoute::<SqliteDatabase>::new())
            .service(ConfirmOrderRoute::<SqliteDatabase>::new())
            .service(CompleteOrderRoute::<SqliteDatabase>::new())
            .service(OrderPaymentsRoute::<SqliteDatabase>::new())
            .service(PaymentsRoute::<SqliteDatabase>::new())
            .service(PaymentByIdRoute::<SqliteDatabase>::new())
            .service(UpdatePaymentStatusRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(CreatePaymentRoute::<SqliteDatabase>::new())
            .service(admin_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed request bodies are reported with the same JSON error body as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejected request body. {err}");
        let response = actix_web::ResponseError::error_response(&ServerError::InvalidRequestBody(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejected request path. {err}");
        let response = actix_web::ResponseError::error_response(&ServerError::InvalidRequestPath(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}
