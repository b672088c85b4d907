//! `SqliteDatabase` is a concrete implementation of a billing engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{db_url, new_pool, orders, payments, products};
use crate::{
    db_types::{
        NewOrder,
        NewOrderItem,
        NewPayment,
        NewProduct,
        Order,
        OrderItem,
        OrderStatusType,
        Payment,
        Product,
        ProductUpdate,
    },
    traits::{
        BillingDatabase,
        BillingError,
        CatalogManagement,
        ConfirmationOutcome,
        OrderManagement,
        PaymentManagement,
        PricedItem,
        RejectionReason,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl BillingDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), BillingError> {
        self.pool.close().await;
        Ok(())
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products(&self) -> Result<Vec<Product>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products(&mut conn).await
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(id, &mut conn).await
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, BillingError> {
        let mut tx = self.pool.begin().await?;
        let product = products::insert_product(product, &mut tx).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Product, BillingError> {
        let mut tx = self.pool.begin().await?;
        let product = products::update_product(id, update, &mut tx).await?.ok_or(BillingError::ProductNotFound(id))?;
        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<Product, BillingError> {
        let mut tx = self.pool.begin().await?;
        let product = products::delete_product(id, &mut tx).await?.ok_or(BillingError::ProductNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Product #{id} ({}) deleted, along with any order items that referenced it", product.name);
        Ok(product)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, BillingError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders(&mut conn).await
    }

    async fn fetch_priced_items(&self, order_id: i64) -> Result<Vec<PricedItem>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_priced_items(order_id, &mut conn).await
    }

    async fn insert_order_item(&self, order_id: i64, item: NewOrderItem) -> Result<OrderItem, BillingError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::fetch_order(order_id, &mut tx).await?.ok_or(BillingError::OrderNotFound(order_id))?;
        if order.status != OrderStatusType::Created {
            return Err(BillingError::OrderModificationForbidden(order_id, order.status.to_string()));
        }
        let item = orders::insert_item(order_id, item, &mut tx).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn delete_order(&self, id: i64) -> Result<Order, BillingError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::delete_order(id, &mut tx).await?.ok_or(BillingError::OrderNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Order #{id} deleted, along with its items and payments");
        Ok(order)
    }

    async fn confirm_order(
        &self,
        id: i64,
        paid_status: &str,
        confirmed_at: DateTime<Utc>,
    ) -> Result<ConfirmationOutcome, BillingError> {
        let mut tx = self.pool.begin().await?;
        let outcome = match orders::confirm_order(id, paid_status, confirmed_at, &mut tx).await? {
            Some(order) => {
                debug!("🗃️ Order #{id} moved to confirmed at {confirmed_at}");
                ConfirmationOutcome::Confirmed(order)
            },
            None => {
                // The guard failed. Work out why from the current state of the order.
                let order = orders::fetch_order(id, &mut tx).await?.ok_or(BillingError::OrderNotFound(id))?;
                match order.status {
                    OrderStatusType::Confirmed => ConfirmationOutcome::AlreadyConfirmed(order),
                    OrderStatusType::Completed => {
                        ConfirmationOutcome::Rejected { order, reason: RejectionReason::OrderCompleted }
                    },
                    OrderStatusType::Created => {
                        ConfirmationOutcome::Rejected { order, reason: RejectionReason::NoPaidPayment }
                    },
                }
            },
        };
        tx.commit().await?;
        Ok(outcome)
    }

    async fn complete_order(&self, id: i64) -> Result<Order, BillingError> {
        let mut tx = self.pool.begin().await?;
        let result = match orders::complete_order(id, &mut tx).await? {
            Some(order) => Ok(order),
            None => match orders::fetch_order(id, &mut tx).await? {
                Some(order) => Err(BillingError::OrderModificationForbidden(id, order.status.to_string())),
                None => Err(BillingError::OrderNotFound(id)),
            },
        };
        tx.commit().await?;
        result
    }
}

impl PaymentManagement for SqliteDatabase {
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, BillingError> {
        let mut tx = self.pool.begin().await?;
        let order_id = payment.order_id;
        if orders::fetch_order(order_id, &mut tx).await?.is_none() {
            return Err(BillingError::OrderNotFound(order_id));
        }
        let payment = payments::insert_payment(payment, &mut tx).await?;
        tx.commit().await?;
        Ok(payment)
    }

    async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment(id, &mut conn).await
    }

    async fn fetch_payments(&self) -> Result<Vec<Payment>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payments(&mut conn).await
    }

    async fn fetch_payments_for_order(&self, order_id: i64) -> Result<Vec<Payment>, BillingError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payments_for_order(order_id, &mut conn).await
    }

    async fn update_payment_status(&self, id: i64, status: &str) -> Result<Payment, BillingError> {
        let mut tx = self.pool.begin().await?;
        let payment =
            payments::update_payment_status(id, status, &mut tx).await?.ok_or(BillingError::PaymentNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Payment #{id} status set to '{status}'");
        Ok(payment)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the url in `BILLING_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date by applying the embedded migrations.
    pub async fn migrate(&self) -> Result<(), BillingError> {
        migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BillingError::DatabaseError(format!("Could not run migrations. {e}")))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}
