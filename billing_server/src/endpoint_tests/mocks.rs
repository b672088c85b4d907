use billing_engine::{
    db_types::{NewOrder, NewOrderItem, NewPayment, NewProduct, Order, OrderItem, Payment, Product, ProductUpdate},
    traits::{BillingError, CatalogManagement, ConfirmationOutcome, OrderManagement, PaymentManagement, PricedItem},
};
use chrono::{DateTime, Utc};
use mockall::mock;

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn fetch_products(&self) -> Result<Vec<Product>, BillingError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, BillingError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, BillingError>;
        async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Product, BillingError>;
        async fn delete_product(&self, id: i64) -> Result<Product, BillingError>;
    }
}

mock! {
    pub OrderBackend {}
    impl OrderManagement for OrderBackend {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, BillingError>;
        async fn fetch_order(&self, id: i64) -> Result<Option<Order>, BillingError>;
        async fn fetch_orders(&self) -> Result<Vec<Order>, BillingError>;
        async fn fetch_priced_items(&self, order_id: i64) -> Result<Vec<PricedItem>, BillingError>;
        async fn insert_order_item(&self, order_id: i64, item: NewOrderItem) -> Result<OrderItem, BillingError>;
        async fn delete_order(&self, id: i64) -> Result<Order, BillingError>;
        async fn confirm_order(&self, id: i64, paid_status: &str, confirmed_at: DateTime<Utc>) -> Result<ConfirmationOutcome, BillingError>;
        async fn complete_order(&self, id: i64) -> Result<Order, BillingError>;
    }
    impl PaymentManagement for OrderBackend {
        async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, BillingError>;
        async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, BillingError>;
        async fn fetch_payments(&self) -> Result<Vec<Payment>, BillingError>;
        async fn fetch_payments_for_order(&self, order_id: i64) -> Result<Vec<Payment>, BillingError>;
        async fn update_payment_status(&self, id: i64, status: &str) -> Result<Payment, BillingError>;
    }
}
