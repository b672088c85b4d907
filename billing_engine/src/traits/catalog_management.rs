use crate::{
    db_types::{NewProduct, Product, ProductUpdate},
    traits::BillingError,
};

/// Behaviour for managing the product catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches all products, in ascending id order.
    async fn fetch_products(&self) -> Result<Vec<Product>, BillingError>;

    /// Fetches the product with the given id. If it does not exist, `None` is returned.
    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, BillingError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, BillingError>;

    /// Applies the non-empty fields of `update` to the product and returns the updated record.
    ///
    /// Changing the cost of a product changes the total of every order that contains it, but never the amount of an
    /// existing payment.
    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Product, BillingError>;

    /// Deletes the product. Every order item that references it is deleted along with it.
    /// Returns the deleted record, or [`BillingError::ProductNotFound`].
    async fn delete_product(&self, id: i64) -> Result<Product, BillingError>;
}
