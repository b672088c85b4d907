use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewProduct, Product, ProductUpdate},
    traits::{BillingError, CatalogManagement},
};

/// `CatalogApi` manages the products that orders are made from.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn products(&self) -> Result<Vec<Product>, BillingError> {
        self.db.fetch_products().await
    }

    pub async fn product(&self, id: i64) -> Result<Product, BillingError> {
        self.db.fetch_product(id).await?.ok_or(BillingError::ProductNotFound(id))
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, BillingError> {
        if product.name.trim().is_empty() {
            return Err(BillingError::ValidationError("A product must have a name".into()));
        }
        let product = self.db.insert_product(product).await?;
        info!("🛒️ Product #{} ({}) added to the catalog at {}", product.id, product.name, product.cost);
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Product, BillingError> {
        if update.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(BillingError::ValidationError("A product name cannot be empty".into()));
        }
        let product = self.db.update_product(id, update).await?;
        info!("🛒️ Product #{id} updated. It is now {} at {}", product.name, product.cost);
        Ok(product)
    }

    /// Removes the product from the catalog. Any order items referencing it are removed as well, which changes the
    /// totals of those orders.
    pub async fn delete_product(&self, id: i64) -> Result<Product, BillingError> {
        let product = self.db.delete_product(id).await?;
        info!("🛒️ Product #{id} ({}) removed from the catalog", product.name);
        Ok(product)
    }
}
