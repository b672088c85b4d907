use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewProduct, Product, ProductUpdate},
    traits::BillingError,
};

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, BillingError> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY id").fetch_all(conn).await?;
    Ok(products)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, BillingError> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, BillingError> {
    let product: Product =
        sqlx::query_as("INSERT INTO products (name, content, cost) VALUES ($1, $2, $3) RETURNING *;")
            .bind(product.name)
            .bind(product.content)
            .bind(product.cost)
            .fetch_one(conn)
            .await?;
    debug!("🗃️ Product #{} ({}) inserted", product.id, product.name);
    Ok(product)
}

/// Applies the fields of `update` that are set. Returns `None` if the product does not exist.
pub async fn update_product(
    id: i64,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, BillingError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for product #{id}. Update request skipped.");
        return Err(BillingError::ModificationNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE products SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(content) = update.content {
        set_clause.push("content = ");
        set_clause.push_bind_unseparated(content);
    }
    if let Some(cost) = update.cost {
        set_clause.push("cost = ");
        set_clause.push_bind_unseparated(cost);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let product =
        builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| Product::from_row(&row)).transpose()?;
    Ok(product)
}

/// Deletes the product. Order items that reference it are removed by the `ON DELETE CASCADE` constraint.
pub async fn delete_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, BillingError> {
    let product =
        sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING *").bind(id).fetch_optional(conn).await?;
    Ok(product)
}
