use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPayment, Payment},
    traits::BillingError,
};

pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<Payment, BillingError> {
    let payment: Payment = sqlx::query_as(
        r#"
            INSERT INTO payments (order_id, amount, status, payment_method, created_at) VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(payment.order_id)
    .bind(payment.amount)
    .bind(payment.status)
    .bind(payment.payment_method)
    .bind(payment.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Payment #{} of {} recorded against order #{}", payment.id, payment.amount, payment.order_id);
    Ok(payment)
}

pub async fn fetch_payment(id: i64, conn: &mut SqliteConnection) -> Result<Option<Payment>, BillingError> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn fetch_payments(conn: &mut SqliteConnection) -> Result<Vec<Payment>, BillingError> {
    let payments = sqlx::query_as("SELECT * FROM payments ORDER BY id").fetch_all(conn).await?;
    Ok(payments)
}

pub async fn fetch_payments_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Payment>, BillingError> {
    let payments =
        sqlx::query_as("SELECT * FROM payments WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await?;
    Ok(payments)
}

pub async fn update_payment_status(
    id: i64,
    status: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, BillingError> {
    let payment = sqlx::query_as("UPDATE payments SET status = $1 WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}
