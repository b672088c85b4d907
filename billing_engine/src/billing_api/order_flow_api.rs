use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    billing_api::{
        order_objects::OrderDetails,
        payment_objects::{PaymentRequest, PaymentsResult},
    },
    db_types::{Money, NewOrder, NewOrderItem, NewPayment, Order, Payment, DEFAULT_PAYMENT_STATUS, PAID_STATUS},
    events::{EventProducers, OrderConfirmedEvent},
    helpers::order_total,
    traits::{BillingError, ConfirmationOutcome, OrderManagement, PaymentManagement},
};

/// `OrderFlowApi` is the primary API for handling orders, the payments made against them, and the confirmation
/// workflow that ties the two together.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement + PaymentManagement
{
    /// Creates an order with the given items in a single atomic step. Nothing is stored if any item is invalid.
    pub async fn create_order(&self, items: Vec<NewOrderItem>) -> Result<OrderDetails, BillingError> {
        items.iter().try_for_each(validate_item)?;
        let order = self.db.insert_order(NewOrder::new(items)).await?;
        let details = self.details_for(order).await?;
        info!(
            "🔄️📦️ Order #{} created with {} items, totalling {}",
            details.order.id,
            details.items.len(),
            details.total
        );
        Ok(details)
    }

    pub async fn order_details(&self, id: i64) -> Result<OrderDetails, BillingError> {
        let order = self.fetch_order(id).await?;
        self.details_for(order).await
    }

    /// Every order, with its items and computed total.
    pub async fn orders(&self) -> Result<Vec<OrderDetails>, BillingError> {
        let orders = self.db.fetch_orders().await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            result.push(self.details_for(order).await?);
        }
        Ok(result)
    }

    /// The order total, Σ(unit cost × quantity), calculated from the order's items and the current product costs.
    pub async fn order_total(&self, id: i64) -> Result<Money, BillingError> {
        let _ = self.fetch_order(id).await?;
        let items = self.db.fetch_priced_items(id).await?;
        order_total(&items).map_err(|e| {
            error!("🔄️📦️ Could not calculate the total for order #{id}. {e}");
            e
        })
    }

    /// Adds an item to an order that has not been confirmed yet.
    pub async fn add_item(&self, order_id: i64, item: NewOrderItem) -> Result<OrderDetails, BillingError> {
        validate_item(&item)?;
        let item = self.db.insert_order_item(order_id, item).await?;
        debug!("🔄️📦️ Item #{} added to order #{order_id}", item.id);
        self.order_details(order_id).await
    }

    /// Deletes an order. Its items and payments are deleted with it.
    pub async fn delete_order(&self, id: i64) -> Result<Order, BillingError> {
        let order = self.db.delete_order(id).await?;
        info!("🔄️📦️ Order #{id} deleted");
        Ok(order)
    }

    pub async fn complete_order(&self, id: i64) -> Result<Order, BillingError> {
        let order = self.db.complete_order(id).await?;
        info!("🔄️📦️ Order #{id} completed");
        Ok(order)
    }

    /// Records a payment against an order.
    ///
    /// If the request carries no amount, the payment takes the order's total right now. That amount is stored with the
    /// payment and is never recalculated, even if the order's items or the product costs change later.
    pub async fn create_payment(&self, request: PaymentRequest) -> Result<Payment, BillingError> {
        let order_id = request.order_id;
        let amount = match request.amount {
            Some(amount) => amount,
            None => {
                let total = self.order_total(order_id).await?;
                debug!("🔄️💰️ No amount given for the payment on order #{order_id}. Using the order total, {total}");
                total
            },
        };
        let status = match request.status {
            Some(status) => validate_status(status)?,
            None => DEFAULT_PAYMENT_STATUS.to_string(),
        };
        let payment = NewPayment::new(order_id, amount, status, request.payment_method);
        let payment = self.db.insert_payment(payment).await?;
        info!(
            "🔄️💰️ Payment #{} of {} ({}, {}) recorded against order #{order_id}",
            payment.id, payment.amount, payment.payment_method, payment.status
        );
        Ok(payment)
    }

    pub async fn payments(&self) -> Result<Vec<Payment>, BillingError> {
        self.db.fetch_payments().await
    }

    pub async fn payment(&self, id: i64) -> Result<Payment, BillingError> {
        self.db.fetch_payment(id).await?.ok_or(BillingError::PaymentNotFound(id))
    }

    pub async fn payments_for_order(&self, order_id: i64) -> Result<PaymentsResult, BillingError> {
        let _ = self.fetch_order(order_id).await?;
        let payments = self.db.fetch_payments_for_order(order_id).await?;
        let total_payments = payments.iter().try_fold(Money::ZERO, |total, p| {
            total
                .checked_add(p.amount)
                .ok_or_else(|| BillingError::ArithmeticOverflow(format!("the payments for order #{order_id}")))
        })?;
        Ok(PaymentsResult { order_id, total_payments, payments })
    }

    /// Sets the status of a payment. Setting it to `paid` is what makes its order eligible for confirmation.
    pub async fn update_payment_status(&self, id: i64, status: &str) -> Result<Payment, BillingError> {
        let status = validate_status(status.to_string())?;
        let payment = self.db.update_payment_status(id, &status).await?;
        info!("🔄️💰️ Payment #{id} for order #{} is now '{}'", payment.order_id, payment.status);
        Ok(payment)
    }

    /// Runs the confirmation workflow for an order.
    ///
    /// The order moves from `created` to `confirmed` only if at least one of its payments has status `paid`. The check
    /// and the status change are a single atomic step in the backend, so when several callers race, exactly one sees
    /// [`ConfirmationOutcome::Confirmed`], and only that caller publishes an [`OrderConfirmedEvent`].
    ///
    /// The transition is committed before the event is published. Event hooks (the webhook notifier, for instance) run
    /// on their own tasks, so this call never waits for them.
    pub async fn confirm_order(&self, id: i64) -> Result<ConfirmationOutcome, BillingError> {
        // Totalling first means an order with a broken item is never confirmed.
        let total = self.order_total(id).await?;
        let outcome = self.db.confirm_order(id, PAID_STATUS, Utc::now()).await?;
        match &outcome {
            ConfirmationOutcome::Confirmed(order) => {
                info!("🔄️✅️ Order #{id} confirmed. Total: {total}");
                self.call_order_confirmed_hook(order, total).await;
            },
            ConfirmationOutcome::AlreadyConfirmed(_) => {
                info!("🔄️✅️ Order #{id} was already confirmed. Nothing to do.");
            },
            ConfirmationOutcome::Rejected { reason, .. } => {
                info!("🔄️✅️ Order #{id} cannot be confirmed. {reason}");
            },
        }
        Ok(outcome)
    }

    async fn call_order_confirmed_hook(&self, order: &Order, total: Money) {
        for emitter in &self.producers.order_confirmed_producer {
            debug!("🔄️✅️ Notifying order confirmed hook subscribers");
            let event = OrderConfirmedEvent::new(order.clone(), total);
            emitter.publish_event(event).await;
        }
    }

    async fn fetch_order(&self, id: i64) -> Result<Order, BillingError> {
        self.db.fetch_order(id).await?.ok_or(BillingError::OrderNotFound(id))
    }

    async fn details_for(&self, order: Order) -> Result<OrderDetails, BillingError> {
        let items = self.db.fetch_priced_items(order.id).await?;
        let total = order_total(&items).map_err(|e| {
            error!("🔄️📦️ Could not calculate the total for order #{}. {e}", order.id);
            e
        })?;
        Ok(OrderDetails { order, items, total })
    }
}

fn validate_item(item: &NewOrderItem) -> Result<(), BillingError> {
    if item.quantity <= 0 {
        return Err(BillingError::ValidationError(format!(
            "The quantity of product #{} must be a positive integer, not {}",
            item.product_id, item.quantity
        )));
    }
    Ok(())
}

fn validate_status(status: String) -> Result<String, BillingError> {
    if status.trim().is_empty() {
        return Err(BillingError::ValidationError("A payment status cannot be empty".into()));
    }
    Ok(status)
}
