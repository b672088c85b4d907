use crate::{
    db_types::Money,
    traits::{BillingError, PricedItem},
};

/// Calculates the total of an order as Σ(unit cost × quantity) over its items.
///
/// An empty item list totals zero. An item whose product no longer exists is reported as
/// [`BillingError::IntegrityError`]; it is never skipped or priced at zero.
pub fn order_total(items: &[PricedItem]) -> Result<Money, BillingError> {
    items.iter().try_fold(Money::ZERO, |total, item| {
        let line = item.line_total()?;
        total
            .checked_add(line)
            .ok_or_else(|| BillingError::ArithmeticOverflow(format!("the total of order #{}", item.order_id)))
    })
}
