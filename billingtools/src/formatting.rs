use std::fmt::Write;

use anyhow::Result;
use billing_engine::{
    db_types::{Payment, Product},
    order_objects::{ConfirmationSummary, OrderDetails},
    payment_objects::PaymentsResult,
};
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn markdown_style(table: &mut Table) {
    table.set_format(markdown_format());
}

pub fn format_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "The catalog is empty".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["id", "Name", "Cost", "Content"]);
    products.iter().for_each(|p| {
        table.add_row(row![p.id, p.name, r->p.cost, p.content]);
    });
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_order(order: &OrderDetails) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "===============================================================================")?;
    writeln!(f, "Order #{:<10} [{:^11}]          Created {}", order.order.id, order.order.status, order.order.created_at)?;
    if let Some(confirmed_at) = order.order.confirmed_at {
        writeln!(f, "                                       Confirmed {confirmed_at}")?;
    }
    writeln!(f, "===============================================================================")?;
    let mut table = Table::new();
    table.set_titles(row!["Item", "Product", "Name", "Qty", "Unit cost"]);
    order.items.iter().for_each(|item| {
        let name = item.product_name.clone().unwrap_or_else(|| "<missing>".into());
        let cost = item.unit_cost.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
        table.add_row(row![item.id, item.product_id, name, r->item.quantity, r->cost]);
    });
    markdown_style(&mut table);
    f.write_str(&table.to_string())?;
    writeln!(f, "Total: {}", order.total)?;
    Ok(f)
}

pub fn format_orders(orders: &[OrderDetails]) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["id", "Status", "Items", "Total", "Created At", "Confirmed At"]);
    orders.iter().for_each(|o| {
        let confirmed = o.order.confirmed_at.map(|d| d.to_string()).unwrap_or_default();
        table.add_row(row![o.order.id, o.order.status, r->o.items.len(), r->o.total, o.order.created_at, confirmed]);
    });
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_payments(payments: &[Payment]) -> String {
    let mut table = Table::new();
    table.set_titles(row!["id", "Order", "Amount", "Method", "Status", "Created At"]);
    payments.iter().for_each(|p| {
        table.add_row(row![p.id, p.order_id, r->p.amount, p.payment_method, p.status, p.created_at]);
    });
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_payments_result(payments: &PaymentsResult) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "===============================================================================")?;
    writeln!(
        f,
        "{count:<4} payments for order #{id}                         Total value: {value}",
        count = payments.payments.len(),
        id = payments.order_id,
        value = payments.total_payments
    )?;
    writeln!(f, "===============================================================================")?;
    f.write_str(&format_payments(&payments.payments))?;
    Ok(f)
}

pub fn format_confirmation(summary: &ConfirmationSummary) -> String {
    match &summary.message {
        Some(msg) => format!("Order #{}: {msg}", summary.order.id),
        None => format!("Order #{} confirmed at {}", summary.order.id, summary.order.confirmed_at.unwrap_or_default()),
    }
}
