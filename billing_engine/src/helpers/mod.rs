mod totals;

pub use totals::order_total;
