mod money;

pub mod helpers;
pub mod op;
mod secret;

pub use money::{Money, MoneyConversionError, MONEY_DECIMAL_PLACES};
pub use secret::Secret;
