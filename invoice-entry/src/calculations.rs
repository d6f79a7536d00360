//! Line item arithmetic.
//!
//! Both functions are pure and do no range checking. Callers are expected to pass a discount in
//! `0..=100` and a quantity of at least one; anything else produces a mathematically correct but
//! meaningless amount.

use bigdecimal::BigDecimal;

/// Compute the per-unit price after discount as `rate - rate * discount / 100`.
///
/// # Example
/// ```rust
/// use std::str::FromStr;
///
/// use bigdecimal::BigDecimal;
/// use invoice_entry::calculations::net_amount;
///
/// let net = net_amount(&BigDecimal::from(100), &BigDecimal::from(10));
/// assert_eq!(net, BigDecimal::from_str("90.00").unwrap());
/// ```
pub fn net_amount(rate: &BigDecimal, discount_percent: &BigDecimal) -> BigDecimal {
    rate.clone() - (rate * discount_percent) / BigDecimal::from(100)
}

/// Compute the line total as `net_amount * qty`.
pub fn total_amount(net_amount: &BigDecimal, qty: &BigDecimal) -> BigDecimal {
    net_amount * qty
}
