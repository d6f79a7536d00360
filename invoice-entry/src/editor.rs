//! Edits to the grid of committed line items.
//!
//! Every operation takes the current items and returns the list that should replace them, or
//! `None` when the edit is refused or has nothing to do. The input slice is never modified. Unlike
//! the draft editor, the grid refuses out-of-range quantities and discounts instead of clamping
//! them, and it never reports why.

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::{
    input::{NumericField, RawInput},
    invoice::{LineItem, Product},
};

/// One user action on the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit<'a> {
    ChangeProduct {
        index: usize,
        product: Option<&'a Product>,
    },
    ChangeField {
        index: usize,
        field: NumericField,
        raw: &'a str,
    },
    Remove {
        index: usize,
    },
}

/// Apply `edit` to `items`.
pub fn apply(items: &[LineItem], edit: &LineEdit<'_>) -> Option<Vec<LineItem>> {
    match edit {
        LineEdit::ChangeProduct { index, product } => change_product(items, *index, *product),
        LineEdit::ChangeField { index, field, raw } => change_field(items, *index, *field, raw),
        LineEdit::Remove { index } => remove(items, *index),
    }
}

/// Swap the product on row `index`, keeping its quantity and discount.
pub fn change_product(
    items: &[LineItem],
    index: usize,
    product: Option<&Product>,
) -> Option<Vec<LineItem>> {
    let product = product?;
    if index >= items.len() {
        debug!(index, rows = items.len(), "product change on missing row");
        return None;
    }

    let mut updated = items.to_vec();
    let line = &mut updated[index];
    line.set_product(product);
    line.recompute();
    Some(updated)
}

/// Set quantity or discount on row `index` from raw field text.
///
/// A blank value clears the cell without touching the amounts. Non-numeric text, a quantity below
/// one, or a discount outside `0..=100` is refused.
pub fn change_field(
    items: &[LineItem],
    index: usize,
    field: NumericField,
    raw: &str,
) -> Option<Vec<LineItem>> {
    if index >= items.len() {
        debug!(index, rows = items.len(), "field change on missing row");
        return None;
    }

    let value = match RawInput::parse(raw) {
        RawInput::Blank => None,
        RawInput::Invalid => {
            debug!(index, %field, raw, "refused non-numeric input");
            return None;
        }
        RawInput::Number(n) => {
            if !accepts(field, &n) {
                debug!(index, %field, value = %n, "refused out of range input");
                return None;
            }
            Some(n)
        }
    };

    let mut updated = items.to_vec();
    let line = &mut updated[index];
    let recompute = value.is_some();
    match field {
        NumericField::Qty => line.set_qty(value),
        NumericField::Discount => line.set_discount(value),
    }
    if recompute {
        line.recompute();
    }
    Some(updated)
}

/// Drop row `index`.
pub fn remove(items: &[LineItem], index: usize) -> Option<Vec<LineItem>> {
    if index >= items.len() {
        return None;
    }
    Some(
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, l)| l.clone())
            .collect(),
    )
}

fn accepts(field: NumericField, value: &BigDecimal) -> bool {
    match field {
        NumericField::Qty => *value >= BigDecimal::from(1),
        NumericField::Discount => *value >= BigDecimal::from(0) && *value <= BigDecimal::from(100),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::invoice::{ProductBuilder, invoice_total};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn product(id: i64, name: &str, rate: &str) -> Product {
        ProductBuilder::default()
            .product_id(id)
            .product_name(name)
            .rate(dec(rate))
            .unit("pcs")
            .build()
            .unwrap()
    }

    fn grid() -> Vec<LineItem> {
        vec![
            LineItem::new(&product(1, "Bolt", "100"), dec("2"), dec("10")),
            LineItem::new(&product(2, "Nut", "5"), dec("4"), dec("0")),
        ]
    }

    #[test]
    fn product_swap_keeps_qty_and_discount() {
        let items = grid();
        let washer = product(3, "Washer", "50");
        let next = change_product(&items, 0, Some(&washer)).unwrap();
        let line = &next[0];
        assert_eq!(line.product_name(), "Washer");
        assert_eq!(line.rate(), &dec("50"));
        assert_eq!(line.qty(), Some(&dec("2")));
        assert_eq!(line.discount(), Some(&dec("10")));
        assert_eq!(line.net_amount(), &dec("45"));
        assert_eq!(line.total_amount(), &dec("90"));
        // the input list is untouched
        assert_eq!(items[0].product_name(), "Bolt");
    }

    #[test]
    fn product_swap_without_product_is_a_no_op() {
        assert!(change_product(&grid(), 0, None).is_none());
        assert!(change_product(&grid(), 5, Some(&product(3, "W", "1"))).is_none());
    }

    #[test]
    fn qty_below_one_is_refused_not_clamped() {
        let items = grid();
        assert!(change_field(&items, 0, NumericField::Qty, "0").is_none());
        assert!(change_field(&items, 0, NumericField::Qty, "-3").is_none());
        assert!(change_field(&items, 0, NumericField::Qty, "0.5").is_none());
        assert_eq!(items[0].qty(), Some(&dec("2")));
    }

    #[test]
    fn discount_out_of_range_is_refused() {
        let items = grid();
        assert!(change_field(&items, 0, NumericField::Discount, "101").is_none());
        assert!(change_field(&items, 0, NumericField::Discount, "-1").is_none());
    }

    #[test]
    fn enormous_exponent_is_refused_and_row_kept() {
        let items = grid();
        assert!(change_field(&items, 1, NumericField::Qty, "1e100000000").is_none());
        assert!(change_field(&items, 1, NumericField::Discount, "1e-100000000").is_none());
        assert_eq!(items[1].qty(), Some(&dec("4")));
        assert_eq!(invoice_total(&items), dec("200"));
    }

    #[test]
    fn non_numeric_is_refused() {
        assert!(change_field(&grid(), 1, NumericField::Qty, "two").is_none());
    }

    #[test]
    fn accepted_values_recompute() {
        let next = change_field(&grid(), 0, NumericField::Qty, "5").unwrap();
        assert_eq!(next[0].total_amount(), &dec("450"));
        let next = change_field(&next, 0, NumericField::Discount, "100").unwrap();
        assert_eq!(next[0].net_amount(), &dec("0"));
        assert_eq!(next[0].total_amount(), &dec("0"));
    }

    #[test]
    fn blank_clears_without_recomputing() {
        let next = change_field(&grid(), 0, NumericField::Qty, "").unwrap();
        assert_eq!(next[0].qty(), None);
        assert_eq!(next[0].total_amount(), &dec("180"));

        // retyping restores a computed total
        let next = change_field(&next, 0, NumericField::Qty, "3").unwrap();
        assert_eq!(next[0].total_amount(), &dec("270"));
    }

    #[test]
    fn remove_drops_exactly_that_line() {
        let items = grid();
        let before = invoice_total(&items);
        let next = remove(&items, 0).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].product_name(), "Nut");
        assert_eq!(before - invoice_total(&next), dec("180"));
        assert!(remove(&next, 1).is_none());
    }

    #[test]
    fn apply_dispatches() {
        let items = grid();
        let next = apply(&items, &LineEdit::Remove { index: 1 }).unwrap();
        assert_eq!(next.len(), 1);
        let next = apply(
            &items,
            &LineEdit::ChangeField {
                index: 1,
                field: NumericField::Discount,
                raw: "20",
            },
        )
        .unwrap();
        assert_eq!(next[1].total_amount(), &dec("16"));
    }
}
