//! Inline field errors shown next to the offending input.

use std::{collections::BTreeMap, fmt};

/// Every form field that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CustomerName,
    Product,
    Qty,
    Discount,
    Items,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::CustomerName => "customerName",
            Field::Product => "product",
            Field::Qty => "qty",
            Field::Discount => "discount",
            Field::Items => "items",
        };
        write!(f, "{name}")
    }
}

/// A set of field errors. Empty means the checked data is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors in form order, top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_form_order() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::Items, "Add at least one product");
        errors.insert(Field::CustomerName, "Customer name is required");
        let order: Vec<_> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec![Field::CustomerName, Field::Items]);
    }

    #[test]
    fn clear_removes_only_that_field() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::Qty, "Qty must be greater than 0");
        errors.insert(Field::Discount, "Discount must be 0–100");
        errors.clear(Field::Qty);
        assert!(!errors.contains(Field::Qty));
        assert_eq!(errors.iter().count(), 1);
        assert_eq!(errors.get(Field::Discount), Some("Discount must be 0–100"));
        assert_eq!(Field::Discount.to_string(), "discount");
    }
}
