//! The line item being configured before it is added to the invoice.
//!
//! A draft is either [`Draft::Empty`] (no product chosen yet, though quantity and discount may
//! already be typed) or [`Draft::Configuring`] a chosen product. Unlike the grid, out-of-range
//! quantities and discounts typed into the draft are clamped rather than refused.

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::{
    calculations::{net_amount, total_amount},
    input::{NumericField, RawInput},
    invoice::{LineItem, Product},
    validation::{Field, FieldErrors},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Empty {
        qty: Option<BigDecimal>,
        discount: Option<BigDecimal>,
    },
    Configuring {
        product: Product,
        qty: Option<BigDecimal>,
        discount: Option<BigDecimal>,
        net_amount: BigDecimal,
        total_amount: BigDecimal,
    },
}

impl Default for Draft {
    fn default() -> Self {
        Draft::Empty {
            qty: Some(default_qty()),
            discount: Some(default_discount()),
        }
    }
}

fn default_qty() -> BigDecimal {
    BigDecimal::from(1)
}

fn default_discount() -> BigDecimal {
    BigDecimal::from(0)
}

impl Draft {
    /// The chosen product, if any.
    pub fn product(&self) -> Option<&Product> {
        match self {
            Draft::Empty { .. } => None,
            Draft::Configuring { product, .. } => Some(product),
        }
    }

    pub fn qty(&self) -> Option<&BigDecimal> {
        match self {
            Draft::Empty { qty, .. } | Draft::Configuring { qty, .. } => qty.as_ref(),
        }
    }

    pub fn discount(&self) -> Option<&BigDecimal> {
        match self {
            Draft::Empty { discount, .. } | Draft::Configuring { discount, .. } => {
                discount.as_ref()
            }
        }
    }

    /// Rate of the chosen product, zero while empty.
    pub fn rate(&self) -> BigDecimal {
        self.product()
            .map(|p| p.rate().clone())
            .unwrap_or_default()
    }

    pub fn net_amount(&self) -> BigDecimal {
        match self {
            Draft::Empty { .. } => BigDecimal::from(0),
            Draft::Configuring { net_amount, .. } => net_amount.clone(),
        }
    }

    pub fn total_amount(&self) -> BigDecimal {
        match self {
            Draft::Empty { .. } => BigDecimal::from(0),
            Draft::Configuring { total_amount, .. } => total_amount.clone(),
        }
    }

    /// Choose `product`. Quantity and discount carry over only if they currently hold a number;
    /// a cleared field falls back to its default.
    pub fn select(&self, product: &Product) -> Draft {
        let qty = self.qty().cloned().unwrap_or_else(default_qty);
        let discount = self.discount().cloned().unwrap_or_else(default_discount);
        let net = net_amount(product.rate(), &discount);
        let total = total_amount(&net, &qty);
        Draft::Configuring {
            product: product.clone(),
            qty: Some(qty),
            discount: Some(discount),
            net_amount: net,
            total_amount: total,
        }
    }

    /// Apply raw text typed into quantity or discount.
    ///
    /// Returns `None` for non-numeric text. A blank value clears the field without recomputing.
    /// Numbers are clamped (quantity to at least one, discount into `0..=100`), the other field is
    /// filled with its default if it was cleared, and the amounts are recomputed.
    pub fn adjust(&self, field: NumericField, raw: &str) -> Option<Draft> {
        let value = match RawInput::parse(raw) {
            RawInput::Blank => return Some(self.with_field(field, None)),
            RawInput::Invalid => {
                debug!(%field, raw, "draft refused non-numeric input");
                return None;
            }
            RawInput::Number(n) => n,
        };

        let (qty, discount) = match field {
            NumericField::Qty => (
                value.max(default_qty()),
                self.discount().cloned().unwrap_or_else(default_discount),
            ),
            NumericField::Discount => (
                self.qty().cloned().unwrap_or_else(default_qty),
                value.max(BigDecimal::from(0)).min(BigDecimal::from(100)),
            ),
        };

        Some(match self {
            Draft::Empty { .. } => Draft::Empty {
                qty: Some(qty),
                discount: Some(discount),
            },
            Draft::Configuring { product, .. } => {
                let net = net_amount(product.rate(), &discount);
                let total = total_amount(&net, &qty);
                Draft::Configuring {
                    product: product.clone(),
                    qty: Some(qty),
                    discount: Some(discount),
                    net_amount: net,
                    total_amount: total,
                }
            }
        })
    }

    fn with_field(&self, field: NumericField, value: Option<BigDecimal>) -> Draft {
        let mut next = self.clone();
        match (&mut next, field) {
            (Draft::Empty { qty, .. }, NumericField::Qty)
            | (Draft::Configuring { qty, .. }, NumericField::Qty) => *qty = value,
            (Draft::Empty { discount, .. }, NumericField::Discount)
            | (Draft::Configuring { discount, .. }, NumericField::Discount) => *discount = value,
        }
        next
    }

    /// Check the draft is ready to be added to the invoice.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.product().is_none() {
            errors.insert(Field::Product, "Select a product");
        }
        match self.qty() {
            Some(q) if *q > BigDecimal::from(0) => {}
            _ => errors.insert(Field::Qty, "Qty must be greater than 0"),
        }
        match self.discount() {
            Some(d) if *d >= BigDecimal::from(0) && *d <= BigDecimal::from(100) => {}
            _ => errors.insert(Field::Discount, "Discount must be 0–100"),
        }
        errors
    }

    /// Turn a valid draft into a line item. Returns the errors if the draft is not valid.
    pub fn to_line_item(&self) -> Result<LineItem, FieldErrors> {
        let errors = self.validate();
        match (self.product(), self.qty(), self.discount()) {
            (Some(product), Some(qty), Some(discount)) if errors.is_empty() => {
                Ok(LineItem::new(product, qty.clone(), discount.clone()))
            }
            _ => Err(errors),
        }
    }
}
