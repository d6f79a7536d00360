//! Invoice domain types and serialization helpers.
//!
//! This module defines the catalog [`Product`], the committed [`LineItem`], and the
//! [`InvoicePayload`] sent to the API. Monetary values are [`BigDecimal`] and are written to JSON
//! as strings so no precision is lost on the way out. On the way in, the catalog may send rates
//! either as strings or as plain JSON numbers, so both are accepted.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use derive_builder::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calculations::{net_amount, total_amount};

fn serialize_bigdecimal<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

fn serialize_optional_bigdecimal<S>(
    value: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serialize_bigdecimal(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl DecimalRepr {
    fn into_bigdecimal(self) -> Result<BigDecimal, String> {
        match self {
            DecimalRepr::Text(s) => BigDecimal::from_str(s.trim()).map_err(|e| e.to_string()),
            DecimalRepr::Integer(i) => Ok(BigDecimal::from(i)),
            // f64's Display is the shortest string that round-trips, so 10.99 stays 10.99
            DecimalRepr::Float(f) => BigDecimal::from_str(&f.to_string()).map_err(|e| e.to_string()),
        }
    }
}

fn deserialize_bigdecimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    DecimalRepr::deserialize(deserializer)?
        .into_bigdecimal()
        .map_err(serde::de::Error::custom)
}

fn deserialize_optional_bigdecimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<DecimalRepr>::deserialize(deserializer)? {
        Some(repr) => repr
            .into_bigdecimal()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A catalog identifier. The API may use numeric or textual ids; whichever it sends is echoed
/// back unchanged when the invoice is saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Number(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Text(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        ProductId::Text(value)
    }
}

impl ProductId {
    /// Whether this id is the one a user typed. Numeric ids match their decimal rendering.
    pub fn matches(&self, typed: &str) -> bool {
        match self {
            ProductId::Number(n) => typed.trim().parse::<i64>().is_ok_and(|t| t == *n),
            ProductId::Text(s) => s == typed.trim(),
        }
    }
}

/// An entry of the product catalog, as served by `GET /products`.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), pattern = "owned")]
pub struct Product {
    product_id: ProductId,
    product_name: String,
    #[serde(
        default,
        serialize_with = "serialize_bigdecimal",
        deserialize_with = "deserialize_bigdecimal"
    )]
    #[builder(default)]
    rate: BigDecimal,
    #[serde(default)]
    #[builder(default)]
    unit: String,
}

impl Product {
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Unit price before discount.
    pub fn rate(&self) -> &BigDecimal {
        &self.rate
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// A product committed to the invoice together with its quantity, discount and derived amounts.
///
/// `qty` and `discount` are `None` while the user has cleared the cell to retype it. The amounts
/// are always derived from rate, discount and qty, never set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    product_id: ProductId,
    product_name: String,
    #[serde(
        serialize_with = "serialize_bigdecimal",
        deserialize_with = "deserialize_bigdecimal"
    )]
    rate: BigDecimal,
    unit: String,
    #[serde(
        serialize_with = "serialize_optional_bigdecimal",
        deserialize_with = "deserialize_optional_bigdecimal"
    )]
    qty: Option<BigDecimal>,
    #[serde(
        serialize_with = "serialize_optional_bigdecimal",
        deserialize_with = "deserialize_optional_bigdecimal"
    )]
    discount: Option<BigDecimal>,
    #[serde(
        rename = "netAmount",
        serialize_with = "serialize_bigdecimal",
        deserialize_with = "deserialize_bigdecimal"
    )]
    net_amount: BigDecimal,
    #[serde(
        rename = "totalAmount",
        serialize_with = "serialize_bigdecimal",
        deserialize_with = "deserialize_bigdecimal"
    )]
    total_amount: BigDecimal,
}

impl LineItem {
    /// Create a line for `product` with the given quantity and discount, amounts computed.
    pub fn new(product: &Product, qty: BigDecimal, discount: BigDecimal) -> Self {
        let mut item = Self {
            product_id: product.product_id.clone(),
            product_name: product.product_name.clone(),
            rate: product.rate.clone(),
            unit: product.unit.clone(),
            qty: Some(qty),
            discount: Some(discount),
            net_amount: BigDecimal::from(0),
            total_amount: BigDecimal::from(0),
        };
        item.recompute();
        item
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn rate(&self) -> &BigDecimal {
        &self.rate
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The quantity, or `None` while the cell is cleared.
    pub fn qty(&self) -> Option<&BigDecimal> {
        self.qty.as_ref()
    }

    /// The discount percentage, or `None` while the cell is cleared.
    pub fn discount(&self) -> Option<&BigDecimal> {
        self.discount.as_ref()
    }

    pub fn net_amount(&self) -> &BigDecimal {
        &self.net_amount
    }

    pub fn total_amount(&self) -> &BigDecimal {
        &self.total_amount
    }

    /// Replace the product columns, keeping quantity and discount.
    pub(crate) fn set_product(&mut self, product: &Product) {
        self.product_id = product.product_id.clone();
        self.product_name = product.product_name.clone();
        self.rate = product.rate.clone();
        self.unit = product.unit.clone();
    }

    pub(crate) fn set_qty(&mut self, qty: Option<BigDecimal>) {
        self.qty = qty;
    }

    pub(crate) fn set_discount(&mut self, discount: Option<BigDecimal>) {
        self.discount = discount;
    }

    /// Recompute net and total from rate, discount and qty. A cleared cell counts as zero.
    pub(crate) fn recompute(&mut self) {
        let zero = BigDecimal::from(0);
        let discount = self.discount.as_ref().unwrap_or(&zero);
        let qty = self.qty.as_ref().unwrap_or(&zero);
        self.net_amount = net_amount(&self.rate, discount);
        self.total_amount = total_amount(&self.net_amount, qty);
    }
}

/// Sum of the line totals. Recomputed on every call.
pub fn invoice_total(items: &[LineItem]) -> BigDecimal {
    items.iter().map(|l| l.total_amount.clone()).sum()
}

/// Body of `POST /invoices`.
#[derive(Debug, Serialize)]
pub struct InvoicePayload<'a> {
    #[serde(rename = "customerName")]
    customer_name: &'a str,
    items: &'a [LineItem],
    #[serde(rename = "totalAmount", serialize_with = "serialize_bigdecimal")]
    total_amount: BigDecimal,
}

impl<'a> InvoicePayload<'a> {
    /// Build the payload, computing the invoice total from `items`.
    pub fn new(customer_name: &'a str, items: &'a [LineItem]) -> Self {
        Self {
            customer_name,
            items,
            total_amount: invoice_total(items),
        }
    }

    pub fn total_amount(&self) -> &BigDecimal {
        &self.total_amount
    }
}
