//! State and logic behind an invoice entry form
//!
//! A user names a customer, configures a draft line (product, quantity, discount), adds it to the
//! invoice, adjusts committed lines in a grid and finally saves the invoice through an HTTP API.
//! All amounts are exact decimals; nothing is rounded until it is displayed.
//!
//! The form is driven through [`InvoiceComposer`]. The arithmetic lives in [`calculations`] and
//! the committed-line grid in [`editor`], both usable on their own.
//!
//! # Example
//!
//! ```rust
//! use invoice_entry::{ApiClient, ApiConfigBuilder, InvoiceComposer, NumericField};
//!
//! let api = ApiClient::new(
//!     ApiConfigBuilder::default()
//!         .base_url("http://localhost:8080")
//!         .build()
//!         .unwrap(),
//! );
//! let mut form = InvoiceComposer::new(api);
//! form.set_customer_name("Acme Ltd");
//! form.adjust_draft(NumericField::Qty, "0");
//! assert_eq!(form.draft().qty().unwrap().to_string(), "1");
//! // nothing chosen yet, so this records a `product` error instead of adding a line
//! assert!(!form.commit_draft());
//! ```

pub mod calculations;
pub mod client;
pub mod composer;
pub mod draft;
pub mod editor;
pub mod error;
pub mod input;
pub mod invoice;
pub mod notification;
pub mod validation;

pub use client::{ApiClient, ApiConfig, ApiConfigBuilder, ApiConfigBuilderError};
pub use composer::{InvoiceComposer, SubmitOutcome};
pub use draft::Draft;
pub use editor::LineEdit;
pub use error::Error;
pub use input::NumericField;
pub use invoice::{
    InvoicePayload, LineItem, Product, ProductBuilder, ProductBuilderError, ProductId,
    invoice_total,
};
pub use notification::{Notification, Severity};
pub use validation::{Field, FieldErrors};
