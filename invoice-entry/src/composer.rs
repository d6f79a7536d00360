//! The invoice form as a whole.
//!
//! [`InvoiceComposer`] owns everything the form shows: the customer name, the product catalog,
//! the draft line, the committed lines, the inline field errors and the current notification.
//! Edits to committed lines go through [`crate::editor`], which hands back a replacement list
//! that the composer installs.

use std::time::Instant;

use bigdecimal::BigDecimal;
use tracing::{debug, error, info};

use crate::{
    client::ApiClient,
    draft::Draft,
    editor::{self, LineEdit},
    input::NumericField,
    invoice::{InvoicePayload, LineItem, Product, invoice_total},
    notification::Notification,
    validation::{Field, FieldErrors},
};

/// Result of [`InvoiceComposer::submit_invoice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form did not validate; no request was made. The front end should bring the top of the
    /// form, where the errors are, into view.
    Rejected,
    Saved,
    /// The API refused or could not be reached. The form is left as it was.
    Failed,
}

#[derive(Debug)]
pub struct InvoiceComposer {
    api: ApiClient,
    catalog: Vec<Product>,
    customer_name: String,
    draft: Draft,
    items: Vec<LineItem>,
    errors: FieldErrors,
    notification: Option<Notification>,
}

impl InvoiceComposer {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            catalog: Vec::new(),
            customer_name: String::new(),
            draft: Draft::default(),
            items: Vec::new(),
            errors: FieldErrors::default(),
            notification: None,
        }
    }

    /// Fetch the product catalog. On failure an error notice is raised and the catalog stays
    /// empty; the rest of the form keeps working.
    pub async fn load_products(&mut self) {
        match self.api.fetch_products().await {
            Ok(products) => self.catalog = products,
            Err(e) => {
                error!(error = %e, "failed to load products");
                self.catalog.clear();
                self.notification = Some(Notification::error("Failed to load products"));
            }
        }
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Look up a catalog entry by the id a user typed.
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.catalog
            .iter()
            .find(|p| p.product_id().matches(product_id))
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
        if !self.customer_name.trim().is_empty() {
            self.errors.clear(Field::CustomerName);
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Choose the draft's product. Returns `false` without changing anything if no catalog entry
    /// has that id.
    pub fn select_product(&mut self, product_id: &str) -> bool {
        let Some(product) = self
            .catalog
            .iter()
            .find(|p| p.product_id().matches(product_id))
        else {
            debug!(product_id, "no such product");
            return false;
        };
        self.draft = self.draft.select(product);
        self.errors.clear(Field::Product);
        true
    }

    /// Apply raw text typed into the draft's quantity or discount. Returns `false` if the text
    /// was refused.
    pub fn adjust_draft(&mut self, field: NumericField, raw: &str) -> bool {
        let Some(next) = self.draft.adjust(field, raw) else {
            return false;
        };
        self.draft = next;
        // clearing a field to retype it leaves its error showing
        if raw.trim().is_empty() {
            return true;
        }
        self.errors.clear(match field {
            NumericField::Qty => Field::Qty,
            NumericField::Discount => Field::Discount,
        });
        true
    }

    /// Check the draft without touching the displayed errors.
    pub fn validate_draft(&self) -> FieldErrors {
        self.draft.validate()
    }

    /// Add the draft to the invoice. On failure the errors are installed for display and nothing
    /// else changes.
    pub fn commit_draft(&mut self) -> bool {
        match self.draft.to_line_item() {
            Ok(item) => {
                debug!(product = item.product_name(), total = %item.total_amount(), "line added");
                let mut next = self.items.clone();
                next.push(item);
                self.items = next;
                self.draft = Draft::default();
                self.errors = FieldErrors::default();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    pub fn can_add_item(&self) -> bool {
        self.draft.product().is_some()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Apply a grid edit. Returns `false` if the editor refused it.
    pub fn edit_line(&mut self, edit: LineEdit<'_>) -> bool {
        match editor::apply(&self.items, &edit) {
            Some(next) => {
                self.items = next;
                true
            }
            None => false,
        }
    }

    /// Sum of the line totals, recomputed on every call.
    pub fn invoice_total(&self) -> BigDecimal {
        invoice_total(&self.items)
    }

    /// Check the invoice as a whole without touching the displayed errors.
    pub fn validate_invoice(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.customer_name.trim().is_empty() {
            errors.insert(Field::CustomerName, "Customer name is required");
        }
        if self.items.is_empty() {
            errors.insert(Field::Items, "Add at least one product");
        }
        errors
    }

    pub fn can_submit(&self) -> bool {
        !self.items.is_empty()
    }

    /// Validate and save the invoice.
    ///
    /// On success the customer name, lines and errors are cleared. On failure everything stays
    /// so the user can retry. Holding `&mut self` for the duration of the request means a second
    /// submission cannot start while one is in flight.
    pub async fn submit_invoice(&mut self) -> SubmitOutcome {
        self.errors = self.validate_invoice();
        if !self.errors.is_empty() {
            return SubmitOutcome::Rejected;
        }

        let payload = InvoicePayload::new(&self.customer_name, &self.items);
        match self.api.post_invoice(&payload).await {
            Ok(()) => {
                info!(
                    customer = %self.customer_name,
                    lines = self.items.len(),
                    total = %payload.total_amount(),
                    "invoice saved"
                );
                self.notification = Some(Notification::success("Invoice saved successfully"));
                self.customer_name.clear();
                self.items = Vec::new();
                self.errors = FieldErrors::default();
                SubmitOutcome::Saved
            }
            Err(e) => {
                error!(error = %e, "failed to save invoice");
                self.notification = Some(Notification::error("Failed to save invoice"));
                SubmitOutcome::Failed
            }
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The notice currently on screen, if it has not auto-hidden yet.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|n| !n.is_expired_at(Instant::now()))
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Clear the whole form. The catalog is kept.
    pub fn reset(&mut self) {
        self.customer_name.clear();
        self.draft = Draft::default();
        self.items = Vec::new();
        self.errors = FieldErrors::default();
        self.notification = None;
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::{
        client::ApiConfigBuilder,
        invoice::ProductBuilder,
        notification::Severity,
    };

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    // Points at a port nothing listens on; tests here never reach the network.
    fn composer() -> InvoiceComposer {
        let api = ApiClient::new(
            ApiConfigBuilder::default()
                .base_url("http://127.0.0.1:9")
                .build()
                .unwrap(),
        );
        let mut c = InvoiceComposer::new(api);
        c.catalog = vec![
            ProductBuilder::default()
                .product_id(1i64)
                .product_name("Cement")
                .rate(dec("100"))
                .unit("bag")
                .build()
                .unwrap(),
            ProductBuilder::default()
                .product_id(2i64)
                .product_name("Sand")
                .rate(dec("20"))
                .unit("kg")
                .build()
                .unwrap(),
        ];
        c
    }

    #[test]
    fn commit_without_product_sets_product_error() {
        let mut c = composer();
        assert!(!c.can_add_item());
        assert!(!c.commit_draft());
        assert!(c.items().is_empty());
        assert_eq!(c.errors().get(Field::Product), Some("Select a product"));
    }

    #[test]
    fn commit_appends_and_resets_draft() {
        let mut c = composer();
        assert!(c.select_product("1"));
        assert!(c.adjust_draft(NumericField::Qty, "2"));
        assert!(c.adjust_draft(NumericField::Discount, "10"));
        assert!(c.commit_draft());

        assert_eq!(c.items().len(), 1);
        assert_eq!(c.items()[0].net_amount(), &dec("90.00"));
        assert_eq!(c.items()[0].total_amount(), &dec("180.00"));
        assert_eq!(c.draft(), &Draft::default());
        assert!(c.errors().is_empty());
        assert_eq!(c.invoice_total(), dec("180"));
    }

    #[test]
    fn unknown_product_is_ignored() {
        let mut c = composer();
        assert!(!c.select_product("99"));
        assert!(c.draft().product().is_none());
    }

    #[test]
    fn draft_clamps_where_grid_refuses() {
        let mut c = composer();
        c.select_product("1");
        c.adjust_draft(NumericField::Qty, "0");
        assert_eq!(c.draft().qty(), Some(&dec("1")));
        c.adjust_draft(NumericField::Discount, "150");
        assert_eq!(c.draft().discount(), Some(&dec("100")));
        c.adjust_draft(NumericField::Discount, "0");
        c.commit_draft();

        assert!(!c.edit_line(LineEdit::ChangeField {
            index: 0,
            field: NumericField::Qty,
            raw: "0",
        }));
        assert_eq!(c.items()[0].qty(), Some(&dec("1")));
    }

    #[test]
    fn adjusting_clears_that_fields_error() {
        let mut c = composer();
        c.adjust_draft(NumericField::Qty, "");
        c.commit_draft();
        assert!(c.errors().contains(Field::Qty));
        assert!(c.errors().contains(Field::Product));
        c.adjust_draft(NumericField::Qty, "");
        assert!(c.errors().contains(Field::Qty));
        c.adjust_draft(NumericField::Qty, "3");
        assert!(!c.errors().contains(Field::Qty));
        assert!(c.errors().contains(Field::Product));
    }

    #[test]
    fn total_tracks_grid_edits() {
        let mut c = composer();
        c.select_product("1");
        c.commit_draft();
        c.select_product("2");
        c.adjust_draft(NumericField::Qty, "5");
        c.commit_draft();
        assert_eq!(c.invoice_total(), dec("200"));

        let sand = c.find_product("2").cloned();
        assert!(c.edit_line(LineEdit::ChangeProduct {
            index: 0,
            product: sand.as_ref(),
        }));
        assert_eq!(c.invoice_total(), dec("120"));

        let removed = c.items()[1].total_amount().clone();
        let before = c.invoice_total();
        assert!(c.edit_line(LineEdit::Remove { index: 1 }));
        assert_eq!(before - c.invoice_total(), removed);
    }

    #[test]
    fn validate_invoice_checks_name_and_items() {
        let mut c = composer();
        c.set_customer_name("   ");
        let errors = c.validate_invoice();
        assert_eq!(errors.get(Field::CustomerName), Some("Customer name is required"));
        assert_eq!(errors.get(Field::Items), Some("Add at least one product"));
        assert!(!c.can_submit());
    }

    #[tokio::test]
    async fn submit_with_blank_name_is_rejected() {
        let mut c = composer();
        c.select_product("1");
        c.commit_draft();
        assert_eq!(c.submit_invoice().await, SubmitOutcome::Rejected);
        assert!(c.errors().contains(Field::CustomerName));
        assert!(c.notification().is_none());
        assert_eq!(c.items().len(), 1);

        c.set_customer_name("Acme");
        assert!(!c.errors().contains(Field::CustomerName));
    }

    #[tokio::test]
    async fn unreachable_api_keeps_form_for_retry() {
        let mut c = composer();
        c.set_customer_name("Acme");
        c.select_product("2");
        c.commit_draft();
        assert_eq!(c.submit_invoice().await, SubmitOutcome::Failed);
        assert_eq!(c.customer_name(), "Acme");
        assert_eq!(c.items().len(), 1);
        let n = c.notification().unwrap();
        assert_eq!(n.severity(), Severity::Error);
        assert_eq!(n.message(), "Failed to save invoice");
        c.dismiss_notification();
        assert!(c.notification().is_none());
    }

    #[tokio::test]
    async fn valid_submit_drops_leftover_draft_errors() {
        let mut c = composer();
        c.select_product("1");
        assert!(c.commit_draft());
        assert!(!c.commit_draft());
        assert!(c.errors().contains(Field::Product));

        c.set_customer_name("Acme");
        assert_eq!(c.submit_invoice().await, SubmitOutcome::Failed);
        assert!(c.errors().is_empty());
        assert_eq!(c.items().len(), 1);
    }

    #[test]
    fn reset_clears_everything_but_the_catalog() {
        let mut c = composer();
        c.set_customer_name("Acme");
        c.select_product("1");
        c.commit_draft();
        c.select_product("2");
        c.reset();
        assert_eq!(c.customer_name(), "");
        assert!(c.items().is_empty());
        assert_eq!(c.draft(), &Draft::default());
        assert_eq!(c.catalog().len(), 2);
    }
}
