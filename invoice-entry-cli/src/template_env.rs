use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, RoundingMode};
use invoice_entry::{Draft, InvoiceComposer, Product, Severity};
use minijinja::context;
use serde::Serialize;

/// Shown in front of every total.
pub const CURRENCY: &str = "₹";

pub fn setup_template_env() -> Result<minijinja::Environment<'static>, minijinja::Error> {
    let mut env = minijinja::Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("form.txt", include_str!("../templates/form.txt"))?;
    env.add_template("catalog.txt", include_str!("../templates/catalog.txt"))?;
    Ok(env)
}

/// Two decimal places, half away from zero.
pub fn money(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

fn entry(value: Option<&BigDecimal>) -> String {
    value.map(BigDecimal::to_string).unwrap_or_default()
}

#[derive(Serialize)]
struct DraftView {
    product: String,
    rate: String,
    unit: String,
    qty: String,
    discount: String,
    net_amount: String,
}

impl From<&Draft> for DraftView {
    fn from(draft: &Draft) -> Self {
        let product = draft.product();
        Self {
            product: product
                .map(|p| format!("{} ({})", p.product_name(), p.product_id()))
                .unwrap_or_else(|| String::from("(none)")),
            rate: money(&draft.rate()),
            unit: product.map(|p| p.unit().to_string()).unwrap_or_default(),
            qty: entry(draft.qty()),
            discount: entry(draft.discount()),
            net_amount: money(&draft.net_amount()),
        }
    }
}

#[derive(Serialize)]
struct LineView {
    product: String,
    rate: String,
    unit: String,
    qty: String,
    discount: String,
    net_amount: String,
    total_amount: String,
}

#[derive(Serialize)]
struct NoticeView<'a> {
    severity: &'static str,
    message: &'a str,
}

#[derive(Serialize)]
struct ProductView<'a> {
    id: String,
    name: &'a str,
    rate: String,
    unit: &'a str,
}

pub fn render_form(
    env: &minijinja::Environment<'static>,
    form: &InvoiceComposer,
) -> Result<String, minijinja::Error> {
    let template = env.get_template("form.txt")?;
    let errors: BTreeMap<String, String> = form
        .errors()
        .iter()
        .map(|(field, message)| (field.to_string(), format!("   ! {message}")))
        .collect();
    let lines: Vec<LineView> = form
        .items()
        .iter()
        .map(|l| LineView {
            product: l.product_name().to_string(),
            rate: money(l.rate()),
            unit: l.unit().to_string(),
            qty: entry(l.qty()),
            discount: entry(l.discount()),
            net_amount: money(l.net_amount()),
            total_amount: money(l.total_amount()),
        })
        .collect();
    let notice = form.notification().map(|n| NoticeView {
        severity: match n.severity() {
            Severity::Success => "success",
            Severity::Error => "error",
        },
        message: n.message(),
    });
    template.render(context! {
        customer_name => form.customer_name(),
        errors => errors,
        draft => DraftView::from(form.draft()),
        can_add => form.can_add_item(),
        lines => lines,
        total => money(&form.invoice_total()),
        currency => CURRENCY,
        can_submit => form.can_submit(),
        notice => notice,
    })
}

pub fn render_catalog(
    env: &minijinja::Environment<'static>,
    products: &[Product],
) -> Result<String, minijinja::Error> {
    let template = env.get_template("catalog.txt")?;
    let products: Vec<ProductView> = products
        .iter()
        .map(|p| ProductView {
            id: p.product_id().to_string(),
            name: p.product_name(),
            rate: money(p.rate()),
            unit: p.unit(),
        })
        .collect();
    template.render(context! {
        products => products,
        currency => CURRENCY,
    })
}
