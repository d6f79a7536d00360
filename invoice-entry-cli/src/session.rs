use std::io::{BufRead, Write};

use invoice_entry::{InvoiceComposer, LineEdit, error::AddContext};
use tracing::debug;

use crate::{
    command::{Command, HELP, RowAction},
    template_env::{render_catalog, render_form},
};

enum Reply {
    Form,
    Catalog,
    Text(String),
    Quit,
}

async fn apply(form: &mut InvoiceComposer, command: Command) -> Reply {
    match command {
        Command::Customer(name) => {
            form.set_customer_name(name);
            Reply::Form
        }
        Command::Products => Reply::Catalog,
        Command::Select(id) => {
            if form.select_product(&id) {
                Reply::Form
            } else {
                Reply::Text(format!("no product with id '{id}'"))
            }
        }
        Command::Draft { field, raw } => {
            form.adjust_draft(field, &raw);
            Reply::Form
        }
        Command::Add => {
            form.commit_draft();
            Reply::Form
        }
        Command::Row { index, action } if index >= form.items().len() => {
            debug!(?action, "edit on missing row");
            Reply::Text(format!("there is no line {}", index + 1))
        }
        Command::Row {
            index,
            action: RowAction::Product(id),
        } => {
            let Some(product) = form.find_product(&id).cloned() else {
                return Reply::Text(format!("no product with id '{id}'"));
            };
            form.edit_line(LineEdit::ChangeProduct {
                index,
                product: Some(&product),
            });
            Reply::Form
        }
        Command::Row {
            index,
            action: RowAction::Field { field, raw },
        } => {
            form.edit_line(LineEdit::ChangeField {
                index,
                field,
                raw: &raw,
            });
            Reply::Form
        }
        Command::Remove(index) => {
            if form.edit_line(LineEdit::Remove { index }) {
                Reply::Form
            } else {
                Reply::Text(format!("there is no line {}", index + 1))
            }
        }
        Command::Show => Reply::Form,
        Command::Submit => {
            // A rejected submission redraws the whole form so the errors at the top are visible
            let outcome = form.submit_invoice().await;
            debug!(?outcome, "submit finished");
            Reply::Form
        }
        Command::Reset => {
            form.reset();
            Reply::Form
        }
        Command::Help => Reply::Text(HELP.to_string()),
        Command::Quit => Reply::Quit,
    }
}

/// Read commands from `input` until it ends or `quit` is given, writing the form to `out` after
/// each one. Blank lines and lines starting with `#` are skipped.
pub async fn run<R: BufRead, W: Write>(
    form: &mut InvoiceComposer,
    env: &minijinja::Environment<'static>,
    input: R,
    out: &mut W,
) -> Result<(), invoice_entry::Error> {
    writeln!(out, "{}", render_form(env, form).map_err(render_error)?)
        .map_err(invoice_entry::Error::from)
        .add_context("writing form")?;

    for line in input.lines() {
        let line = line
            .map_err(invoice_entry::Error::from)
            .add_context("reading command")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let text = match trimmed.parse::<Command>() {
            Ok(command) => match apply(form, command).await {
                Reply::Form => render_form(env, form).map_err(render_error)?,
                Reply::Catalog => render_catalog(env, form.catalog()).map_err(render_error)?,
                Reply::Text(text) => text,
                Reply::Quit => break,
            },
            Err(message) => message,
        };
        writeln!(out, "{text}")
            .map_err(invoice_entry::Error::from)
            .add_context("writing form")?;
    }
    Ok(())
}

fn render_error(e: minijinja::Error) -> invoice_entry::Error {
    invoice_entry::Error::from(format!("{e:?}")).add_context("rendering form")
}
