use std::str::FromStr;

use invoice_entry::NumericField;

pub const HELP: &str = "\
Commands:
  customer <name>          set the customer name (empty clears it)
  products                 list the product catalog
  select <product_id>      choose the product for the new line
  qty [value]              set the new line's quantity (empty clears it)
  disc [value]             set the new line's discount % (empty clears it)
  add                      add the new line to the invoice
  row <n> product <id>     swap the product on line n
  row <n> qty [value]      change the quantity on line n
  row <n> disc [value]     change the discount % on line n
  remove <n>               delete line n
  show                     redraw the form
  submit                   save the invoice
  reset                    clear the whole form
  help                     show this text
  quit                     leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Customer(String),
    Products,
    Select(String),
    Draft { field: NumericField, raw: String },
    Add,
    /// `index` is zero based.
    Row { index: usize, action: RowAction },
    Remove(usize),
    Show,
    Submit,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Product(String),
    Field { field: NumericField, raw: String },
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn numeric_field(word: &str) -> Option<NumericField> {
    match word {
        "qty" => Some(NumericField::Qty),
        "disc" | "discount" => Some(NumericField::Discount),
        _ => None,
    }
}

/// Rows are shown starting at 1.
fn row_index(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{word}' is not a row number")),
    }
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(rest)
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(line);
        if let Some(field) = numeric_field(word) {
            return Ok(Command::Draft {
                field,
                raw: rest.to_string(),
            });
        }
        match word {
            "customer" => Ok(Command::Customer(rest.to_string())),
            "products" => Ok(Command::Products),
            "select" => Ok(Command::Select(required(rest, "product id")?.to_string())),
            "add" => Ok(Command::Add),
            "row" => {
                let (n, rest) = split_word(required(rest, "row number")?);
                let index = row_index(n)?;
                let (what, value) = split_word(rest);
                let action = match (what, numeric_field(what)) {
                    ("product", _) => {
                        RowAction::Product(required(value, "product id")?.to_string())
                    }
                    (_, Some(field)) => RowAction::Field {
                        field,
                        raw: value.to_string(),
                    },
                    _ => return Err(format!("cannot change '{what}' on a row")),
                };
                Ok(Command::Row { index, action })
            }
            "remove" => Ok(Command::Remove(row_index(required(rest, "row number")?)?)),
            "show" => Ok(Command::Show),
            "submit" => Ok(Command::Submit),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}
