use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use clap::Parser;
use invoice_entry::error::AddContext;

#[derive(Debug, Parser)]
#[command(about = "Fill in and submit an invoice from the terminal")]
pub struct Cli {
    /// Base URL of the invoicing API serving /products and /invoices
    #[arg(short, long, env = "INVOICE_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Path to a file with one form command per line. Commands are read from stdin when omitted
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "INVOICE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn command_source(&self) -> Result<Box<dyn BufRead>, invoice_entry::Error> {
        match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .map_err(invoice_entry::Error::from)
                    .add_context(&format!(
                        "opening command script '{}'",
                        path.to_string_lossy()
                    ))?;
                Ok(Box::new(BufReader::new(file)))
            }
            None => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["invoice-entry-cli", "--api-url", "http://api:9000"]).unwrap();
        assert_eq!(cli.api_url, "http://api:9000");
        assert!(cli.script.is_none());
    }

    #[test]
    fn missing_script_is_reported() {
        let cli = Cli::try_parse_from(["invoice-entry-cli", "-s", "/nonexistent/form.txt"]).unwrap();
        let err = cli.command_source().err().unwrap();
        assert!(err.to_string().starts_with("opening command script '/nonexistent/form.txt'"));
    }
}
