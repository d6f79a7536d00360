use std::io;

use clap::Parser;
use invoice_entry::{ApiClient, ApiConfigBuilder, InvoiceComposer, error::AddContext};
use tracing_subscriber::EnvFilter;

use crate::{cli::Cli, template_env::setup_template_env};

mod cli;
mod command;
mod session;
mod template_env;

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), invoice_entry::Error> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = ApiConfigBuilder::default()
        .base_url(cli.api_url.clone())
        .build()
        .map_err(|e| invoice_entry::Error::from(format!("{:?}", e)))
        .add_context("configuring api client")?;
    let mut form = InvoiceComposer::new(ApiClient::new(config));
    form.load_products().await;

    let input = cli
        .command_source()
        .add_context("reading form commands from cli")?;
    let env = setup_template_env()
        .map_err(|e| invoice_entry::Error::from(format!("{:?}", e)))
        .add_context("setting up templating environment")?;
    let stdout = io::stdout();
    session::run(&mut form, &env, input, &mut stdout.lock())
        .await
        .add_context("running invoice form")?;
    Ok(())
}
