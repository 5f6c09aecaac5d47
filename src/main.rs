// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use tokio::runtime::Runtime;

use banking_client::logging::{setup_logging, LogTarget};
use banking_client::{
    ClientConfig, CreateAccountField, CreateAccountView, CustomerLookupView, HttpBankApi,
    LookupField, RequestState,
};

const USAGE: &str = "\
Usage: banking-client [--api-url <url>] [--path <route>] [command]

Commands:
  (none)                                     interactive terminal UI, opened at --path
                                             (/create-account/current or /get-customer)
  get-customer <id>                          print a customer with accounts and transactions
  create-account <customerId> <initialCredit> open a current account
  help                                       show this message

Configuration: banking-client.toml, BANKING_API_URL, BANKING_TIMEOUT_SECS, BANKING_LOG_LEVEL";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut config = ClientConfig::load().context("failed to load configuration")?;
    if let Some(api_url) = take_option(&mut args, "--api-url")? {
        config = config.with_api_url(api_url);
    }
    let start_path = take_option(&mut args, "--path")?;

    let runtime = Runtime::new().context("failed to start async runtime")?;

    match args.first().map(String::as_str) {
        Some("get-customer") => {
            setup_logging(&config.log_level, LogTarget::Stderr)?;
            let id = args.get(1).context("get-customer needs a customer id")?;
            run_get_customer(&runtime, &config, id)?;
        }
        Some("create-account") => {
            setup_logging(&config.log_level, LogTarget::Stderr)?;
            let (Some(customer_id), Some(initial_credit)) = (args.get(1), args.get(2)) else {
                bail!("create-account needs <customerId> <initialCredit>");
            };
            run_create_account(&runtime, &config, customer_id, initial_credit)?;
        }
        Some("help") | Some("--help") | Some("-h") => println!("{}", USAGE),
        Some(other) => bail!("unknown command '{}'\n\n{}", other, USAGE),
        None => run_ui_mode(&runtime, &config, start_path.as_deref())?,
    }

    Ok(())
}

/// Removes `--name <value>` (or `--name=<value>`) from `args`.
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    let prefix = format!("{}=", name);

    if let Some(pos) = args.iter().position(|a| a.starts_with(&prefix)) {
        let arg = args.remove(pos);
        return Ok(Some(arg[prefix.len()..].to_string()));
    }

    match args.iter().position(|a| a == name) {
        Some(pos) if pos + 1 < args.len() => {
            let value = args.remove(pos + 1);
            args.remove(pos);
            Ok(Some(value))
        }
        Some(_) => bail!("{} needs a value", name),
        None => Ok(None),
    }
}

fn run_get_customer(runtime: &Runtime, config: &ClientConfig, id: &str) -> Result<()> {
    let api = HttpBankApi::from_config(config)?;

    println!("🔍 Looking up customer {} at {}", id, api.base_url());

    let mut view = CustomerLookupView::new();
    view.on_change(LookupField::CustomerId, id);
    runtime.block_on(view.submit_with(&api));

    match view.state() {
        RequestState::Success(_) => {
            println!();
            for line in view.render_lines() {
                println!("{}", line);
            }
            Ok(())
        }
        RequestState::Error(message) => bail!("{}", message),
        other => bail!("lookup ended in unexpected state: {}", other.label()),
    }
}

fn run_create_account(
    runtime: &Runtime,
    config: &ClientConfig,
    customer_id: &str,
    initial_credit: &str,
) -> Result<()> {
    let api = HttpBankApi::from_config(config)?;

    println!(
        "💳 Opening current account for customer {} with initial credit {}",
        customer_id, initial_credit
    );

    let mut view = CreateAccountView::new();
    view.on_change(CreateAccountField::CustomerId, customer_id);
    view.on_change(CreateAccountField::InitialCredit, initial_credit);
    runtime.block_on(view.submit_with(&api));

    if view.is_success() {
        for line in view.render_lines() {
            println!("✅ {}", line);
        }
        return Ok(());
    }

    if let Some(message) = view.state().error() {
        bail!("{}", message);
    }

    match view.last_rejection() {
        Some(rejection) => {
            eprintln!("❌ Account not created (HTTP {})", rejection.status);
            if let Some(message) = &rejection.message {
                eprintln!("   {}", message);
            }
        }
        None => eprintln!("❌ Account not created"),
    }
    std::process::exit(1);
}

#[cfg(feature = "tui")]
fn run_ui_mode(runtime: &Runtime, config: &ClientConfig, start_path: Option<&str>) -> Result<()> {
    use banking_client::{BankApi, Route};
    use std::path::PathBuf;
    use std::sync::Arc;

    setup_logging(&config.log_level, LogTarget::File(PathBuf::from("banking-client.log")))?;

    let api: Arc<dyn BankApi> = Arc::new(HttpBankApi::from_config(config)?);
    let route = match start_path {
        Some(path) => Route::from_path(path).with_context(|| format!("no screen at path '{}'", path))?,
        None => Route::CreateCurrentAccount,
    };

    let mut app = ui::App::new(api, runtime.handle().clone(), config.api_url.clone(), route);
    ui::run_ui(&mut app)?;

    println!("\n✅ Banking client closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_runtime: &Runtime, _config: &ClientConfig, _start_path: Option<&str>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: banking-client get-customer <id>");
    std::process::exit(1);
}
