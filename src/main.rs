use std::process::ExitCode;
use std::time::Duration;

use a2a_tck::client::SutClient;
use a2a_tck::config::{parse_timeout_secs, SutConfig, ENV_SUT_URL};
use a2a_tck::logging;
use a2a_tck::suite::{default_checks, Category, SuiteRunner};
use clap::Parser;
use tracing::{error, info};

/// Run the A2A conformance checks against a live SUT.
#[derive(Debug, Parser)]
#[command(name = "a2a-tck", version, about)]
struct Args {
    /// JSON-RPC endpoint of the SUT. Falls back to the SUT_URL variable.
    #[arg(long)]
    sut_url: Option<String>,

    /// Per-request timeout in seconds (a positive integer).
    #[arg(long = "timeout-secs", value_name = "SECS", value_parser = parse_timeout_secs)]
    timeout: Option<Duration>,

    /// Bearer token sent in the Authorization header.
    #[arg(long)]
    bearer_token: Option<String>,

    /// Only run checks in these categories (repeatable).
    #[arg(long = "category", value_enum)]
    categories: Vec<Category>,

    /// Only run checks whose name contains this text.
    #[arg(long)]
    filter: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn sut_config(&self) -> Result<SutConfig, a2a_tck::TckError> {
        let mut config = match &self.sut_url {
            Some(url) => {
                // Env still supplies timeout and token when the URL comes from the CLI.
                SutConfig::from_lookup(|key| {
                    if key == ENV_SUT_URL {
                        Some(url.clone())
                    } else {
                        std::env::var(key).ok()
                    }
                })?
            }
            None => SutConfig::from_env()?,
        };
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(token) = &self.bearer_token {
            config = config.with_bearer_token(token.clone());
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let client = match args.sut_config().and_then(SutClient::new) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    let mut runner = SuiteRunner::new().with_categories(args.categories.iter().copied());
    if let Some(filter) = &args.filter {
        runner = runner.with_filter(filter.clone());
    }

    info!(sut_url = %client.config().url, "starting conformance run");
    let report = runner.run(&client, &default_checks()).await;
    println!("{report}");

    if report.is_compliant() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
