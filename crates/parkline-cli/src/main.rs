use clap::Parser;

mod cli;
pub mod exit_codes;
mod logging;

use cli::args::Cli;
use cli::commands::dispatch;
use parkline_client::ErrorBody;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "fatal");
            let body = ErrorBody {
                error: format!("{:#}", e),
            };
            println!(
                "{}",
                serde_json::to_string(&body).unwrap_or_else(|_| body.error.clone())
            );
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}
