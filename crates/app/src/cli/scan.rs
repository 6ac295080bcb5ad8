use clap::Args;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use vaultpark_app::{
    config::{ScanConfig, TokenConfig},
    context::AppContext,
};

#[derive(Debug, Args)]
pub(crate) struct ScanArgs {
    #[command(flatten)]
    scan: ScanConfig,

    /// Exit with an error after the first rejected token
    #[arg(long)]
    fail_fast: bool,
}

pub(crate) async fn run(args: ScanArgs, token: &TokenConfig) -> Result<(), String> {
    let context = AppContext::from_config(token, &args.scan)
        .map_err(|error| format!("invalid token configuration: {error}"))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|error| format!("failed to read stdin: {error}"))?
    {
        let scanned = line.trim_end_matches('\r');

        if scanned.is_empty() {
            continue;
        }

        let report = match context.gate.scan(scanned).await {
            Ok(outcome) => json!({ "accepted": true, "outcome": outcome }),
            Err(error) => {
                let report = json!({
                    "accepted": false,
                    "reason": error.reason(),
                    "error": error.to_string(),
                });

                if args.fail_fast {
                    println!("{report}");
                    return Err(format!("scan rejected: {error}"));
                }

                report
            }
        };

        println!("{report}");
    }

    Ok(())
}
