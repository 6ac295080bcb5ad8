use clap::Args;
use vaultpark::{
    clock::{Clock, SystemClock},
    codec::TokenCodec,
    token::TokenClaims,
};

#[derive(Debug, Args)]
pub(crate) struct EncodeTokenArgs {
    /// Driver identifier
    #[arg(long)]
    user_id: String,

    /// Plate or vehicle identifier
    #[arg(long = "vehicle")]
    vehicle_number: String,

    /// Creation time in Unix milliseconds; defaults to now
    #[arg(long = "timestamp", allow_negative_numbers = true)]
    timestamp_ms: Option<i64>,

    /// Gate hint (extended format only)
    #[arg(long)]
    gate: Option<String>,

    /// Lot hint (extended format only)
    #[arg(long)]
    lot: Option<String>,

    /// Print the token together with its claims as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(args: EncodeTokenArgs, codec: &TokenCodec) -> Result<(), String> {
    let timestamp_ms = args
        .timestamp_ms
        .unwrap_or_else(|| SystemClock.now_millis());

    let mut claims = TokenClaims::new(args.user_id, args.vehicle_number, timestamp_ms);
    claims.gate = args.gate;
    claims.lot = args.lot;

    let token = codec
        .encode(&claims)
        .map_err(|error| format!("failed to encode token: {error}"))?;

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "token": token.as_str(),
            "claims": claims,
        }))
        .map_err(|error| format!("failed to render token: {error}"))?;

        println!("{json}");
    } else {
        println!("{token}");
    }

    Ok(())
}
