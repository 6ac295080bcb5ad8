use clap::Args;
use vaultpark::{
    clock::{Clock, SystemClock},
    codec::TokenCodec,
    expiry::ExpiryPolicy,
};

#[derive(Debug, Args)]
pub(crate) struct VerifyTokenArgs {
    /// Token text as scanned
    token: String,

    /// Skip the freshness check
    #[arg(long)]
    ignore_expiry: bool,
}

pub(crate) fn run(
    args: VerifyTokenArgs,
    codec: &TokenCodec,
    policy: &ExpiryPolicy,
) -> Result<(), String> {
    let claims = if args.ignore_expiry {
        codec.decode(&args.token)
    } else {
        codec.verify(&args.token, policy, SystemClock.now_millis())
    }
    .map_err(|error| format!("token rejected ({}): {error}", error.kind()))?;

    let json = serde_json::to_string_pretty(&claims)
        .map_err(|error| format!("failed to render claims: {error}"))?;

    println!("{json}");

    Ok(())
}
