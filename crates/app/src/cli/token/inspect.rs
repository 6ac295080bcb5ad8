use clap::Args;
use serde_json::json;
use vaultpark::{
    clock::{Clock, SystemClock},
    codec::TokenCodec,
    expiry::ExpiryPolicy,
    token::TokenField,
};

#[derive(Debug, Args)]
pub(crate) struct InspectTokenArgs {
    /// Token text as scanned
    token: String,
}

pub(crate) fn run(
    args: InspectTokenArgs,
    codec: &TokenCodec,
    policy: &ExpiryPolicy,
) -> Result<(), String> {
    let token = args.token.as_str();
    let freshness = codec
        .extract_timestamp(token)
        .map(|timestamp_ms| policy.check(timestamp_ms, SystemClock.now_millis()));

    let report = json!({
        "format": codec.format().to_string(),
        "version": codec.format().version(),
        "algorithm": codec.algorithm().to_string(),
        "format_valid": codec.validate_format(token),
        "integrity_valid": codec.verify_integrity(token),
        "user_id": codec.extract_field(token, TokenField::UserId),
        "vehicle_number": codec.extract_field(token, TokenField::VehicleNumber),
        "timestamp_ms": codec.extract_timestamp(token),
        "fresh": freshness.as_ref().map(Result::is_ok),
        "freshness_error": freshness.and_then(Result::err).map(|error| error.to_string()),
        "gate": codec.extract_field(token, TokenField::Gate),
        "lot": codec.extract_field(token, TokenField::Lot),
        "error": codec.check_integrity(token).err().map(|error| error.to_string()),
    });

    let json = serde_json::to_string_pretty(&report)
        .map_err(|error| format!("failed to render report: {error}"))?;

    println!("{json}");

    Ok(())
}
