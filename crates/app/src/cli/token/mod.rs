use clap::{Args, Subcommand};
use vaultpark_app::config::TokenConfig;

mod encode;
mod inspect;
mod verify;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue a token for a driver and vehicle
    Encode(encode::EncodeTokenArgs),

    /// Check a token and print its claims
    Verify(verify::VerifyTokenArgs),

    /// Report format, integrity and fields of a token without rejecting it
    Inspect(inspect::InspectTokenArgs),
}

pub(crate) fn run(command: TokenCommand, config: &TokenConfig) -> Result<(), String> {
    let codec = config
        .codec()
        .map_err(|error| format!("invalid token configuration: {error}"))?;

    let policy = config.expiry_policy();

    match command.command {
        TokenSubcommand::Encode(args) => encode::run(args, &codec),
        TokenSubcommand::Verify(args) => verify::run(args, &codec, &policy),
        TokenSubcommand::Inspect(args) => inspect::run(args, &codec, &policy),
    }
}
