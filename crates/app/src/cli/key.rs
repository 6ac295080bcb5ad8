use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use clap::{Args, Subcommand};
use vaultpark::signing::SigningKey;

#[derive(Debug, Args)]
pub(crate) struct KeyCommand {
    #[command(subcommand)]
    command: KeySubcommand,
}

#[derive(Debug, Subcommand)]
enum KeySubcommand {
    /// Print a new random base64 signing key
    Generate,
}

pub(crate) fn run(command: KeyCommand) -> Result<(), String> {
    match command.command {
        KeySubcommand::Generate => {
            let key = SigningKey::generate();

            println!("{}", BASE64.encode(key.as_bytes()));

            Ok(())
        }
    }
}
