use clap::{Parser, Subcommand};
use vaultpark_app::{
    config::{LoggingConfig, TokenConfig},
    observability,
};

mod key;
mod scan;
mod token;

#[derive(Debug, Parser)]
#[command(name = "vaultpark", about = "Parking QR session tokens", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    token: TokenConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode, verify and inspect tokens
    Token(token::TokenCommand),

    /// Manage signing keys
    Key(key::KeyCommand),

    /// Read tokens from stdin and apply them at a gate
    Scan(scan::ScanArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Token(command) => token::run(command, &self.token),
            Commands::Key(command) => key::run(command),
            Commands::Scan(args) => scan::run(args, &self.token).await,
        }
    }
}
