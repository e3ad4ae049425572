use crate::demo::{run_bank_check, run_demo, BankCheckArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use service_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Service Match",
    about = "Run the service recommendation questionnaire as an HTTP service or on the console",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through the questionnaire on the console with scripted answers
    Demo(DemoArgs),
    /// Inspect question bank documents
    Bank {
        #[command(subcommand)]
        command: BankCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BankCommand {
    /// Validate a JSON question bank and print its outline
    Check(BankCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Bank {
            command: BankCommand::Check(args),
        } => run_bank_check(args),
    }
}
