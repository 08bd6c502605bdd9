use crate::report::{run_list, run_results, ListArgs, ResultsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use polls::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "polls",
    about = "Serve the polls site or inspect a poll fixture from the command line",
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
    /// Inspect the questions stored in a fixture
    Polls {
        #[command(subcommand)]
        command: PollsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PollsCommand {
    /// Print the latest published questions
    List(ListArgs),
    /// Print the vote tallies for one question
    Results(ResultsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the store from this JSON fixture instead of POLLS_FIXTURE
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Polls {
            command: PollsCommand::List(args),
        } => run_list(args),
        Command::Polls {
            command: PollsCommand::Results(args),
        } => run_results(args),
    }
}
