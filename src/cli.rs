//! CLI entry for the Loritta dashboard, defining clap subcommands and dispatching each command handler.

use clap::{Parser, Subcommand};

use crate::command;

// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(
    about = "Loritta dashboard: OAuth2 login, guild configuration and custom command tooling",
    version = "0.3.1"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// The Commands enum represents the subcommands that can be used with the CLI.
/// subcommand's execute and args are defined in `command` module
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Run the dashboard web server")]
    Serve(command::serve::ServeArgs),
    #[command(about = "Print text as an escaped string literal")]
    Escape(command::escape::EscapeArgs),
    #[command(subcommand, about = "Generate, inspect and edit custom commands")]
    CustomCommand(command::custom_command::CustomCommandCmds),
}

/// Parses the command-line arguments and executes the corresponding function.
/// - Caution: This is a `synchronous` function, it's declared as `async` to be able to use `[tokio::main]`
/// - `args`: parse from command line if it's `None`, otherwise parse from the given args
#[tokio::main]
pub async fn parse(args: Option<&[&str]>) -> anyhow::Result<()> {
    parse_async(args).await
}

/// `async` version of the [parse] function
pub async fn parse_async(args: Option<&[&str]>) -> anyhow::Result<()> {
    let args = match args {
        Some(args) => Cli::try_parse_from(args)?,
        None => Cli::parse(),
    };
    match args.command {
        Commands::Serve(args) => command::serve::execute(args).await,
        Commands::Escape(args) => command::escape::execute(args).await,
        Commands::CustomCommand(cmd) => command::custom_command::execute(cmd).await,
    }
}

/// this test is to verify that the CLI can be built without panicking
/// according [clap dock](https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_4/index.html)
#[test]
fn verify_cli() {
    use clap::CommandFactory;

    Cli::command().debug_assert()
}
