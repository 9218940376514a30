//! loanapp CLI
//!
//! Command-line interface over the loan-application engine

use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::{Config, ConfigArgs};

#[derive(Debug, Parser)]
#[command(name = "loanapp")]
#[command(about = "loanapp - Loan application store", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Create an application from a JSON payload file
    Create(commands::create::CreateArgs),
    /// Synchronize an application with a partial JSON payload
    Update(commands::update::UpdateArgs),
    /// Print one full application
    Show(commands::show::ShowArgs),
    /// List an owner's applications, newest first
    List(commands::list::ListArgs),
    /// Count an owner's applications per outcome
    Stats(commands::stats::StatsArgs),
    /// Delete an application and all of its sections
    Delete(commands::delete::DeleteArgs),
    /// Submit a concluded application
    Submit(commands::submit::SubmitArgs),
}

fn main() {
    // Values already in the environment take precedence over .env
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = Config::from_args(&cli.config).and_then(|config| {
        loanapp_core::logging_facility::init(config.log_profile);
        match cli.command {
            Commands::Migrate(args) => commands::migrate::execute(args, &config),
            Commands::Create(args) => commands::create::execute(args, &config),
            Commands::Update(args) => commands::update::execute(args, &config),
            Commands::Show(args) => commands::show::execute(args, &config),
            Commands::List(args) => commands::list::execute(args, &config),
            Commands::Stats(args) => commands::stats::execute(args, &config),
            Commands::Delete(args) => commands::delete::execute(args, &config),
            Commands::Submit(args) => commands::submit::execute(args, &config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
