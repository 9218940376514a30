//! Update command

use std::path::PathBuf;

use clap::Args;
use loanapp_core::errors::ExError;
use loanapp_core::model::ApplicationId;
use loanapp_engine::{apply_aggregate_command, AggregateCommand, AggregateCommandResult};

use crate::commands::{context, open_store, print_json, read_payload};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,

    /// Caller identity; only applications it created are visible
    #[arg(long)]
    pub owner: String,

    /// Partial JSON payload file (`-` for stdin); absent keys stay untouched
    #[arg(long)]
    pub file: PathBuf,
}

pub fn execute(args: UpdateArgs, config: &Config) -> Result<(), ExError> {
    let payload = read_payload(&args.file)?;
    let mut conn = open_store(config)?;

    let cmd = AggregateCommand::Update {
        application_id: ApplicationId(args.id),
        payload,
    };
    match apply_aggregate_command(cmd, &mut conn, &context(&args.owner))? {
        AggregateCommandResult::Updated(aggregate) => print_json(&aggregate),
        other => Err(super::unexpected_result("update", &other)),
    }
}
