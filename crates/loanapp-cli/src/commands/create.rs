//! Create command

use std::path::PathBuf;

use clap::Args;
use loanapp_core::errors::ExError;
use loanapp_engine::{apply_aggregate_command, AggregateCommand, AggregateCommandResult};

use crate::commands::{context, open_store, print_json, read_payload};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Identity the new application is attributed to
    #[arg(long)]
    pub owner: String,

    /// JSON payload file (`-` for stdin)
    #[arg(long)]
    pub file: PathBuf,
}

pub fn execute(args: CreateArgs, config: &Config) -> Result<(), ExError> {
    let payload = read_payload(&args.file)?;
    let mut conn = open_store(config)?;
    let ctx = context(&args.owner);

    match apply_aggregate_command(AggregateCommand::Create { payload }, &mut conn, &ctx)? {
        AggregateCommandResult::Created(aggregate) => print_json(&aggregate),
        other => Err(super::unexpected_result("create", &other)),
    }
}
