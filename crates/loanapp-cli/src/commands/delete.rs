//! Delete command

use clap::Args;
use loanapp_core::errors::ExError;
use loanapp_core::model::ApplicationId;
use loanapp_engine::{apply_aggregate_command, AggregateCommand, AggregateCommandResult};
use serde_json::json;

use crate::commands::{context, open_store, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,

    /// Caller identity; only applications it created are visible
    #[arg(long)]
    pub owner: String,
}

pub fn execute(args: DeleteArgs, config: &Config) -> Result<(), ExError> {
    let mut conn = open_store(config)?;
    let cmd = AggregateCommand::Delete {
        application_id: ApplicationId(args.id),
    };
    match apply_aggregate_command(cmd, &mut conn, &context(&args.owner))? {
        AggregateCommandResult::Deleted(id) => print_json(&json!({ "deleted": id })),
        other => Err(super::unexpected_result("delete", &other)),
    }
}
