//! Show command

use clap::Args;
use loanapp_core::errors::ExError;
use loanapp_core::model::ApplicationId;
use loanapp_engine::{apply_aggregate_query, AggregateQuery, AggregateQueryResult};

use crate::commands::{context, open_store, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,

    /// Caller identity; only applications it created are visible
    #[arg(long)]
    pub owner: String,
}

pub fn execute(args: ShowArgs, config: &Config) -> Result<(), ExError> {
    let mut conn = open_store(config)?;
    let query = AggregateQuery::Get {
        application_id: ApplicationId(args.id),
    };
    match apply_aggregate_query(query, &mut conn, &context(&args.owner))? {
        AggregateQueryResult::Aggregate(aggregate) => print_json(&aggregate),
        other => Err(super::unexpected_query_result("show", &other)),
    }
}
