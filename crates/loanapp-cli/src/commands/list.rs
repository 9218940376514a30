//! List command

use clap::Args;
use loanapp_core::errors::ExError;
use loanapp_engine::{apply_aggregate_query, AggregateQuery, AggregateQueryResult};

use crate::commands::{context, open_store, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub owner: String,

    /// Print full aggregates instead of summary rows
    #[arg(long)]
    pub full: bool,
}

pub fn execute(args: ListArgs, config: &Config) -> Result<(), ExError> {
    let mut conn = open_store(config)?;
    let ctx = context(&args.owner);
    let query = if args.full {
        AggregateQuery::ForOwner { owner: args.owner }
    } else {
        AggregateQuery::ListByOwner { owner: args.owner }
    };
    match apply_aggregate_query(query, &mut conn, &ctx)? {
        AggregateQueryResult::Summaries(rows) => print_json(&rows),
        AggregateQueryResult::Aggregates(aggregates) => print_json(&aggregates),
        other => Err(super::unexpected_query_result("list", &other)),
    }
}
