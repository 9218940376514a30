//! Stats command

use clap::Args;
use loanapp_core::errors::ExError;
use loanapp_engine::{apply_aggregate_query, AggregateQuery, AggregateQueryResult};

use crate::commands::{context, open_store, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub owner: String,
}

pub fn execute(args: StatsArgs, config: &Config) -> Result<(), ExError> {
    let mut conn = open_store(config)?;
    let ctx = context(&args.owner);
    let query = AggregateQuery::CountByStatus { owner: args.owner };
    match apply_aggregate_query(query, &mut conn, &ctx)? {
        AggregateQueryResult::Tally(tally) => print_json(&tally),
        other => Err(super::unexpected_query_result("stats", &other)),
    }
}
