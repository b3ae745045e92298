use super::render::print_trending;
use crate::state::SharedState;

pub async fn cmd_trending(state: &SharedState, limit: Option<u64>) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(state.config.query.trending_limit);
    let records = state.trending.top_trending(limit).await?;

    if records.is_empty() {
        println!("Nothing has been searched yet.");
        return Ok(());
    }

    print_trending(&records);
    Ok(())
}
