use super::render::print_movies;
use crate::services::{LookupOutcome, MovieQuery};
use crate::state::SharedState;

pub async fn cmd_search(state: &SharedState, query: &str) -> anyhow::Result<()> {
    match MovieQuery::from_input(query) {
        MovieQuery::Search(_) => println!("Searching for: {query}"),
        MovieQuery::Discover => {
            println!("'{query}' is too short to search, showing popular movies instead");
        }
    }

    let outcome = state.movie_service.lookup(query).await;
    state.movie_service.flush_search_counts().await;
    render_outcome(outcome)
}

pub async fn cmd_discover(state: &SharedState) -> anyhow::Result<()> {
    println!("Popular movies");
    let outcome = state.movie_service.lookup("").await;
    state.movie_service.flush_search_counts().await;
    render_outcome(outcome)
}

fn render_outcome(outcome: LookupOutcome) -> anyhow::Result<()> {
    match outcome {
        LookupOutcome::Loaded { movies } => {
            print_movies(&movies);
            Ok(())
        }
        LookupOutcome::Failed { message } => anyhow::bail!(message),
    }
}
