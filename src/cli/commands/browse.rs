use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use super::render::{print_movies, print_trending};
use crate::services::{QueryController, ViewState};
use crate::state::SharedState;

/// Reads stdin line by line, treating each line as the new content of the
/// search box. Output is redrawn whenever the displayed state changes.
pub async fn cmd_browse(state: &SharedState) -> anyhow::Result<()> {
    browse_lines(state, BufReader::new(tokio::io::stdin())).await
}

/// Drives the controller from any line source. Returns once input is
/// exhausted, the last lookup has finished and its search count is stored.
pub async fn browse_lines<R>(state: &SharedState, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let debounce = Duration::from_millis(state.config.query.debounce_ms);
    let controller = QueryController::spawn(
        state.movie_service.clone(),
        debounce,
        state.config.query.trending_limit,
    );

    println!("Type to search, an empty line shows popular movies, Ctrl+D quits.");

    let mut updates = controller.subscribe();
    let mut settled = controller.subscribe();
    let mut renderer = tokio::spawn(async move {
        let mut last_view: Option<ViewState> = None;
        let mut trending_shown = false;

        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();

            if !trending_shown && !snapshot.trending.is_empty() {
                print_trending(&snapshot.trending);
                trending_shown = true;
            }

            let view = snapshot.view();
            if last_view.as_ref() == Some(&view) {
                continue;
            }

            match &view {
                ViewState::Loading => println!("Loading..."),
                ViewState::Error(message) => println!("Error: {message}"),
                ViewState::Loaded(movies) => {
                    match snapshot.settled_query.as_deref() {
                        Some(q) if !q.is_empty() => println!("Results for '{q}':"),
                        _ => println!("Popular:"),
                    }
                    print_movies(movies);
                }
            }
            last_view = Some(view);
        }
    });

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        controller.set_query(line.trim_end());
    }

    // Let the last line settle, then wait for its lookup and upsert.
    tokio::time::sleep(debounce * 2).await;
    if settled.wait_for(|s| !s.is_loading()).await.is_err() {
        debug!("Controller state closed before the last lookup finished");
    }
    state.movie_service.flush_search_counts().await;

    controller.shutdown();

    // The renderer exits after drawing the final state, once the state
    // channel closes. A trending load still pending keeps it open.
    if tokio::time::timeout(debounce, &mut renderer).await.is_err() {
        renderer.abort();
    }
    Ok(())
}
