use std::time::Duration;

use tokio::sync::watch;

/// Waits for the next value that stays unchanged for `quiet`.
///
/// Every change inside the window restarts the timer, so only the final value
/// of a burst is returned. Returns `None` once the sender is gone.
pub async fn next_settled<T: Clone>(rx: &mut watch::Receiver<T>, quiet: Duration) -> Option<T> {
    rx.changed().await.ok()?;

    loop {
        tokio::select! {
            () = tokio::time::sleep(quiet) => {
                return Some(rx.borrow_and_update().clone());
            }
            changed = rx.changed() => {
                changed.ok()?;
            }
        }
    }
}
