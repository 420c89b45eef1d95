use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::page::CommandExecutor;

pub mod chat;
pub mod tasks;

pub use chat::ChatExecutor;
pub use tasks::TaskExecutor;

/// Run `command` on a tokio task and send its outcome back to the loop.
///
/// The call is abandoned only when `shutdown` fires; a page backing out of a
/// mode does not cancel it.
pub fn spawn_command<E>(
    executor: Arc<E>,
    command: E::Command,
    outcomes: mpsc::UnboundedSender<E::Outcome>,
    shutdown: CancellationToken,
) where
    E: CommandExecutor,
{
    tokio::spawn(async move {
        tokio::select! {
            outcome = executor.execute(command) => {
                if outcomes.send(outcome).is_err() {
                    debug!("event loop gone before outcome delivery");
                }
            }
            _ = shutdown.cancelled() => {
                debug!("command abandoned at shutdown");
            }
        }
    });
}
