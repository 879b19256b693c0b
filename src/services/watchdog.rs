use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, warn};

use crate::{
    services::session_service::collect_terminated,
    state::{SessionId, SharedState},
};

/// What a single watchdog sweep did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Boards evicted for missing their heartbeat.
    pub evicted: Vec<String>,
    /// Games that could not continue without an evicted board.
    pub ended: Vec<SessionId>,
    /// Games removed by the garbage collection closing the sweep.
    pub removed: Vec<SessionId>,
}

/// Spawn the watchdog loop. It stops on its own once the application state is dropped.
pub fn spawn(state: &SharedState) -> JoinHandle<()> {
    let weak = Arc::downgrade(state);
    let period = state.config().watchdog_interval();
    debug!(
        interval = ?period,
        timeout = ?state.config().heartbeat_timeout(),
        "starting watchdog"
    );

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; boards get a full period to check in.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(state) = weak.upgrade() else {
                break;
            };

            // A panicking sweep must not take the watchdog down with it.
            let sweep_task = tokio::spawn(async move { sweep(&state, Instant::now()).await });
            if let Err(err) = sweep_task.await {
                error!(error = %err, "watchdog sweep failed");
            }
        }
    })
}

/// Evict boards silent since before `now - heartbeat_timeout` and end the games relying on them.
pub async fn sweep(state: &SharedState, now: Instant) -> SweepReport {
    let timeout: Duration = state.config().heartbeat_timeout();
    let Some(deadline) = now.checked_sub(timeout) else {
        return SweepReport::default();
    };
    debug!(?deadline, "healthcheck sweep");

    let evicted = state.boards().evict_stale(deadline);
    let mut ended = Vec::new();
    for board in &evicted {
        warn!(board = %board, "board seems to be dead");
        ended.extend(state.sessions().board_has_left(board).await);
    }

    let removed = collect_terminated(state).await;
    SweepReport {
        evicted,
        ended,
        removed,
    }
}
