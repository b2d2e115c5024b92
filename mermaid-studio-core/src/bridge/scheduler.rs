use super::{RenderBridge, RenderError, RenderRequest, RenderResult};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// The result of one scheduled render, tagged with the submission it
/// belongs to so the UI can drop superseded results.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub generation: u64,
    pub result: RenderResult,
}

/// Serializes renders against one cache directory.
///
/// Policy is cancel-and-restart: a new submission cancels the render in
/// flight (killing its child) and then waits for the scratch lock, so only
/// one process ever reads the scratch file and the newest request always
/// runs. Submissions that are themselves superseded while waiting for the
/// lock return `Cancelled` without spawning anything.
#[derive(Debug)]
pub struct RenderScheduler {
    bridge: RenderBridge,
    /// Held for the whole write-scratch → spawn → wait sequence.
    scratch: tokio::sync::Mutex<()>,
    /// Token of the newest submission, keyed by its generation.
    in_flight: Mutex<Option<(u64, CancellationToken)>>,
    generation: AtomicU64,
    shutdown: CancellationToken,
}

impl RenderScheduler {
    pub fn new(bridge: RenderBridge) -> Arc<Self> {
        Arc::new(Self {
            bridge,
            scratch: tokio::sync::Mutex::new(()),
            in_flight: Mutex::new(None),
            generation: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        })
    }

    pub fn bridge(&self) -> &RenderBridge {
        &self.bridge
    }

    /// Generation of the most recent submission. Outcomes with any other
    /// generation are stale.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, outcome: &RenderOutcome) -> bool {
        outcome.generation == self.latest_generation()
    }

    pub fn is_rendering(&self) -> bool {
        self.lock_in_flight().is_some()
    }

    /// Submit a render, superseding whatever is in flight.
    pub async fn submit(&self, request: RenderRequest) -> RenderOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if self.shutdown.is_cancelled() {
            return RenderOutcome {
                generation,
                result: Err(RenderError::Cancelled),
            };
        }

        let token = self.shutdown.child_token();
        let previous = self.lock_in_flight().replace((generation, token.clone()));
        if let Some((_, previous)) = previous {
            tracing::debug!("Render #{} supersedes the render in flight", generation);
            previous.cancel();
        }

        let _scratch = self.scratch.lock().await;

        let result = if token.is_cancelled() {
            Err(RenderError::Cancelled)
        } else {
            self.bridge.render(&request, &token).await
        };

        self.release(generation);

        RenderOutcome { generation, result }
    }

    /// Cancel the render in flight (if any) without starting a new one.
    pub fn cancel(&self) {
        if let Some((_, token)) = self.lock_in_flight().take() {
            token.cancel();
        }
    }

    /// Cancel the render in flight and make any outcome already on its way
    /// stale. Used when the document being rendered goes away.
    pub fn discard(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel();
        generation
    }

    /// Cancel everything, refuse new work, and wait until no renderer
    /// process is left running.
    pub async fn shutdown(&self) {
        tracing::info!("Render scheduler shutting down");
        self.shutdown.cancel();
        let _scratch = self.scratch.lock().await;
    }

    fn release(&self, generation: u64) {
        let mut slot = self.lock_in_flight();
        if matches!(slot.as_ref(), Some((g, _)) if *g == generation) {
            *slot = None;
        }
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, Option<(u64, CancellationToken)>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
