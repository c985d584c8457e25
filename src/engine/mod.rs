//! Background nonce-search engine.
//!
//! One [`SearchEngine`] handle owns at most one live search at a
//! time. The search runs as a single tokio task; the host side never
//! blocks on it, it fires a start request and polls
//! [`SearchEngine::poll_status`] until `running` drops. All search
//! state is owned by the task and published to the handle through
//! atomics, so pollers only ever read snapshots.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use runpow_core::{MAX_SCORE, PrefixDigest, longest_run};

use crate::error::EngineError;

/// Iterations between cooperative checkpoints. At each checkpoint the
/// task publishes its nonce, observes the cancel flag, and yields to
/// the scheduler so pollers get to run.
pub const YIELD_INTERVAL: u64 = 10_000;

/// Immutable description of one search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Fixed text the nonce is appended to (separator included, if any)
    pub prefix: String,
    /// The search tries nonces strictly greater than this
    pub starting_nonce: u64,
    /// Run length the winning digest must strictly exceed
    pub target_difficulty: u32,
}

/// Snapshot of a running (or finished) search, safe to poll at any
/// time. Before any search has started, all fields are zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStatus {
    pub running: bool,
    pub current_nonce: u64,
    /// Elapsed seconds while running; total search seconds once done
    pub elapsed_secs: f64,
}

/// Outcome of a completed search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// `prefix ∥ decimal(final_nonce)`, the exact bytes that were hashed
    pub final_text: String,
    /// Smallest qualifying nonce greater than the starting nonce
    pub final_nonce: u64,
    pub search_time_secs: f64,
}

enum Outcome {
    Found(SearchResult),
    Exhausted,
}

/// State shared between the handle and the search task. The task is
/// the only writer while a search is live; `running` flips to false
/// only after the terminal fields are in place.
struct Shared {
    running: AtomicBool,
    cancel: AtomicBool,
    current_nonce: AtomicU64,
    started: Mutex<Option<Instant>>,
    total_secs: Mutex<f64>,
    outcome: Mutex<Option<Outcome>>,
}

/// Single-instance handle to the search engine.
///
/// Cloning the handle is cheap and shares the same engine, so a host
/// can hand one clone to a poller and keep another for control.
/// [`SearchEngine::start_search`] must be called from within a tokio
/// runtime; the search itself runs on a spawned task.
#[derive(Clone)]
pub struct SearchEngine {
    shared: Arc<Shared>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                cancel: AtomicBool::new(false),
                current_nonce: AtomicU64::new(0),
                started: Mutex::new(None),
                total_secs: Mutex::new(0.0),
                outcome: Mutex::new(None),
            }),
        }
    }

    /// Begin a search and return immediately.
    ///
    /// Rejects with [`EngineError::AlreadyRunning`] while a prior
    /// search is live (never queued), and with
    /// [`EngineError::InvalidInput`] for a target no digest can
    /// strictly exceed. Neither rejection touches engine state.
    pub fn start_search(&self, request: SearchRequest) -> Result<(), EngineError> {
        if request.target_difficulty >= MAX_SCORE {
            return Err(EngineError::InvalidInput(format!(
                "target difficulty {} can never be strictly exceeded by a {}-nibble digest",
                request.target_difficulty, MAX_SCORE
            )));
        }

        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineError::AlreadyRunning);
        }

        // The running flag is ours now; reset the snapshot for this search.
        self.shared.cancel.store(false, Ordering::SeqCst);
        self.shared
            .current_nonce
            .store(request.starting_nonce, Ordering::SeqCst);
        *self.shared.outcome.lock().unwrap() = None;
        *self.shared.started.lock().unwrap() = Some(Instant::now());

        info!(
            starting_nonce = request.starting_nonce,
            target_difficulty = request.target_difficulty,
            prefix_len = request.prefix.len(),
            "search started"
        );

        let shared = Arc::clone(&self.shared);
        tokio::spawn(run_search(shared, request));

        Ok(())
    }

    /// Snapshot of the current search, or of the last one once it
    /// has finished. Never blocks on the search task.
    pub fn poll_status(&self) -> SearchStatus {
        let running = self.shared.running.load(Ordering::SeqCst);
        let elapsed_secs = if running {
            self.shared
                .started
                .lock()
                .unwrap()
                .map(|t| t.elapsed().as_secs_f64())
                .unwrap_or(0.0)
        } else {
            *self.shared.total_secs.lock().unwrap()
        };

        SearchStatus {
            running,
            current_nonce: self.shared.current_nonce.load(Ordering::SeqCst),
            elapsed_secs,
        }
    }

    /// Whether a search is currently live.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Outcome of the most recently completed search.
    ///
    /// Well-defined once `running` has dropped: `Ok` for a found
    /// nonce, [`EngineError::SearchExhausted`] if the nonce space ran
    /// out, [`EngineError::NoResult`] if nothing has completed (never
    /// started, or cancelled). While a search is live this reports
    /// the previous search's outcome; poll `running` first.
    pub fn result(&self) -> Result<SearchResult, EngineError> {
        match &*self.shared.outcome.lock().unwrap() {
            Some(Outcome::Found(result)) => Ok(result.clone()),
            Some(Outcome::Exhausted) => Err(EngineError::SearchExhausted),
            None => Err(EngineError::NoResult),
        }
    }

    /// Request cooperative cancellation of the live search.
    ///
    /// Observed at the next yield checkpoint; a cancelled search
    /// terminates without storing an outcome. No-op when idle.
    pub fn cancel(&self) {
        self.shared.cancel.store(true, Ordering::SeqCst);
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The search task: strictly increasing nonces from
/// `starting_nonce + 1`, first strictly-qualifying digest wins.
async fn run_search(shared: Arc<Shared>, request: SearchRequest) {
    let start = Instant::now();

    // Absorb the prefix once; every iteration only hashes the short
    // decimal suffix.
    let prefix = PrefixDigest::new(request.prefix.as_bytes());

    let mut nonce = request.starting_nonce;
    let outcome = loop {
        nonce = match nonce.checked_add(1) {
            Some(next) => next,
            None => {
                warn!(starting_nonce = request.starting_nonce, "nonce space exhausted");
                break Some(Outcome::Exhausted);
            }
        };

        let digest = prefix.digest_nonce(nonce);
        if longest_run(&digest) > request.target_difficulty {
            let search_time_secs = start.elapsed().as_secs_f64();
            info!(
                final_nonce = nonce,
                search_time_secs, "search finished"
            );
            break Some(Outcome::Found(SearchResult {
                final_text: format!("{}{}", request.prefix, nonce),
                final_nonce: nonce,
                search_time_secs,
            }));
        }

        // Cooperative checkpoint: publish progress, observe
        // cancellation, let other tasks run.
        if nonce % YIELD_INTERVAL == 0 {
            shared.current_nonce.store(nonce, Ordering::SeqCst);
            if shared.cancel.load(Ordering::SeqCst) {
                debug!(current_nonce = nonce, "search cancelled");
                break None;
            }
            tokio::task::yield_now().await;
        }
    };

    // Terminal state must be in place before running drops, so a
    // poller that observes running == false reads a settled outcome.
    shared.current_nonce.store(nonce, Ordering::SeqCst);
    *shared.total_secs.lock().unwrap() = start.elapsed().as_secs_f64();
    *shared.outcome.lock().unwrap() = outcome;
    shared.running.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use runpow_core::hash;
    use std::time::Duration;
    use tokio::time::sleep;

    /// Poll until the engine goes idle, failing the test if it never does.
    async fn wait_until_idle(engine: &SearchEngine) {
        for _ in 0..2_000 {
            if !engine.is_running() {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("search did not finish within 10s");
    }

    fn request(prefix: &str, starting_nonce: u64, target_difficulty: u32) -> SearchRequest {
        SearchRequest {
            prefix: prefix.to_string(),
            starting_nonce,
            target_difficulty,
        }
    }

    #[test]
    fn test_status_before_any_search_is_zero() {
        let engine = SearchEngine::new();
        let status = engine.poll_status();
        assert!(!status.running);
        assert_eq!(status.current_nonce, 0);
        assert_eq!(status.elapsed_secs, 0.0);
        assert_eq!(engine.result(), Err(EngineError::NoResult));
    }

    #[tokio::test]
    async fn test_search_finds_minimal_qualifying_nonce() {
        let engine = SearchEngine::new();
        let prefix = "hello world ";
        let target = 2;

        engine.start_search(request(prefix, 0, target)).unwrap();
        wait_until_idle(&engine).await;

        let result = engine.result().unwrap();
        assert!(result.final_nonce > 0);
        assert_eq!(result.final_text, format!("{prefix}{}", result.final_nonce));

        // The winner strictly beats the target
        let winning = hash(result.final_text.as_bytes());
        assert!(longest_run(&winning) > target);

        // Every earlier candidate does not
        for nonce in 1..result.final_nonce {
            let digest = hash(format!("{prefix}{nonce}").as_bytes());
            assert!(longest_run(&digest) <= target, "nonce {nonce} qualifies early");
        }
    }

    #[tokio::test]
    async fn test_search_always_advances_past_starting_nonce() {
        // Target 0 is beaten by any digest, so the very first
        // candidate wins; it must still be starting_nonce + 1.
        let engine = SearchEngine::new();
        engine.start_search(request("text", 41, 0)).unwrap();
        wait_until_idle(&engine).await;

        assert_eq!(engine.result().unwrap().final_nonce, 42);
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let mut nonces = Vec::new();
        for _ in 0..2 {
            let engine = SearchEngine::new();
            engine.start_search(request("determinism check ", 7, 3)).unwrap();
            wait_until_idle(&engine).await;
            nonces.push(engine.result().unwrap().final_nonce);
        }
        assert_eq!(nonces[0], nonces[1]);
    }

    #[tokio::test]
    async fn test_second_start_is_rejected_while_running() {
        let engine = SearchEngine::new();
        // High target keeps the first search busy
        engine.start_search(request("busy", 0, 20)).unwrap();

        assert_eq!(
            engine.start_search(request("second", 0, 1)),
            Err(EngineError::AlreadyRunning)
        );

        engine.cancel();
        wait_until_idle(&engine).await;
    }

    #[tokio::test]
    async fn test_cancelled_search_leaves_no_result() {
        let engine = SearchEngine::new();
        engine.start_search(request("cancel me", 0, 20)).unwrap();
        engine.cancel();
        wait_until_idle(&engine).await;

        assert_eq!(engine.result(), Err(EngineError::NoResult));
    }

    #[tokio::test]
    async fn test_engine_is_reusable_after_completion() {
        let engine = SearchEngine::new();
        engine.start_search(request("first ", 0, 1)).unwrap();
        wait_until_idle(&engine).await;
        let first = engine.result().unwrap();

        engine.start_search(request("second ", 0, 1)).unwrap();
        wait_until_idle(&engine).await;
        let second = engine.result().unwrap();

        assert!(second.final_text.starts_with("second "));
        assert_ne!(first.final_text, second.final_text);
    }

    #[tokio::test]
    async fn test_nonce_overflow_surfaces_as_exhausted() {
        let engine = SearchEngine::new();
        engine.start_search(request("overflow", u64::MAX, 30)).unwrap();
        wait_until_idle(&engine).await;

        assert_eq!(engine.result(), Err(EngineError::SearchExhausted));
    }

    #[tokio::test]
    async fn test_unattainable_target_is_rejected_up_front() {
        let engine = SearchEngine::new();
        let err = engine.start_search(request("x", 0, MAX_SCORE)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn test_status_reports_progress_and_total_time() {
        let engine = SearchEngine::new();
        engine.start_search(request("status ", 100, 1)).unwrap();
        wait_until_idle(&engine).await;

        let status = engine.poll_status();
        assert!(!status.running);
        assert!(status.current_nonce > 100);
        assert!(status.elapsed_secs >= 0.0);
        assert_eq!(status.current_nonce, engine.result().unwrap().final_nonce);
    }
}
