// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Live polling scheduler
//!
//! The caller owns a [`LivePoller`] and drives it with [`LivePoller::tick`]
//! from whatever loop it already runs (UI frame, tokio interval, test). The
//! poller holds no timers or threads: it asks the injected [`Clock`] whether
//! the interval has elapsed, pulls a batch from its [`RecordSource`], and
//! merges it into the [`SharedGraph`] while holding the write lock. The lock
//! is what keeps aggregation passes on one graph from overlapping.

use crate::aggregate::{merge_batch, AggregationStats};
use crate::config::LiveSettings;
use crate::error::{MeshscopeError, Result};
use crate::model::{Graph, RawRecord};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Graph shared between the poller and readers (layout, rendering)
pub type SharedGraph = Arc<RwLock<Graph>>;

/// Wrap a graph for sharing
pub fn shared(graph: Graph) -> SharedGraph {
    Arc::new(RwLock::new(graph))
}

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Elapsed time since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and replay
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, to: Duration) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Producer of live record batches
pub trait RecordSource {
    fn poll(&mut self) -> Result<Vec<RawRecord>>;
}

impl<F> RecordSource for F
where
    F: FnMut() -> Result<Vec<RawRecord>>,
{
    fn poll(&mut self) -> Result<Vec<RawRecord>> {
        self()
    }
}

/// Result of one completed poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub stats: AggregationStats,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Caller-owned polling scheduler
pub struct LivePoller<C: Clock, S: RecordSource> {
    clock: C,
    source: S,
    interval: Duration,
    graph: SharedGraph,
    running: bool,
    last_poll: Option<Duration>,
    polls: u64,
}

impl<C: Clock, S: RecordSource> LivePoller<C, S> {
    pub fn new(clock: C, source: S, graph: SharedGraph, interval: Duration) -> Self {
        Self {
            clock,
            source,
            interval,
            graph,
            running: false,
            last_poll: None,
            polls: 0,
        }
    }

    pub fn from_settings(clock: C, source: S, graph: SharedGraph, settings: &LiveSettings) -> Self {
        Self::new(
            clock,
            source,
            graph,
            Duration::from_millis(settings.poll_interval_ms),
        )
    }

    /// Begin polling. The first tick after starting polls immediately.
    pub fn start(&mut self) {
        if !self.running {
            info!(interval_ms = self.interval.as_millis() as u64, "Live polling started");
        }
        self.running = true;
        self.last_poll = None;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(polls = self.polls, "Live polling stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn poll_count(&self) -> u64 {
        self.polls
    }

    pub fn graph(&self) -> SharedGraph {
        Arc::clone(&self.graph)
    }

    /// Time left until the next scheduled poll, `None` when stopped
    pub fn time_until_due(&self) -> Option<Duration> {
        if !self.running {
            return None;
        }
        match self.last_poll {
            None => Some(Duration::ZERO),
            Some(last) => {
                let elapsed = self.clock.now().saturating_sub(last);
                Some(self.interval.saturating_sub(elapsed))
            }
        }
    }

    /// Poll if running and due. Returns `Ok(None)` when nothing was done.
    pub fn tick(&mut self) -> Result<Option<PollOutcome>> {
        if !self.running {
            return Ok(None);
        }
        let now = self.clock.now();
        if let Some(last) = self.last_poll {
            if now.saturating_sub(last) < self.interval {
                return Ok(None);
            }
        }
        self.last_poll = Some(now);
        self.poll_now().map(Some)
    }

    /// Poll immediately regardless of the schedule (manual refresh)
    pub fn poll_now(&mut self) -> Result<PollOutcome> {
        let batch = self.source.poll().map_err(|e| {
            warn!(error = %e, "Live record source failed");
            match e {
                MeshscopeError::Source(_) => e,
                other => MeshscopeError::Source(other.to_string()),
            }
        })?;

        let mut graph = self.graph.write();
        let stats = merge_batch(&mut graph, &batch);
        self.polls += 1;

        let outcome = PollOutcome {
            stats,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
        };
        debug!(
            records = stats.records_seen,
            skipped = stats.skipped_records,
            node_count = outcome.node_count,
            edge_count = outcome.edge_count,
            "Merged live batch"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poller_with(
        clock: Arc<ManualClock>,
        batches: Vec<Vec<RawRecord>>,
    ) -> LivePoller<Arc<ManualClock>, impl RecordSource> {
        let mut queue = batches.into_iter();
        let source = move || -> Result<Vec<RawRecord>> { Ok(queue.next().unwrap_or_default()) };
        LivePoller::new(clock, source, shared(Graph::new()), Duration::from_secs(5))
    }

    #[test]
    fn test_stopped_poller_does_nothing() {
        let clock = Arc::new(ManualClock::new());
        let mut poller = poller_with(clock, vec![vec![RawRecord::new("a", "b")]]);

        assert!(!poller.is_running());
        assert_eq!(poller.tick().unwrap(), None);
        assert_eq!(poller.time_until_due(), None);
        assert!(poller.graph().read().is_empty());
    }

    #[test]
    fn test_polls_on_interval() {
        let clock = Arc::new(ManualClock::new());
        let mut poller = poller_with(
            Arc::clone(&clock),
            vec![
                vec![RawRecord::new("a", "b")],
                vec![RawRecord::new("a", "b"), RawRecord::new("b", "c")],
            ],
        );
        poller.start();

        let first = poller.tick().unwrap().expect("first tick polls immediately");
        assert_eq!(first.edge_count, 1);

        clock.advance(Duration::from_secs(2));
        assert_eq!(poller.tick().unwrap(), None);
        assert_eq!(poller.time_until_due(), Some(Duration::from_secs(3)));

        clock.advance(Duration::from_secs(3));
        let second = poller.tick().unwrap().expect("due after interval");
        assert_eq!(second.node_count, 3);
        assert_eq!(poller.poll_count(), 2);

        let graph = poller.graph();
        let graph = graph.read();
        assert_eq!(graph.edge("a->b").unwrap().connection_count, 2);
    }

    #[test]
    fn test_stop_halts_polling() {
        let clock = Arc::new(ManualClock::new());
        let mut poller = poller_with(Arc::clone(&clock), vec![vec![RawRecord::new("a", "b")]]);
        poller.start();
        poller.tick().unwrap();
        poller.stop();

        clock.advance(Duration::from_secs(60));
        assert_eq!(poller.tick().unwrap(), None);
        assert_eq!(poller.poll_count(), 1);
    }

    #[test]
    fn test_source_error_surfaces() {
        let clock = Arc::new(ManualClock::new());
        let source = || -> Result<Vec<RawRecord>> { Err(MeshscopeError::Source("down".into())) };
        let mut poller =
            LivePoller::new(clock, source, shared(Graph::new()), Duration::from_secs(1));
        poller.start();

        assert!(matches!(poller.tick(), Err(MeshscopeError::Source(_))));
        assert_eq!(poller.poll_count(), 0);
        // Failed attempt still counts toward the schedule
        assert_eq!(poller.tick().unwrap(), None);
    }
}
