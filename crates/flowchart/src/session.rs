//! Fetch boundary and the last-request-wins session around it.

use crate::{Error, FetchResult, FlowChart, FlowChartConfig, Result, TaskId, build_flow_chart};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// External data source supplying the tasks and edges around a focus task.
///
/// The result need not be acyclic or tree-shaped, and may be empty.
#[async_trait]
pub trait FlowChartSource: Send + Sync {
    /// Fetch the related tasks and relationships for `focus`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] (or any other error) when the data cannot be fetched.
    async fn fetch_flow_chart(&self, focus: TaskId) -> Result<FetchResult>;
}

/// Outcome of [`FlowChartSession::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// The chart for the current focus; may be empty ("no related tasks").
    Ready(FlowChart),
    /// The fetch failed; no partial chart is produced.
    Failed(Error),
    /// A newer load started while this one was in flight; its result was discarded.
    Superseded {
        /// The focus this load was issued for.
        focus: TaskId,
    },
}

impl LoadOutcome {
    /// The chart, if this load produced one.
    #[must_use]
    pub fn chart(&self) -> Option<&FlowChart> {
        match self {
            Self::Ready(chart) => Some(chart),
            _ => None,
        }
    }
}

/// Loads flow charts from a [`FlowChartSource`], discarding stale responses.
///
/// Each [`load`](Self::load) supersedes every earlier one: when several
/// loads overlap, only the most recently started may produce a chart.
#[derive(Debug)]
pub struct FlowChartSession<S> {
    source: S,
    config: FlowChartConfig,
    generation: AtomicU64,
    focus: Mutex<Option<TaskId>>,
}

impl<S: FlowChartSource> FlowChartSession<S> {
    /// Create a session over `source`.
    pub fn new(source: S, config: FlowChartConfig) -> Self {
        Self {
            source,
            config,
            generation: AtomicU64::new(0),
            focus: Mutex::new(None),
        }
    }

    /// The focus of the most recent load.
    pub fn current_focus(&self) -> Option<TaskId> {
        *self.focus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The configuration charts are built with.
    pub fn config(&self) -> &FlowChartConfig {
        &self.config
    }

    /// Fetch and build the chart for `focus`.
    pub async fn load(&self, focus: TaskId) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.focus.lock().unwrap_or_else(PoisonError::into_inner) = Some(focus);
        debug!(focus = %focus, generation, "Loading flow chart");

        let fetched = self.source.fetch_flow_chart(focus).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(focus = %focus, generation, "Discarding stale flow chart response");
            return LoadOutcome::Superseded { focus };
        }

        match fetched {
            Ok(fetch) => LoadOutcome::Ready(build_flow_chart(focus, fetch, &self.config)),
            Err(err) => {
                warn!(focus = %focus, error = %err, "Flow chart fetch failed");
                LoadOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawTaskRecord, RelationshipEdge};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Source backed by an in-memory map; ids listed in `gated` wait for `release`.
    #[derive(Default)]
    struct MemorySource {
        results: HashMap<TaskId, FetchResult>,
        gated: Vec<TaskId>,
        release: Notify,
    }

    #[async_trait]
    impl FlowChartSource for MemorySource {
        async fn fetch_flow_chart(&self, focus: TaskId) -> Result<FetchResult> {
            if self.gated.contains(&focus) {
                self.release.notified().await;
            }
            self.results
                .get(&focus)
                .cloned()
                .ok_or_else(|| Error::source(focus, "task not found"))
        }
    }

    fn pair(parent: u64, child: u64) -> FetchResult {
        FetchResult {
            tasks: vec![
                RawTaskRecord::new(TaskId(parent), format!("KAN-{parent}"), "", "open"),
                RawTaskRecord::new(TaskId(child), format!("KAN-{child}"), "", "done"),
            ],
            relationships: vec![RelationshipEdge::parent_of(TaskId(parent), TaskId(child))],
        }
    }

    #[tokio::test]
    async fn test_load_ready() {
        let mut source = MemorySource::default();
        source.results.insert(TaskId(2), pair(1, 2));
        let session = FlowChartSession::new(source, FlowChartConfig::default());

        let outcome = session.load(TaskId(2)).await;
        let chart = outcome.chart().unwrap();
        assert_eq!(chart.root.as_ref().unwrap().id, TaskId(1));
        assert_eq!(session.current_focus(), Some(TaskId(2)));
    }

    #[tokio::test]
    async fn test_load_failure_is_reported() {
        let session = FlowChartSession::new(MemorySource::default(), FlowChartConfig::default());
        let outcome = session.load(TaskId(5)).await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(Error::Source { focus: TaskId(5), .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_fetch_is_ready_not_error() {
        let mut source = MemorySource::default();
        source.results.insert(TaskId(3), FetchResult::default());
        let session = FlowChartSession::new(source, FlowChartConfig::default());

        let outcome = session.load(TaskId(3)).await;
        assert!(outcome.chart().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut source = MemorySource::default();
        source.results.insert(TaskId(2), pair(1, 2));
        source.results.insert(TaskId(20), pair(10, 20));
        source.gated.push(TaskId(2));
        let session = Arc::new(FlowChartSession::new(source, FlowChartConfig::default()));

        let slow = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.load(TaskId(2)).await }
        });
        // Let the first load register and block on its fetch.
        tokio::task::yield_now().await;
        while session.current_focus().is_none() {
            tokio::task::yield_now().await;
        }

        let fresh = session.load(TaskId(20)).await;
        assert_eq!(fresh.chart().unwrap().focus, TaskId(20));

        session.source.release.notify_one();
        let stale = slow.await.unwrap();
        assert!(matches!(stale, LoadOutcome::Superseded { focus: TaskId(2) }));
        assert_eq!(session.current_focus(), Some(TaskId(20)));
    }
}
