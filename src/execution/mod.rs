//! Execution settings and monitoring hooks for query pipelines.
//!
//! This module sits beside [`crate::processing`] and provides:
//!
//! - [`QueryOptions`]: per-pipeline configuration (default page size, observer)
//! - [`QueryObserver`]/[`QueryEvent`]: hooks invoked as operators run
//! - [`QueryMetrics`]: an observer that keeps running counters
//!
//! Every operator also emits a `tracing` event at `TRACE` level, so a subscriber is enough for
//! ad-hoc logging; observers are for callers that want structured callbacks.

mod observer;

use std::fmt;
use std::sync::Arc;

pub use observer::{
    QueryEvent, QueryMetrics, QueryMetricsSnapshot, QueryObserver, StdErrQueryObserver,
};

/// Page size used by [`crate::processing::Query::page`] unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for a [`crate::processing::Query`].
#[derive(Clone)]
pub struct QueryOptions {
    /// Page size used by `page`. Zero is treated as [`DEFAULT_PAGE_SIZE`].
    pub default_page_size: usize,
    /// Optional observer for operator events.
    pub observer: Option<Arc<dyn QueryObserver>>,
}

impl QueryOptions {
    /// Attach an observer.
    pub fn with_observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn page_size(&self) -> usize {
        if self.default_page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.default_page_size
        }
    }

    pub(crate) fn emit(&self, event: QueryEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_event(&event);
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            observer: None,
        }
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("default_page_size", &self.default_page_size)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{QueryEvent, QueryMetrics, QueryObserver, QueryOptions, DEFAULT_PAGE_SIZE};

    #[test]
    fn default_options_use_page_size_ten() {
        let opts = QueryOptions::default();
        assert_eq!(opts.page_size(), DEFAULT_PAGE_SIZE);
        assert!(opts.observer.is_none());
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        let opts = QueryOptions {
            default_page_size: 0,
            ..Default::default()
        };
        assert_eq!(opts.page_size(), 10);
    }

    #[test]
    fn metrics_accumulate_events() {
        let metrics = Arc::new(QueryMetrics::new());
        let opts = QueryOptions::default().with_observer(metrics.clone());
        opts.emit(QueryEvent::Created { len: 3 });
        opts.emit(QueryEvent::OperatorApplied {
            operator: "filter",
            input_len: 3,
            output_len: 1,
        });
        metrics.on_event(&QueryEvent::OperandRejected {
            operator: "zip",
            found: "integer",
        });

        let snap = metrics.snapshot();
        assert_eq!(snap.pipelines_created, 1);
        assert_eq!(snap.operators_applied, 1);
        assert_eq!(snap.elements_in, 3);
        assert_eq!(snap.elements_out, 1);
        assert_eq!(snap.operands_rejected, 1);
    }

    #[test]
    fn debug_hides_observer() {
        let opts = QueryOptions::default();
        assert_eq!(
            format!("{opts:?}"),
            "QueryOptions { default_page_size: 10, observer_set: false }"
        );
    }
}
