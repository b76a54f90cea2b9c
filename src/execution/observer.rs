use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Events emitted by a [`crate::processing::Query`] as operators run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// A pipeline was constructed over `len` elements.
    Created { len: usize },
    /// An operator replaced (or kept) the buffer.
    OperatorApplied {
        operator: &'static str,
        input_len: usize,
        output_len: usize,
    },
    /// A sequence-operand operator rejected its operand.
    OperandRejected {
        operator: &'static str,
        found: &'static str,
    },
}

/// Observer hook for query events.
pub trait QueryObserver: Send + Sync {
    fn on_event(&self, event: &QueryEvent);
}

/// Prints every event to stderr.
#[derive(Debug, Default)]
pub struct StdErrQueryObserver;

impl QueryObserver for StdErrQueryObserver {
    fn on_event(&self, event: &QueryEvent) {
        match event {
            QueryEvent::Created { len } => eprintln!("[query][created] len={len}"),
            QueryEvent::OperatorApplied {
                operator,
                input_len,
                output_len,
            } => eprintln!("[query][{operator}] {input_len} -> {output_len}"),
            QueryEvent::OperandRejected { operator, found } => {
                eprintln!("[query][{operator}][rejected] operand={found}")
            }
        }
    }
}

/// Running counters across every pipeline the metrics object observes.
///
/// Attach it as an observer (behind an `Arc`) and snapshot it at any time.
#[derive(Default)]
pub struct QueryMetrics {
    pipelines_created: AtomicU64,
    operators_applied: AtomicU64,
    elements_in: AtomicU64,
    elements_out: AtomicU64,
    operands_rejected: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> QueryMetricsSnapshot {
        QueryMetricsSnapshot {
            pipelines_created: self.pipelines_created.load(Ordering::Relaxed),
            operators_applied: self.operators_applied.load(Ordering::Relaxed),
            elements_in: self.elements_in.load(Ordering::Relaxed),
            elements_out: self.elements_out.load(Ordering::Relaxed),
            operands_rejected: self.operands_rejected.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for QueryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QueryMetrics").field(&self.snapshot()).finish()
    }
}

impl QueryObserver for QueryMetrics {
    fn on_event(&self, event: &QueryEvent) {
        match event {
            QueryEvent::Created { .. } => {
                self.pipelines_created.fetch_add(1, Ordering::Relaxed);
            }
            QueryEvent::OperatorApplied {
                input_len,
                output_len,
                ..
            } => {
                self.operators_applied.fetch_add(1, Ordering::Relaxed);
                self.elements_in.fetch_add(*input_len as u64, Ordering::Relaxed);
                self.elements_out.fetch_add(*output_len as u64, Ordering::Relaxed);
            }
            QueryEvent::OperandRejected { .. } => {
                self.operands_rejected.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Point-in-time copy of [`QueryMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryMetricsSnapshot {
    pub pipelines_created: u64,
    pub operators_applied: u64,
    pub elements_in: u64,
    pub elements_out: u64,
    pub operands_rejected: u64,
}
