use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::diag::{DiagnosticKind, Diagnostics};

/// A wrapper that forces the wrapped data onto its own cache line(s).
///
/// Uses `#[repr(align(64))]` so that each counter group starts on a 64-byte
/// boundary. Threads processing events concurrently against the same device
/// processor then do not invalidate each other's L1 cache when they bump
/// different groups.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Event outcome counters (hottest path - updated once per event)
#[derive(Debug, Default)]
pub struct EventMetrics {
    pub processed: AtomicU64,
    pub unmatched: AtomicU64,
}

/// Diagnostic counters by kind
#[derive(Debug, Default)]
pub struct DiagnosticMetrics {
    pub unmapped: AtomicU64,
    pub conversion: AtomicU64,
    pub date: AtomicU64,
    pub duration: AtomicU64,
    pub missing_argument: AtomicU64,
    pub calc: AtomicU64,
    pub function: AtomicU64,
    pub dispatch_miss: AtomicU64,
}

/// Performance totals (aggregate timing)
#[derive(Debug, Default)]
pub struct TotalMetrics {
    pub time_nanos: AtomicU64,
}

/// Counters for one device processor.
///
/// All operations use `Ordering::Relaxed`: these are observability counters
/// and a snapshot may tear slightly (e.g. `time_nanos` including an event
/// that has not yet bumped `processed`).
#[derive(Debug, Default)]
pub struct NormalizerMetrics {
    /// Group 1: per-event outcomes
    pub events: CacheAligned<EventMetrics>,

    /// Group 2: diagnostics by kind
    pub diagnostics: CacheAligned<DiagnosticMetrics>,

    /// Group 3: timing
    pub totals: CacheAligned<TotalMetrics>,
}

impl NormalizerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed event.
    #[inline]
    pub fn record_event(&self, matched: bool, time_nanos: u64, diagnostics: &Diagnostics) {
        self.events.0.processed.fetch_add(1, Ordering::Relaxed);
        if !matched {
            self.events.0.unmatched.fetch_add(1, Ordering::Relaxed);
        }
        self.totals.0.time_nanos.fetch_add(time_nanos, Ordering::Relaxed);

        for diagnostic in diagnostics.iter() {
            self.record_diagnostic(diagnostic.kind);
        }
    }

    #[inline]
    pub fn record_diagnostic(&self, kind: DiagnosticKind) {
        let d = &self.diagnostics.0;
        let counter = match kind {
            DiagnosticKind::UnmappedField => &d.unmapped,
            DiagnosticKind::ConversionFailure => &d.conversion,
            DiagnosticKind::DateParseFailure => &d.date,
            DiagnosticKind::DurationFailure => &d.duration,
            DiagnosticKind::MissingArgument => &d.missing_argument,
            DiagnosticKind::CalcError => &d.calc,
            DiagnosticKind::FunctionError => &d.function,
            DiagnosticKind::DispatchMiss => &d.dispatch_miss,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the counters into a serializable snapshot.
    ///
    /// Individual reads are atomic, the snapshot as a whole is not.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let processed = self.events.0.processed.load(Ordering::Relaxed);
        let unmatched = self.events.0.unmatched.load(Ordering::Relaxed);
        let total_time_ns = self.totals.0.time_nanos.load(Ordering::Relaxed);
        let d = &self.diagnostics.0;

        MetricsSnapshot {
            events_processed: processed,
            events_unmatched: unmatched,
            match_rate: if processed > 0 {
                (processed - unmatched) as f64 / processed as f64
            } else {
                1.0
            },
            avg_process_time_us: if processed > 0 {
                (total_time_ns as f64 / processed as f64) / 1000.0
            } else {
                0.0
            },

            unmapped_fields: d.unmapped.load(Ordering::Relaxed),
            conversion_failures: d.conversion.load(Ordering::Relaxed),
            date_parse_failures: d.date.load(Ordering::Relaxed),
            duration_failures: d.duration.load(Ordering::Relaxed),
            missing_arguments: d.missing_argument.load(Ordering::Relaxed),
            calc_errors: d.calc.load(Ordering::Relaxed),
            function_errors: d.function.load(Ordering::Relaxed),
            dispatch_misses: d.dispatch_miss.load(Ordering::Relaxed),
        }
    }
}

/// A read-only snapshot of normalizer metrics.
///
/// Serializes to JSON for logging at shutdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    // Events
    pub events_processed: u64,
    pub events_unmatched: u64,
    pub match_rate: f64,
    pub avg_process_time_us: f64,

    // Diagnostics
    pub unmapped_fields: u64,
    pub conversion_failures: u64,
    pub date_parse_failures: u64,
    pub duration_failures: u64,
    pub missing_arguments: u64,
    pub calc_errors: u64,
    pub function_errors: u64,
    pub dispatch_misses: u64,
}
