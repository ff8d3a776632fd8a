use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-run order number generator.
///
/// One instance lives for the duration of a single finalize call; the run
/// timestamp plus an atomic sequence keeps numbers unique across all orders
/// submitted concurrently within that run, so retried demos never collide in
/// the external system.
pub struct OrderNumbering {
    run_stamp: i64,
    sequence: AtomicU64,
}

impl OrderNumbering {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            run_stamp: now.timestamp(),
            sequence: AtomicU64::new(1),
        }
    }

    /// Sales order number: `<prefix>-<run stamp>-<sequence>`.
    /// The prefix encodes workflow and role, e.g. `BULK-DEMO`.
    pub fn sales_number(&self, prefix: &str) -> String {
        format!("{}-{}-{}", prefix, self.run_stamp, self.next())
    }

    /// Purchase order number additionally embeds the host's display name and
    /// the current date: `<prefix>-<HOST>-<yyyymmdd>-<sequence>`.
    pub fn purchase_number(&self, prefix: &str, host_display_name: &str, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}-{}-{}",
            prefix,
            compact(host_display_name),
            now.format("%Y%m%d"),
            self.next()
        )
    }

    fn next(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

/// Uppercase alphanumeric compaction for embedding names in order numbers
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}
