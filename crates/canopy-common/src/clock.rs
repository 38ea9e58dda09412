//! Millisecond timestamps used for `lastActive` bookkeeping.

use std::sync::atomic::{AtomicI64, Ordering};

static LAST: AtomicI64 = AtomicI64::new(0);

/// Wall-clock milliseconds, strictly increasing across calls in this process.
///
/// Two workspaces touched within the same millisecond still get distinct
/// `lastActive` values, so least-recently-active ordering is total.
pub fn monotonic_millis() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut prev = LAST.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST.compare_exchange_weak(prev, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}
