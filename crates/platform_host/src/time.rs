//! Wall-clock and monotonic millisecond stamps for recently-viewed ordering.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_VIEW_STAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Next `viewedAt` stamp: unix milliseconds, never repeating on this thread.
///
/// Two views recorded within the same millisecond still get distinct stamps, so the newer view
/// always sorts first.
pub fn next_view_stamp_ms() -> u64 {
    LAST_VIEW_STAMP_MS.with(|last| {
        let stamp = last.get().saturating_add(1).max(unix_time_ms_now());
        last.set(stamp);
        stamp
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_stamps_strictly_increase() {
        let first = next_view_stamp_ms();
        let second = next_view_stamp_ms();
        let third = next_view_stamp_ms();
        assert!(first < second && second < third);
        assert!(first >= unix_time_ms_now().saturating_sub(60_000));
    }
}
