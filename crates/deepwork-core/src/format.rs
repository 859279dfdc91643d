//! Display helpers for countdowns and logged durations.

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `"{h}h {m}m"` from an hour up, otherwise `"{m}m"`. Seconds are truncated.
pub fn format_duration(ms: u64) -> String {
    let total_min = ms / 60_000;
    let (hours, minutes) = (total_min / 60, total_min % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
