// Elapsed-time accounting for the active session

/// Split the whole minutes between `started_ts` and `now_ts` (both seconds
/// since the epoch) into hours and minutes. Sub-minute remainders are
/// dropped; a clock running backwards counts as zero.
///
/// The `hours == 0` arm returns the total minute count unmodified. It can
/// never reach 60 there, so both arms agree; the branch is kept as the
/// historical shape of this computation and is pinned by a test.
pub fn elapsed(started_ts: i64, now_ts: i64) -> (i64, i64) {
    let total_minutes = (now_ts - started_ts).max(0) / 60;

    let hours = total_minutes / 60;
    let minutes = if hours == 0 {
        total_minutes
    } else {
        total_minutes % 60
    };

    (hours, minutes)
}

/// Render a duration the way the tracker's worklog endpoint expects it.
pub fn format_duration(hours: i64, minutes: i64) -> String {
    format!("{}h {}m", hours, minutes)
}
