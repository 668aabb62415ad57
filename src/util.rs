//! Human-readable formatting for durations and change ratios

/// Render a duration in seconds with an SI suffix, e.g. `1.234ms`
pub fn time_to_str(seconds: f64) -> String {
    let negative = seconds < 0.0;
    let magnitude = seconds.abs();

    let rendered = if magnitude >= 1.0 {
        format!("{magnitude:.3}s")
    } else if magnitude >= 1e-3 {
        format!("{:.3}ms", magnitude * 1e3)
    } else if magnitude >= 1e-6 {
        format!("{:.3}us", magnitude * 1e6)
    } else {
        format!("{:.3}ns", magnitude * 1e9)
    };

    if negative {
        format!("-{rendered}")
    } else {
        rendered
    }
}

/// Render a change ratio as a percentage, e.g. `0.051` -> `5.100%`
pub fn pct_to_str(ratio: f64) -> String {
    format!("{:.3}%", ratio * 100.0)
}
