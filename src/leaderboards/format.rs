//! Time and distance formatting for display.

/// Format milliseconds as `HH:MM:SS` (truncated to whole seconds).
pub fn format_time(ms: f64) -> String {
    let (h, m, s) = split_hms(ms);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format milliseconds as `M:SS`, or `H:MM:SS` from one hour on.
pub fn format_time_short(ms: f64) -> String {
    let (h, m, s) = split_hms(ms);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Format a signed difference; zero counts as positive.
pub fn format_signed(ms: f64) -> String {
    let sign = if ms < 0.0 { "-" } else { "+" };
    format!("{}{}", sign, format_time_short(ms.abs()))
}

/// Format a distance as `12 km` or `12.5 km`; empty when unknown.
pub fn format_km(km: Option<f64>) -> String {
    match km {
        Some(km) if km.is_finite() => {
            let v = (km * 10.0).round() / 10.0;
            if v.fract() == 0.0 {
                format!("{:.0} km", v)
            } else {
                format!("{:.1} km", v)
            }
        }
        _ => String::new(),
    }
}

fn split_hms(ms: f64) -> (u64, u64, u64) {
    let total = if ms.is_finite() && ms > 0.0 {
        (ms / 1000.0).floor() as u64
    } else {
        0
    };
    (total / 3600, (total % 3600) / 60, total % 60)
}
