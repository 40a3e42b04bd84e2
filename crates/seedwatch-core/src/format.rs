//! Human-readable formatting for byte counts and durations.
//!
//! Pure functions with no rounding surprises: values scale by powers of
//! 1024, keep one rounded decimal, and drop a trailing `.0`.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const KIB: u64 = 1024;

/// Render a byte count with the largest unit that keeps the value >= 1.
///
/// `0 -> "0 B"`, `1024 -> "1 KB"`, `1536 -> "1.5 KB"`.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scale = 1_u64;
    while unit + 1 < UNITS.len() && bytes >= scale * KIB {
        unit += 1;
        scale *= KIB;
    }

    // Widened so the *10 cannot overflow for counts near u64::MAX.
    let tenths_total = (u128::from(bytes) * 10 + u128::from(scale / 2)) / u128::from(scale);
    let whole = tenths_total / 10;
    let tenths = tenths_total % 10;
    if tenths == 0 {
        format!("{whole} {}", UNITS[unit])
    } else {
        format!("{whole}.{tenths} {}", UNITS[unit])
    }
}

/// Render a second count as a coarse ETA.
///
/// Non-positive values mean "unknown" and render as `"--"`; otherwise the
/// two most significant components are shown (`1h 2m`, `2m 5s`, `45s`).
#[must_use]
pub fn format_eta(seconds: i64) -> String {
    if seconds <= 0 {
        return "--".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
