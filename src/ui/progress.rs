//! Duration formatting.

use std::time::Duration;

/// Format a duration for status lines: `850ms`, `12.3s`, `4.2m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
    }

    #[test]
    fn formats_seconds() {
        assert_eq!(format_duration(Duration::from_millis(12_340)), "12.3s");
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_duration(Duration::from_secs(252)), "4.2m");
    }
}
