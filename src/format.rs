// Human-scaled display strings for raw metric magnitudes

/// Format a duration in seconds with an auto-selected unit.
/// Callers must not pass negative or non-finite values.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{:.2} µs", seconds * 1_000_000.0)
    } else if seconds < 1.0 {
        format!("{:.2} ms", seconds * 1000.0)
    } else {
        format!("{:.3} s", seconds)
    }
}

/// Format a byte count with an auto-selected unit
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format a speedup ratio, e.g. "1.14x"
pub fn format_speedup(ratio: f64) -> String {
    format!("{:.2}x", ratio)
}

/// Format a fraction as a percentage, e.g. 0.143 -> "14.3%"
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_units() {
        assert_eq!(format_duration(0.0000005), "0.50 µs");
        assert_eq!(format_duration(0.0009999), "999.90 µs");
        assert_eq!(format_duration(0.001), "1.00 ms");
        assert_eq!(format_duration(0.25), "250.00 ms");
        assert_eq!(format_duration(1.0), "1.000 s");
        assert_eq!(format_duration(1.2345), "1.235 s");
    }

    #[test]
    fn test_duration_unit_suffix_bands() {
        for &(seconds, suffix) in &[
            (0.0, " µs"),
            (0.0000001, " µs"),
            (0.000999, " µs"),
            (0.001, " ms"),
            (0.9999, " ms"),
            (1.0, " s"),
            (3600.0, " s"),
        ] {
            let rendered = format_duration(seconds);
            assert!(
                rendered.ends_with(suffix),
                "{} rendered as {:?}",
                seconds,
                rendered
            );
        }
    }

    #[test]
    fn test_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5_242_880), "5.00 MB");
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(format_speedup(1.1437), "1.14x");
        assert_eq!(format_percent(0.142857), "14.3%");
        assert_eq!(format_percent(-0.05), "-5.0%");
    }
}
