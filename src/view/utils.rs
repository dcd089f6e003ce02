//! Utility functions for rendering UI components

/// Whole minutes, rounded to nearest
pub fn format_minutes(seconds: f64) -> String {
    format!("{} min", (seconds / 60.0).round() as u64)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_are_rounded() {
        assert_eq!(format_minutes(245.0), "4 min");
        assert_eq!(format_minutes(29.0), "0 min");
        assert_eq!(format_minutes(90.0), "2 min");
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long title", 10), "a very ...");
    }
}
