use crate::models::PointRecord;

/// Formats the console preview of extracted points.
///
/// Returns one line per point for the first `limit` points (`  A: (1.5, -2.0)`),
/// followed by a `... and N more point(s)` line when some were left out.
///
/// # Example
///
/// ```
/// use ggb_points::{models::PointRecord, ui};
///
/// let points = vec![PointRecord::new("A", 1.5, -2.0)];
/// assert_eq!(ui::format_preview(&points, 10), vec!["  A: (1.5, -2.0)"]);
/// ```
pub fn format_preview(points: &[PointRecord], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = points
        .iter()
        .take(limit)
        .map(|p| format!("  {}: ({:?}, {:?})", p.label, p.x, p.y))
        .collect();

    let remaining = points.len().saturating_sub(limit);
    if remaining > 0 {
        lines.push(format!("  ... and {remaining} more point(s)"));
    }
    lines
}

/// Prints the preview produced by [`format_preview`] to standard output.
pub fn print_preview(points: &[PointRecord], limit: usize) {
    if points.is_empty() {
        return;
    }
    println!("\nExtracted points:");
    for line in format_preview(points, limit) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<PointRecord> {
        (0..count)
            .map(|i| PointRecord::new(format!("P{i}"), i as f64, 0.5))
            .collect()
    }

    #[test]
    fn test_format_preview_keeps_decimal_point() {
        let points = vec![
            PointRecord::new("A", 1.5, -2.0),
            PointRecord::new("B", 0.0, 0.0),
        ];
        assert_eq!(
            format_preview(&points, 10),
            vec!["  A: (1.5, -2.0)", "  B: (0.0, 0.0)"]
        );
    }

    #[test]
    fn test_format_preview_truncates_with_remainder() {
        let lines = format_preview(&numbered(13), 10);
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[9], "  P9: (9.0, 0.5)");
        assert_eq!(lines[10], "  ... and 3 more point(s)");
    }

    #[test]
    fn test_format_preview_exact_limit_has_no_remainder() {
        let lines = format_preview(&numbered(10), 10);
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_format_preview_empty() {
        assert!(format_preview(&[], 10).is_empty());
    }

    #[test]
    fn test_print_preview_runs() {
        print_preview(&numbered(2), 1);
        print_preview(&[], 10);
    }
}
