//! Formatted terminal output for result tables.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays clean and testable
//! - output changes are localized

use crate::fit::ResultTable;
use crate::io::export::ResultRow;

/// Summary line counts for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub rows: usize,
    pub fitted: usize,
    pub failed: usize,
    pub splits: usize,
}

pub fn table_stats(rows: &ResultTable<ResultRow>) -> TableStats {
    let failed = rows.iter().filter(|r| r.failure.is_some()).count();
    let mut splits: Vec<usize> = rows.iter().map(|r| r.split).collect();
    splits.sort_unstable();
    splits.dedup();

    TableStats {
        rows: rows.len(),
        fitted: rows.len() - failed,
        failed,
        splits: splits.len(),
    }
}

/// Format a ranked table of results, best first, with a heading.
pub fn format_results(title: &str, rows: &ResultTable<ResultRow>, top: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {title} ===\n"));

    if rows.is_empty() {
        out.push_str("(no usable fits)\n");
        return out;
    }

    out.push_str(
        format!(
            "{:>4} {:<10} {:<16} {:<19} {:<19} {:<10} {:>14} {:>10}\n",
            "#", "split", "model", "start", "end", "method", "error", "time[s]"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:->4} {:-<10} {:-<16} {:-<19} {:-<19} {:-<10} {:->14} {:->10}\n",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    let limit = top.unwrap_or(usize::MAX);
    for (pos, r) in rows.iter().take(limit).enumerate() {
        let split = r
            .split_label
            .clone()
            .unwrap_or_else(|| r.split.to_string());
        out.push_str(
            format!(
                "{:>4} {:<10} {:<16} {:<19} {:<19} {:<10} {:>14} {:>10.4}\n",
                pos,
                truncate(&split, 10),
                truncate(&r.model, 16),
                r.start_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.end_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                truncate(r.method.as_str(), 10),
                fmt_error(r.error),
                r.time,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if rows.len() > limit {
        out.push_str(&format!("... {} more\n", rows.len() - limit));
    }

    out
}

/// One line with row/failure/split counts.
pub fn format_stats(stats: &TableStats) -> String {
    format!(
        "Rows: {} | fitted: {} | failed: {} | splits: {}",
        stats.rows, stats.fitted, stats.failed, stats.splits
    )
}

fn fmt_error(error: Option<f64>) -> String {
    match error {
        Some(e) => format!("{e:.6}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Method;
    use chrono::NaiveDate;

    fn row(split: usize, model: &str, error: Option<f64>, failure: Option<&str>) -> ResultRow {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        ResultRow {
            split,
            split_label: Some(format!("fold-{split}")),
            candidate: 0,
            model: model.to_string(),
            start_date: start,
            end_date: start + chrono::Duration::hours(23),
            time: 0.25,
            method: Method::default(),
            error,
            params: error.map(|_| "{}".to_string()),
            failure: failure.map(str::to_string),
        }
    }

    #[test]
    fn stats_count_failures_and_splits() {
        let rows: ResultTable<_> = vec![
            row(0, "TiTe", Some(0.1), None),
            row(0, "Ti", None, Some("did not converge")),
            row(1, "TiTe", Some(0.2), None),
        ]
        .into();

        let stats = table_stats(&rows);
        assert_eq!(
            stats,
            TableStats {
                rows: 3,
                fitted: 2,
                failed: 1,
                splits: 2
            }
        );
        assert_eq!(format_stats(&stats), "Rows: 3 | fitted: 2 | failed: 1 | splits: 2");
    }

    #[test]
    fn results_table_respects_top() {
        let rows: ResultTable<_> = vec![
            row(0, "TiTe", Some(0.1), None),
            row(1, "TiTeTh", Some(0.2), None),
            row(2, "Ti", Some(0.3), None),
        ]
        .into();

        let text = format_results("Ranked", &rows, Some(2));
        assert!(text.starts_with("=== Ranked ===\n"));
        assert!(text.contains("fold-0"));
        assert!(text.contains("0.100000"));
        assert!(!text.contains("fold-2"));
        assert!(text.contains("... 1 more"));
    }

    #[test]
    fn empty_table_says_so() {
        let text = format_results("Best per split", &ResultTable::new(), None);
        assert!(text.contains("(no usable fits)"));
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("TiTeThRia", 5), "TiTe.");
        assert_eq!(truncate("Ti", 5), "Ti");
    }
}
