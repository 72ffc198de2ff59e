use chrono::{Local, NaiveDateTime};
use log2::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::crawler::Reporter;

pub const REPORT_TITLE: &str = "# Sublinks found by Crawler Toolbox";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds the text report for `links` as generated at `generated_at`.
/// Each link is wrapped in brackets on its own line; a trailing total
/// appears only for more than three links.
pub fn render_report(links: &[String], generated_at: NaiveDateTime) -> String {
    let mut report = String::new();
    report.push_str(REPORT_TITLE);
    report.push('\n');
    report.push_str(&format!("# Generated on: {}\n", generated_at.format(TIMESTAMP_FORMAT)));
    report.push_str(&format!("# Total links: {}\n\n", links.len()));

    for link in links {
        report.push_str(&format!("[{}]\n", link));
    }

    if links.len() > 3 {
        report.push_str(&format!("\n(Total: {} links)", links.len()));
    }

    report
}

/// Writes the report for `links` to `destination`, stamped with local time.
pub fn export_links(links: &[String], destination: &Path) -> Result<(), ExportError> {
    let report = render_report(links, Local::now().naive_local());
    fs::write(destination, report).map_err(|source| ExportError::Io {
        path: destination.to_path_buf(),
        source,
    })?;
    info!("Exported {} links to {:?}", links.len(), destination);
    Ok(())
}

/// Like `export_links`, but a failure goes to the reporter's error channel.
pub fn export_and_report(links: &[String], destination: &Path, reporter: &dyn Reporter) -> bool {
    match export_links(links, destination) {
        Ok(()) => {
            reporter.progress(&format!("Exported {} links to {}", links.len(), destination.display()));
            true
        }
        Err(e) => {
            reporter.error(&format!("Error exporting to file {}: {}", destination.display(), e));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FnReporter;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 0))
            .unwrap()
    }

    fn links(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://example.com/{}", i)).collect()
    }

    #[test]
    fn test_report_with_four_links_has_total_line() {
        let report = render_report(&links(4), stamp());
        let expected = "# Sublinks found by Crawler Toolbox\n\
                        # Generated on: 2024-03-09 07:05:00\n\
                        # Total links: 4\n\
                        \n\
                        [https://example.com/1]\n\
                        [https://example.com/2]\n\
                        [https://example.com/3]\n\
                        [https://example.com/4]\n\
                        \n\
                        (Total: 4 links)";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_with_three_links_has_no_total_line() {
        let report = render_report(&links(3), stamp());
        assert!(!report.contains("(Total:"));
        assert!(report.ends_with("[https://example.com/3]\n"));
        assert!(report.contains("# Total links: 3\n"));
    }

    #[test]
    fn test_report_for_no_links() {
        let report = render_report(&[], stamp());
        assert_eq!(
            report,
            "# Sublinks found by Crawler Toolbox\n# Generated on: 2024-03-09 07:05:00\n# Total links: 0\n\n"
        );
    }

    #[test]
    fn test_export_writes_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("links.txt");
        export_links(&links(2), &path)?;

        let written = fs::read_to_string(&path)?;
        assert!(written.starts_with(REPORT_TITLE));
        assert!(written.contains("[https://example.com/2]\n"));
        Ok(())
    }

    #[test]
    fn test_export_to_missing_directory_fails() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing").join("links.txt");
        let result = export_links(&links(1), &path);
        assert!(matches!(result, Err(ExportError::Io { .. })));
        Ok(())
    }

    #[test]
    fn test_export_failure_goes_to_error_channel() -> Result<(), Box<dyn std::error::Error>> {
        let progress = Arc::new(Mutex::new(Vec::<String>::new()));
        let errors = Arc::new(Mutex::new(Vec::<String>::new()));
        let reporter = {
            let progress = Arc::clone(&progress);
            let errors = Arc::clone(&errors);
            FnReporter::new(
                move |m: &str| progress.lock().unwrap().push(m.to_string()),
                move |m: &str| errors.lock().unwrap().push(m.to_string()),
            )
        };

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing").join("links.txt");
        assert!(!export_and_report(&links(1), &path, &reporter));

        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(&format!("Error exporting to file {}: ", path.display())));
        assert!(progress.lock().unwrap().is_empty());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_export_success_reports_progress() -> Result<(), Box<dyn std::error::Error>> {
        let progress = Arc::new(Mutex::new(Vec::<String>::new()));
        let reporter = {
            let progress = Arc::clone(&progress);
            FnReporter::new(move |m: &str| progress.lock().unwrap().push(m.to_string()), |_: &str| {})
        };

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("links.txt");
        assert!(export_and_report(&links(4), &path, &reporter));
        assert_eq!(
            *progress.lock().unwrap(),
            vec![format!("Exported 4 links to {}", path.display())]
        );
        Ok(())
    }
}
