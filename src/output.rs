//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! Batch ingest output is event-driven: the orchestrator streams
//! [`IngestEvent`]s over a channel and the CLI's printer thread renders each
//! one as it arrives, so long batches show progress file by file:
//!
//! ```text
//! photo-1.jpg: optimized 1440x1080 (saved 62.4%)
//! photo-1.jpg: uploaded → https://cdn.example/media/galleries/7/ab12cd34.jpg
//! scan.pdf: rejected — not an image (application/pdf)
//! 2 files skipped: gallery is full
//! ```

use crate::gallery::{Gallery, IngestEvent, IngestOutcome};
use crate::imaging::OptimizedImage;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format one ingest progress event as display lines.
pub fn format_ingest_event(event: &IngestEvent) -> Vec<String> {
    match event {
        IngestEvent::Rejected { filename, reason } => {
            vec![format!("{filename}: rejected — {reason}")]
        }
        IngestEvent::SkippedOverBudget { count } => {
            let files = if *count == 1 { "file" } else { "files" };
            vec![format!("{count} {files} skipped: gallery is full")]
        }
        IngestEvent::DecodeFailed { filename, reason } => {
            vec![format!("{filename}: failed — {reason}")]
        }
        IngestEvent::Optimized {
            filename,
            ratio,
            width,
            height,
        } => {
            let savings = if *ratio >= 0.0 {
                format!("saved {ratio:.1}%")
            } else {
                format!("grew {:.1}%", -ratio)
            };
            vec![format!("{filename}: optimized {width}x{height} ({savings})")]
        }
        IngestEvent::OptimizeFallback { filename, reason } => {
            vec![format!(
                "{filename}: optimization failed ({reason}), uploading original"
            )]
        }
        IngestEvent::Uploaded { filename, url } => {
            vec![format!("{filename}: uploaded \u{2192} {url}")]
        }
        IngestEvent::UploadFailed { filename, reason } => {
            vec![format!("{filename}: upload failed — {reason}")]
        }
    }
}

/// Format the batch summary shown after all events have been printed.
pub fn format_ingest_summary(outcome: &IngestOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Added {} image{}",
        outcome.added.len(),
        if outcome.added.len() == 1 { "" } else { "s" }
    ));
    if outcome.skipped_over_budget > 0 {
        lines.push(format!(
            "Skipped {} over the gallery limit",
            outcome.skipped_over_budget
        ));
    }
    if !outcome.failures.is_empty() {
        lines.push(format!("{} failed:", outcome.failures.len()));
        for failure in &outcome.failures {
            lines.push(format!("    {}: {}", failure.filename, failure.reason));
        }
    }
    lines
}

/// Format one `inspect` result line: dimensions or the probe error.
pub fn format_inspect_line(filename: &str, result: &Result<(u32, u32), String>) -> String {
    match result {
        Ok((width, height)) => format!("{filename}: {width}x{height}"),
        Err(reason) => format!("{filename}: {reason}"),
    }
}

/// Format the single-file optimize report.
pub fn format_optimize_summary(image: &OptimizedImage) -> Vec<String> {
    vec![
        format!("Dimensions: {}x{}", image.width, image.height),
        format!(
            "Size: {} \u{2192} {} bytes ({:+.1}%)",
            image.original_size,
            image.optimized_size,
            -image.compression_ratio
        ),
        format!("Format: {}", image.format.mime()),
    ]
}

/// Format the ordered gallery listing.
pub fn format_gallery_list(gallery: &Gallery) -> Vec<String> {
    if gallery.is_empty() {
        return vec!["Gallery is empty".to_string()];
    }
    gallery
        .images
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{} {}", format_index(i + 1), url))
        .collect()
}

pub fn print_ingest_summary(outcome: &IngestOutcome) {
    for line in format_ingest_summary(outcome) {
        println!("{line}");
    }
}

pub fn print_gallery_list(gallery: &Gallery) {
    for line in format_gallery_list(gallery) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::FileFailure;
    use crate::imaging::OutputFormat;

    #[test]
    fn event_optimized_reports_savings() {
        let lines = format_ingest_event(&IngestEvent::Optimized {
            filename: "a.jpg".into(),
            ratio: 62.4,
            width: 1440,
            height: 1080,
        });
        assert_eq!(lines, vec!["a.jpg: optimized 1440x1080 (saved 62.4%)"]);
    }

    #[test]
    fn event_optimized_negative_ratio_reports_growth() {
        let lines = format_ingest_event(&IngestEvent::Optimized {
            filename: "a.png".into(),
            ratio: -12.5,
            width: 100,
            height: 100,
        });
        assert_eq!(lines, vec!["a.png: optimized 100x100 (grew 12.5%)"]);
    }

    #[test]
    fn event_skipped_pluralizes() {
        assert_eq!(
            format_ingest_event(&IngestEvent::SkippedOverBudget { count: 1 }),
            vec!["1 file skipped: gallery is full"]
        );
        assert_eq!(
            format_ingest_event(&IngestEvent::SkippedOverBudget { count: 3 }),
            vec!["3 files skipped: gallery is full"]
        );
    }

    #[test]
    fn summary_lists_failures_indented() {
        let outcome = IngestOutcome {
            added: vec!["u1".into()],
            failures: vec![FileFailure {
                filename: "bad.jpg".into(),
                reason: "could not decode image: truncated".into(),
            }],
            skipped_over_budget: 2,
        };
        let lines = format_ingest_summary(&outcome);
        assert_eq!(lines[0], "Added 1 image");
        assert_eq!(lines[1], "Skipped 2 over the gallery limit");
        assert_eq!(lines[2], "1 failed:");
        assert!(lines[3].starts_with("    bad.jpg:"));
    }

    #[test]
    fn inspect_line_ok_and_err() {
        assert_eq!(
            format_inspect_line("a.jpg", &Ok((4000, 3000))),
            "a.jpg: 4000x3000"
        );
        assert_eq!(
            format_inspect_line("a.txt", &Err("could not decode image: bad magic".into())),
            "a.txt: could not decode image: bad magic"
        );
    }

    #[test]
    fn optimize_summary_lines() {
        let image = OptimizedImage {
            bytes: vec![],
            original_size: 1000,
            optimized_size: 400,
            compression_ratio: 60.0,
            width: 1440,
            height: 1080,
            format: OutputFormat::WebP,
        };
        let lines = format_optimize_summary(&image);
        assert_eq!(lines[0], "Dimensions: 1440x1080");
        assert!(lines[1].contains("1000"));
        assert!(lines[1].contains("400"));
        assert_eq!(lines[2], "Format: image/webp");
    }

    #[test]
    fn gallery_list_indexed_from_one() {
        let gallery = Gallery {
            images: vec!["u1".into(), "u2".into()],
        };
        assert_eq!(format_gallery_list(&gallery), vec!["001 u1", "002 u2"]);
        assert_eq!(
            format_gallery_list(&Gallery::default()),
            vec!["Gallery is empty"]
        );
    }
}
