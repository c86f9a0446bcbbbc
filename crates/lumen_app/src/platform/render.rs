//! Plain-text rendering of the view models.

use lumen_core::{BackgroundViewModel, ModelStatus, ProgressRowView, TranslatorViewModel};

const BAR_WIDTH: usize = 24;

pub fn render_translator(view: &TranslatorViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if view.show_loading_banner {
        lines.push("Loading models... (only run once)".to_string());
    }
    lines.extend(view.progress_rows.iter().map(progress_line));
    if !view.output.is_empty() {
        lines.push(format!("> {}", view.output));
    }
    if let Some(error) = &view.error {
        lines.push(format!("! {error}"));
    }
    lines
}

pub fn render_background(view: &BackgroundViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    match &view.model {
        ModelStatus::Loading => lines.push("Loading model...".to_string()),
        ModelStatus::Ready => {}
        ModelStatus::Failed(message) => lines.push(format!("! model failed: {message}")),
    }
    if let Some(drop) = &view.last_drop {
        lines.push(format!(
            "Accepted {} image(s), rejected {}",
            drop.accepted, drop.rejected
        ));
    }
    for tile in &view.images {
        let mark = if tile.processed { "done" } else { "    " };
        lines.push(format!("[{mark}] {}: {}", tile.index + 1, tile.display_source));
    }
    if let Some(failure) = &view.failure {
        lines.push(format!("! {failure}"));
    }
    lines.push(format!(
        "{}{}",
        view.process_label,
        if view.download_enabled {
            " | download ready"
        } else {
            ""
        }
    ));
    lines
}

fn progress_line(row: &ProgressRowView) -> String {
    let ratio = (row.percentage / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!(
        "{} [{}{}] {}",
        row.file,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        row.label
    )
}

/// Prints only lines that changed since the previous frame.
#[derive(Debug, Default)]
pub struct Terminal {
    last: Vec<String>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&mut self, lines: Vec<String>) -> Vec<String> {
        let fresh = lines
            .iter()
            .filter(|line| !self.last.contains(line))
            .cloned()
            .collect();
        self.last = lines;
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{DropStats, ImageTileView, Readiness};
    use pretty_assertions::assert_eq;

    fn row(file: &str, percentage: f64) -> ProgressRowView {
        ProgressRowView {
            file: file.to_string(),
            percentage,
            label: format!("{percentage:.2}%"),
        }
    }

    #[test]
    fn loading_view_shows_banner_and_bars() {
        let view = TranslatorViewModel {
            readiness: Readiness::Loading,
            show_loading_banner: true,
            progress_rows: vec![row("model.bin", 50.0), row("tok.json", 0.0)],
            ..TranslatorViewModel::default()
        };
        assert_eq!(
            render_translator(&view),
            vec![
                "Loading models... (only run once)".to_string(),
                format!("model.bin [{}{}] 50.00%", "#".repeat(12), ".".repeat(12)),
                format!("tok.json [{}] 0.00%", ".".repeat(24)),
            ]
        );
    }

    #[test]
    fn out_of_range_progress_keeps_bar_in_bounds() {
        assert_eq!(
            progress_line(&row("a", 250.0)),
            format!("a [{}] 250.00%", "#".repeat(24))
        );
        assert_eq!(
            progress_line(&row("a", -5.0)),
            format!("a [{}] -5.00%", ".".repeat(24))
        );
    }

    #[test]
    fn ready_view_shows_output_and_error() {
        let view = TranslatorViewModel {
            readiness: Readiness::Ready,
            output: "J'aime".to_string(),
            error: Some("boom".to_string()),
            ..TranslatorViewModel::default()
        };
        assert_eq!(render_translator(&view), vec!["> J'aime", "! boom"]);
    }

    #[test]
    fn background_view_lists_tiles() {
        let view = BackgroundViewModel {
            model: ModelStatus::Ready,
            images: vec![
                ImageTileView {
                    index: 0,
                    display_source: "out/a--1.png".to_string(),
                    processed: true,
                },
                ImageTileView {
                    index: 1,
                    display_source: "b.jpg".to_string(),
                    processed: false,
                },
            ],
            process_enabled: true,
            process_label: "Process",
            download_enabled: true,
            last_drop: Some(DropStats {
                accepted: 2,
                rejected: 1,
            }),
            failure: None,
            dirty: false,
        };
        assert_eq!(
            render_background(&view),
            vec![
                "Accepted 2 image(s), rejected 1",
                "[done] 1: out/a--1.png",
                "[    ] 2: b.jpg",
                "Process | download ready",
            ]
        );
    }

    #[test]
    fn aborted_batch_shows_failure_above_process_line() {
        let view = BackgroundViewModel {
            model: ModelStatus::Ready,
            images: vec![ImageTileView {
                index: 0,
                display_source: "a.png".to_string(),
                processed: false,
            }],
            process_enabled: true,
            process_label: "Process",
            download_enabled: false,
            last_drop: None,
            failure: Some("image processing panicked: out of memory".to_string()),
            dirty: false,
        };
        assert_eq!(
            render_background(&view),
            vec![
                "[    ] 1: a.png",
                "! image processing panicked: out of memory",
                "Process",
            ]
        );
    }

    #[test]
    fn terminal_skips_repeated_lines() {
        let mut terminal = Terminal::new();
        assert_eq!(
            terminal.frame(vec!["a".to_string(), "b".to_string()]),
            vec!["a", "b"]
        );
        assert_eq!(
            terminal.frame(vec!["a".to_string(), "c".to_string()]),
            vec!["c"]
        );
        assert!(terminal.frame(vec!["a".to_string(), "c".to_string()]).is_empty());
    }
}
