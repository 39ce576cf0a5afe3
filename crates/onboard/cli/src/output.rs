//! Output formatting utilities

use colored::*;
use onboard_progress::{ProgressBar, SegmentState, StageOutcome};
use serde::Serialize;

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Coloured progress bar and stage list
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Print a single item as pretty JSON
pub fn print_json<T: Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// The bar as one coloured line, e.g. `■■□· 2/4 Commercial registration`.
pub fn colored_bar(bar: &ProgressBar) -> String {
    let mut line = String::new();
    for segment in &bar.segments {
        let glyph = match segment.state {
            SegmentState::Completed => "■".green(),
            SegmentState::Next => "□".yellow(),
            SegmentState::Future => "·".dimmed(),
        };
        line.push_str(&glyph.to_string());
    }

    line.push_str(&format!(" {}/{}", bar.current_stage, bar.total_stages));
    if let Some(label) = bar.current_label() {
        line.push_str(&format!(" {}", label.bold()));
    }
    if let Some(tooltip) = &bar.tooltip {
        line.push_str(&format!("  ({})", tooltip.dimmed()));
    }
    line
}

/// Print the per-stage outcomes under a bar.
pub fn print_outcomes(outcomes: &[StageOutcome]) {
    for outcome in outcomes {
        let mark = if outcome.passed {
            "✓".green()
        } else {
            "✗".red()
        };
        print!("  {} {:>2}. {}", mark, outcome.stage.get(), outcome.label);
        if let Some(failure) = &outcome.failure {
            print!(" - {}", failure.dimmed());
        }
        println!();
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_progress::Segment;
    use onboard_types::StageId;

    fn segment(id: u32, state: SegmentState) -> Segment {
        Segment {
            stage: StageId::new(id).unwrap(),
            label: format!("Stage {}", id),
            state,
            clickable: state != SegmentState::Future,
            hovered: false,
        }
    }

    #[test]
    fn test_output_format_default() {
        let format = OutputFormat::default();
        assert!(matches!(format, OutputFormat::Text));
    }

    #[test]
    fn test_colored_bar_plain() {
        colored::control::set_override(false);

        let bar = ProgressBar {
            segments: vec![
                segment(1, SegmentState::Completed),
                segment(2, SegmentState::Completed),
                segment(3, SegmentState::Next),
                segment(4, SegmentState::Future),
            ],
            tooltip: Some("Stage 3".into()),
            current_stage: StageId::new(2).unwrap(),
            total_stages: 4,
        };

        assert_eq!(colored_bar(&bar), "■■□· 2/4 Stage 2  (Stage 3)");
    }
}
