// Reusable text components
// Progress bars, phase lines and block previews for the terminal view

use marketgap_backend::status::{parse_block, BlockContent, BlockStatus, PhaseProgress};
use std::collections::VecDeque;

/// Width of progress bars in characters
pub const BAR_WIDTH: usize = 30;

/// Render a progress bar such as `[#########.....] 66%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * width / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        percent
    )
}

/// Render one wizard phase: marker, title and size
pub fn phase_line(phase: &PhaseProgress) -> String {
    let marker = if phase.complete {
        "✓"
    } else if phase.error.is_some() {
        "✗"
    } else {
        "…"
    };
    match &phase.error {
        Some(error) => format!("{} {:<18} {}", marker, phase.phase.title(), error),
        None => format!(
            "{} {:<18} {} chars in {}",
            marker,
            phase.phase.title(),
            phase.chars,
            phase.label
        ),
    }
}

/// Render one block: label, kind and a short preview
pub fn block_line(label: &str, status: &BlockStatus, preview_chars: usize) -> String {
    match status {
        BlockStatus::Available { value, size, .. } => {
            let content = parse_block(value);
            let kind = match &content {
                BlockContent::Structured(_) => format!("json, {} items", content.item_count()),
                BlockContent::Raw(_) => "text".to_string(),
            };
            format!(
                "{:<18} {:>6}B  {:<16} {}",
                label,
                size,
                kind,
                content.preview(preview_chars)
            )
        }
        BlockStatus::Failed { error } => format!("{:<18} error: {}", label, error),
    }
}

/// Rolling log of status messages shown under the view
#[derive(Debug, Clone)]
pub struct EventLog {
    /// Buffer of lines, oldest first
    lines: VecDeque<String>,
    /// Maximum number of lines to keep (0 = unlimited)
    max_lines: usize,
}

impl EventLog {
    /// Create a log keeping at most `max_lines` lines
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines,
        }
    }

    /// Add a line, dropping the oldest if the log is full
    pub fn add_line(&mut self, line: String) {
        self.lines.push_back(line);
        if self.max_lines > 0 && self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(10)
    }
}
