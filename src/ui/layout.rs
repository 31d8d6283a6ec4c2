// Main view layout
// Assembles the terminal frame from the view state and the event log

use crate::state::ViewState;
use crate::ui::components::{block_line, phase_line, progress_bar, EventLog, BAR_WIDTH};

/// Characters of block preview per line
const PREVIEW_CHARS: usize = 60;

/// Render the whole view as text
/// Includes the header, wizard progress, block table and recent events
pub fn render_view(view: &ViewState, log: &EventLog, industry: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str(&render_header(view, industry));
    out.push('\n');

    match (&view.snapshot, &view.progress) {
        (Some(snapshot), Some(progress)) => {
            out.push_str(&progress_bar(progress.percent, BAR_WIDTH));
            out.push('\n');
            for phase in &progress.phases {
                out.push_str("  ");
                out.push_str(&phase_line(phase));
                out.push('\n');
            }

            out.push_str("\nShared blocks\n");
            for (label, status) in &snapshot.shared_blocks {
                out.push_str("  ");
                out.push_str(&block_line(label, status, PREVIEW_CHARS));
                out.push('\n');
            }
        }
        _ => out.push_str("Waiting for first status...\n"),
    }

    if let Some(error) = &view.last_error {
        out.push_str(&format!("\nLast poll failed: {}\n", error));
    }

    let events: Vec<&str> = log.lines().collect();
    if !events.is_empty() {
        out.push_str("\nEvents\n");
        for line in events {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// Render the header line
fn render_header(view: &ViewState, industry: Option<&str>) -> String {
    let mut header = String::from("MarketGap");
    if let Some(industry) = industry {
        header.push_str(&format!(" - {}", industry));
    }
    if let Some(snapshot) = &view.snapshot {
        header.push_str(&format!(
            "  (poll #{} at {})",
            view.last_seq,
            snapshot.fetched_at.format("%H:%M:%S")
        ));
    }
    if view.stopped {
        header.push_str("  [stopped]");
    }
    header
}
