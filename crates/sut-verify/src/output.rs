//! Console output for the CLI
//!
//! Coloured one-line status messages and the per-step summary table.
//! Errors and warnings go to stderr, everything else to stdout.

use std::io::{self, Write};

use crossterm::style::Color;
use tabled::{settings::Style, Table, Tabled};

use crate::pipeline::VerifyReport;

/// Format a verification report as a table of steps
pub fn format_report(report: &VerifyReport) -> String {
    #[derive(Tabled)]
    struct StepRow {
        #[tabled(rename = "STEP")]
        step: String,
        #[tabled(rename = "STATUS")]
        status: String,
    }

    let rows: Vec<StepRow> = report
        .steps()
        .iter()
        .map(|(step, status)| StepRow {
            step: step.to_string(),
            status: status.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a success message with a green checkmark
pub fn print_success(msg: &str) {
    write_marked(&mut io::stdout(), Color::Green, "✓ ", msg);
}

/// Print an error message with a red X
pub fn print_error(msg: &str) {
    write_marked(&mut io::stderr(), Color::Red, "✗ ", msg);
}

/// Print a warning message with a yellow exclamation
pub fn print_warning(msg: &str) {
    write_marked(&mut io::stderr(), Color::Yellow, "! ", msg);
}

/// Print an info message with a cyan arrow
pub fn print_info(msg: &str) {
    write_marked(&mut io::stdout(), Color::Cyan, "→ ", msg);
}

fn write_marked(out: &mut impl Write, color: Color, marker: &str, msg: &str) {
    use crossterm::style::{Print, ResetColor, SetForegroundColor};

    let _ = crossterm::execute!(
        out,
        SetForegroundColor(color),
        Print(marker),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
