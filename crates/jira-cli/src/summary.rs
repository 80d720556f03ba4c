use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use jira_model::{PhaseReport, RunReport};

pub fn print_summary(report: &RunReport) {
    if report.phases.is_empty() {
        println!("Nothing to do.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Phase"),
        header_cell("Items"),
        header_cell("Output"),
        header_cell("Status"),
        header_cell("Notes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for phase in &report.phases {
        table.add_row(vec![
            Cell::new(phase.phase.label())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(phase.items),
            output_cell(phase.output.as_deref()),
            status_cell(phase),
            note_cell(phase.message.as_deref()),
        ]);
    }
    println!("{table}");

    let failures: Vec<&PhaseReport> = report.phases.iter().filter(|phase| phase.failed).collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for phase in failures {
            eprintln!(
                "- {}: {}",
                phase.phase.label(),
                phase.message.as_deref().unwrap_or("failed")
            );
        }
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(phase: &PhaseReport) -> Cell {
    if phase.failed {
        Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    }
}

fn output_cell(path: Option<&Path>) -> Cell {
    match path {
        Some(path) => Cell::new(path.display()),
        None => dim_cell("-"),
    }
}

fn note_cell(message: Option<&str>) -> Cell {
    match message {
        Some(message) => Cell::new(message),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
