use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dqad_cli::pipeline::RunResult;
use dqad_model::Tier;

pub fn print_summary(result: &RunResult, top_issues: usize) {
    let metrics = &result.outcome.metrics;
    println!("Source: {}", metrics.source_identifier);
    match &result.outputs {
        Some(paths) => println!("Output: {}", paths.output_dir.display()),
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tier"),
        header_cell("Records"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let tiers = [
        (Tier::Gold, metrics.gold_records, Color::Green),
        (Tier::Silver, metrics.silver_records, Color::Yellow),
        (Tier::Quarantine, metrics.quarantine_records, Color::Red),
    ];
    for (tier, count, color) in tiers {
        table.add_row(vec![
            Cell::new(tier.as_str()).fg(color).add_attribute(Attribute::Bold),
            Cell::new(count),
            Cell::new(share(count, metrics.total_records)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(metrics.total_records).add_attribute(Attribute::Bold),
        Cell::new(format!("DQ score {:.2}%", metrics.data_quality_score))
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_issue_table(result, top_issues);

    let warnings = result.ingest_warnings;
    if warnings.total() > 0 {
        eprintln!(
            "Ingest warnings: {} unparsable amount(s), {} unparsable date(s), {} short row(s), \
             {} blank row(s), {} non-UTF-8 cell(s)",
            warnings.unparsable_amounts,
            warnings.unparsable_dates,
            warnings.short_rows,
            warnings.blank_rows,
            warnings.invalid_utf8_cells
        );
    }
}

fn print_issue_table(result: &RunResult, top_issues: usize) {
    if result.issues.is_empty() || top_issues == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Issue"),
        header_cell("Claims"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for frequency in result.issues.iter().take(top_issues) {
        table.add_row(vec![
            Cell::new(frequency.code.as_str()).fg(Color::Yellow),
            Cell::new(frequency.occurrences),
            Cell::new(frequency.code.description()),
        ]);
    }
    println!();
    println!("Top issues:");
    println!("{table}");
}

fn share(count: usize, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.2}%", 100.0 * count as f64 / total as f64)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
