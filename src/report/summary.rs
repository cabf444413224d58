//! Terminal tables for IV summaries and WoE tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{IvReport, IvStrength, IvTable, WoeTable};

/// Format a statistic for display; non-finite values print as-is
pub fn format_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        format!("{}", value)
    }
}

fn strength_color(strength: IvStrength) -> Color {
    match strength {
        IvStrength::Useless => Color::DarkGrey,
        IvStrength::Weak => Color::White,
        IvStrength::Medium => Color::Cyan,
        IvStrength::Strong => Color::Green,
        IvStrength::Suspicious => Color::Yellow,
        IvStrength::Undefined => Color::Red,
    }
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|l| Cell::new(l).add_attribute(Attribute::Bold))
        .collect()
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn print_section_title(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

/// Build the ranked IV summary table
pub fn iv_summary_table(report: &IvReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["#", "Var", "IV", "Strength"]));

    for (rank, record) in report.summary.iter().enumerate() {
        let strength = record.strength();
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&record.var),
            Cell::new(format_stat(record.iv)).set_alignment(CellAlignment::Right),
            Cell::new(strength).fg(strength_color(strength)),
        ]);
    }

    table
}

/// Print the ranked IV summary and the skipped variables
pub fn display_iv_summary(report: &IvReport) {
    print_section_title("📋", "INFORMATION VALUE SUMMARY");
    print_indented(&iv_summary_table(report));

    if !report.skipped.is_empty() {
        print_section_title("📝", "SKIPPED VARIABLES (MISSING VALUES)");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(header(&["Var", "Missing %"]));
        for (name, pct) in &report.skipped {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(format!("{:.1}%", pct)).fg(Color::Red),
            ]);
        }
        print_indented(&table);
    }
}

/// Build the table of a single-variable WoE computation
pub fn woe_table(table: &WoeTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(header(&[
        table.variable.as_str(),
        "cnt_resp",
        "cnt_non_resp",
        "pct_resp",
        "pct_non_resp",
        "WOE",
    ]));

    for bin in &table.bins {
        out.add_row(vec![
            Cell::new(&bin.key),
            Cell::new(bin.cnt_resp),
            Cell::new(bin.cnt_non_resp),
            Cell::new(format_stat(bin.pct_resp)),
            Cell::new(format_stat(bin.pct_non_resp)),
            Cell::new(format_stat(bin.woe)),
        ]);
    }

    out
}

/// Print a single-variable WoE table
pub fn display_woe_table(table: &WoeTable) {
    print_section_title("📊", &format!("WOE TABLE: {} ({})", table.variable, table.kind));
    print_indented(&woe_table(table));
}

/// Build a per-variable table as reported by the IV driver
pub fn iv_table(table: &IvTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);

    let mut labels = vec![table.key_column()];
    if table.kind == crate::pipeline::VariableKind::Numeric {
        labels.push("Mean_Value");
    }
    labels.extend(["cnt_resp", "cnt_non_resp", "pct_resp", "pct_non_resp", "WOE", "IV"]);
    out.set_header(header(&labels));

    for row in &table.rows {
        let mut cells = vec![Cell::new(&row.label)];
        if let Some(mean) = row.mean_value {
            cells.push(Cell::new(format_stat(mean)));
        }
        cells.extend([
            Cell::new(row.cnt_resp),
            Cell::new(row.cnt_non_resp),
            Cell::new(format_stat(row.pct_resp)),
            Cell::new(format_stat(row.pct_non_resp)),
            Cell::new(format_stat(row.woe)),
            Cell::new(format_stat(row.iv)),
        ]);
        out.add_row(cells);
    }

    out
}

/// Print every per-variable table of a report, in rank order
pub fn display_iv_tables(report: &IvReport) {
    let Some(tables) = &report.woe_tables else {
        return;
    };

    for record in report.summary.iter() {
        if let Some(table) = tables.get(&record.var) {
            print_section_title(
                "📊",
                &format!("{} (IV {})", table.variable, format_stat(table.iv())),
            );
            print_indented(&iv_table(table));
        }
    }
}
