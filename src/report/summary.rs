//! Console rendering of the run report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    ChiSquareScore, ColumnSkew, DatasetProfile, ImputationRecord, OutlierSummary, PcaResult,
    RunReport,
};

fn section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

/// Shape, dtypes, missing counts, numeric summary and target distribution
pub fn display_profile(profile: &DatasetProfile) {
    section("📋", "DATASET PROFILE");

    let mut table = new_table(&["Column", "Type", "Missing"]);
    for (dtype, (_, missing)) in profile.dtypes.iter().zip(&profile.missing) {
        table.add_row(vec![
            Cell::new(&dtype.column),
            Cell::new(&dtype.dtype),
            Cell::new(missing).fg(if *missing > 0 { Color::Yellow } else { Color::White }),
        ]);
    }
    print_indented(&table);

    println!();
    println!(
        "      Rows: {}   Columns: {}   Duplicate rows: {}",
        style(profile.rows).yellow().bold(),
        style(profile.columns).yellow().bold(),
        style(profile.duplicate_rows).yellow().bold()
    );

    if !profile.numeric.is_empty() {
        println!();
        let mut table = new_table(&["Numeric Column", "Count", "Mean", "Std", "Min", "Max"]);
        for s in &profile.numeric {
            table.add_row(vec![
                Cell::new(&s.column),
                Cell::new(s.count),
                Cell::new(fmt_opt(s.mean, 3)),
                Cell::new(fmt_opt(s.std, 3)),
                Cell::new(fmt_opt(s.min, 3)),
                Cell::new(fmt_opt(s.max, 3)),
            ]);
        }
        print_indented(&table);
    }

    if !profile.target_counts.is_empty() {
        println!();
        let mut table = new_table(&["Target Value", "Count"]);
        for (value, count) in &profile.target_counts {
            table.add_row(vec![Cell::new(value), Cell::new(count)]);
        }
        print_indented(&table);
    }
}

fn display_imputation(records: &[ImputationRecord]) {
    section("🩹", "IMPUTATION");
    let mut table = new_table(&["Column", "Strategy", "Fill Value", "Filled"]);
    for r in records {
        table.add_row(vec![
            Cell::new(&r.column),
            Cell::new(format!("{:?}", r.strategy)),
            Cell::new(&r.fill_value),
            Cell::new(r.filled).fg(if r.filled > 0 { Color::Green } else { Color::White }),
        ]);
    }
    print_indented(&table);
}

fn display_pca(pca: &PcaResult) {
    section("🧭", "PRINCIPAL COMPONENTS");

    let mut headers = vec!["Feature"];
    headers.extend(pca.components.iter().map(|c| c.name.as_str()));
    let mut table = new_table(&headers);
    for (j, feature) in pca.features.iter().enumerate() {
        let mut row = vec![Cell::new(feature)];
        row.extend(
            pca.components
                .iter()
                .map(|c| Cell::new(format!("{:.4}", c.loadings[j]))),
        );
        table.add_row(row);
    }
    print_indented(&table);

    println!();
    for c in &pca.components {
        let top: Vec<&str> = c.top_features.iter().map(|f| f.feature.as_str()).collect();
        println!(
            "      {} explains {} of variance; top features: {}",
            style(&c.name).cyan().bold(),
            style(format!("{:.2}%", c.explained_variance_ratio * 100.0)).yellow(),
            top.join(", ")
        );
    }
}

fn display_chi_square(scores: &[ChiSquareScore]) {
    section("🧮", "CHI-SQUARE FEATURE SCORES");
    let mut table = new_table(&["Feature", "Chi2", "p-value"]);
    for s in scores {
        let significant = s.p_value.is_some_and(|p| p < 0.05);
        table.add_row(vec![
            Cell::new(&s.feature),
            Cell::new(format!("{:.4}", s.statistic)),
            Cell::new(fmt_opt(s.p_value, 4)).fg(if significant { Color::Green } else { Color::White }),
        ]);
    }
    print_indented(&table);
}

fn display_skewness(skews: &[ColumnSkew]) {
    section("📈", "SKEWNESS");
    let mut table = new_table(&["Column", "Skewness"]);
    for s in skews {
        table.add_row(vec![Cell::new(&s.column), Cell::new(fmt_opt(s.skewness, 2))]);
    }
    print_indented(&table);
}

fn display_outliers(summary: &OutlierSummary) {
    section("🛡️", "OUTLIER FILTER");
    let mut table = new_table(&["Column", "Flagged"]);
    for c in &summary.per_column {
        table.add_row(vec![Cell::new(&c.column), Cell::new(c.flagged)]);
    }
    print_indented(&table);
    println!();
    println!(
        "      Removed {} of {} rows (threshold {}, tail {})",
        style(summary.rows_removed).red().bold(),
        summary.rows_examined,
        summary.threshold,
        summary.tail
    );
}

/// Render every section of a finished run
pub fn display_run_report(report: &RunReport) {
    display_profile(&report.profile);

    if !report.imputation.is_empty() {
        display_imputation(&report.imputation);
    }
    if let Some(pca) = &report.pca {
        display_pca(pca);
    }
    if !report.chi_square.is_empty() {
        display_chi_square(&report.chi_square);
    }
    if let Some(outliers) = &report.outliers {
        display_outliers(outliers);
    }
    if !report.skewness.is_empty() {
        display_skewness(&report.skewness);
    }

    section("📋", "RUN SUMMARY");
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("📁 Input Rows"), Cell::new(report.profile.rows)]);
    table.add_row(vec![
        Cell::new("🗑️  Duplicates Removed"),
        Cell::new(report.duplicates_removed),
    ]);
    table.add_row(vec![
        Cell::new("✂️  Empty Payloads Dropped"),
        Cell::new(report.features.dropped_empty_payloads),
    ]);
    table.add_row(vec![
        Cell::new("✅ Output Rows"),
        Cell::new(report.final_rows)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("🧱 Output Columns"), Cell::new(report.final_columns)]);
    let total: f64 = report.timings.iter().map(|t| t.seconds).sum();
    table.add_row(vec![
        Cell::new("⏱  Pipeline Time"),
        Cell::new(format!("{:.2}s", total)),
    ]);
    print_indented(&table);
}
