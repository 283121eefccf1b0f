//! Plain-text rendering of results. Rounding happens here and nowhere else.

use calc_core::analytics::AnalyticsReport;
use calc_core::calculations::{EstimateInput, EstimateResult};
use calc_core::CalcError;

pub fn print_estimate(input: &EstimateInput, result: &EstimateResult, decimals: usize) {
    let d = decimals;
    let units = input.units;
    let w = units.width_unit.symbol();
    let l = units.length_unit.symbol();

    println!("═══════════════════════════════════════════════════════");
    println!("  ROLL ESTIMATE");
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!("Roll:");
    if !input.roll.name.is_empty() {
        println!("  Name:    {}", input.roll.name);
    }
    println!("  Width:   {:.d$} {w}", input.roll.width);
    println!("  Length:  {:.d$} {l}", input.roll.length);
    println!("  Price:   {:.d$}", input.roll.price);
    println!();
    println!("Layout:");
    println!(
        "  {:<20} {:>8} {:>8} {:>8} {:>12}",
        "Shape", "Qty", "Across", "Rows", "Length"
    );
    for row in &result.layout.per_item {
        println!(
            "  {:<20} {:>8} {:>8} {:>8} {:>12.d$}",
            display_name(&row.shape_name),
            row.quantity,
            row.shapes_across,
            row.rows_for_item,
            row.length_consumed
        );
    }
    println!();
    println!("  Pieces:      {}", result.layout.total_pieces);
    println!(
        "  Length used: {:.d$} {l} of {:.d$} {l} ({:.1}%), {:.d$} {l} left",
        result.layout.total_length_consumed,
        input.roll.length,
        result.length_usage_percent,
        result.remaining_length
    );
    println!("  Utilization: {:.1}%", result.utilization_percent);
    println!();

    let cost = &result.cost;
    println!("Cost:");
    println!("  Material per {l}:   {:.d$}", cost.material_cost_per_unit_length);
    println!("  Material total:    {:.d$}", cost.total_material_cost);
    println!("  Additional:        {:.d$}", input.params.additional_cost);
    println!("  Total cost:        {:.d$}", cost.total_cost);
    println!("  Cost per piece:    {:.d$}", cost.cost_per_piece);
    println!();
    println!("Price ({}% margin):", input.params.profit_margin_percent);
    println!("  Per piece:         {:.d$}", cost.sell_price_per_piece);
    println!("  Total:             {:.d$}", cost.total_sell_price);
    println!("  Profit:            {:.d$}", cost.total_profit);
    println!("═══════════════════════════════════════════════════════");
}

pub fn print_error(error: &CalcError) {
    if error.is_internal() {
        eprintln!("Internal error (please report): {error}");
    } else {
        eprintln!("Error: {error}");
    }
    if let Ok(json) = serde_json::to_string_pretty(error) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{json}");
    }
}

pub fn print_summary(report: &AnalyticsReport, decimals: usize) {
    let d = decimals;
    let s = &report.summary;

    println!("═══════════════════════════════════════");
    println!("  PROJECTS - LAST {}", report.period);
    println!("═══════════════════════════════════════");
    println!("  Projects:        {}", s.total_projects);
    println!("  Pieces:          {}", s.total_pieces);
    println!("  Total value:     {:.d$}", s.total_value);
    println!("  Total cost:      {:.d$}", s.total_cost);
    println!("  Total profit:    {:.d$}", s.total_profit);
    println!("  Average ticket:  {:.d$}", s.avg_ticket);
    println!("  Average margin:  {:.1}%", s.avg_profit_margin_percent);

    if !report.shape_usage.is_empty() {
        println!();
        println!("Most cut shapes:");
        for usage in &report.shape_usage {
            println!("  {:<24} {:>8}", display_name(&usage.name), usage.pieces);
        }
    }

    println!();
    println!("Projects by value:");
    for range in &report.value_ranges {
        let label = match (range.above, range.up_to) {
            (None, Some(hi)) => format!("up to {hi}"),
            (Some(lo), Some(hi)) => format!("{lo} - {hi}"),
            (Some(lo), None) => format!("above {lo}"),
            (None, None) => "all".to_string(),
        };
        println!("  {:<24} {:>8}", label, range.count);
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}
