use comfy_table::{Cell, Color, Table};
use daytally::core::PartialStats;
use daytally::{Granularity, PeriodData, PeriodId, Stats};
use std::sync::Arc;

use crate::cli::SortOrder;
use crate::output::format::{
    NumberFormat, change_color, create_styled_table, format_compact, format_number,
    format_percent, format_signed, header_cell, right_cell, styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
}

struct PeriodConfig {
    label: &'static str,
    title: &'static str,
}

fn period_config(granularity: Granularity) -> PeriodConfig {
    match granularity {
        Granularity::Day => PeriodConfig {
            label: "Date",
            title: "Daily Totals",
        },
        Granularity::Week => PeriodConfig {
            label: "Week",
            title: "Weekly Totals",
        },
        Granularity::Month => PeriodConfig {
            label: "Month",
            title: "Monthly Totals",
        },
        Granularity::Year => PeriodConfig {
            label: "Year",
            title: "Yearly Totals",
        },
    }
}

/// Metric rows of the detail table, in display order
fn metrics(stats: &Stats) -> [(&'static str, f64); 10] {
    [
        ("Count", stats.count),
        ("Total", stats.total),
        ("Mean", stats.mean),
        ("Median", stats.median),
        ("Mode", stats.mode),
        ("Min", stats.min),
        ("Max", stats.max),
        ("Range", stats.range),
        ("Variance", stats.variance),
        ("Stdev", stats.stdev),
    ]
}

fn percents(p: &PartialStats) -> [Option<f64>; 10] {
    [
        p.count, p.total, p.mean, p.median, p.mode, p.min, p.max, p.range, p.variance, p.stdev,
    ]
}

fn build_header(cfg: &PeriodConfig, opts: &TableOptions) -> Vec<Cell> {
    let c = opts.use_color;
    if opts.compact {
        vec![
            header_cell(cfg.label, c),
            header_cell("Total", c),
            header_cell("Δ Total", c),
            header_cell("Cum Total", c),
        ]
    } else {
        vec![
            header_cell(cfg.label, c),
            header_cell("Count", c),
            header_cell("Total", c),
            header_cell("Mean", c),
            header_cell("Median", c),
            header_cell("Min", c),
            header_cell("Max", c),
            header_cell("Δ Total", c),
            header_cell("%Δ Total", c),
            header_cell("Cum Total", c),
        ]
    }
}

fn add_period_row(table: &mut Table, data: &PeriodData, opts: &TableOptions) {
    let nf = opts.number_format;
    let key = data.id.to_string();
    let delta_color = change_color(data.deltas.total, opts.use_color);

    if opts.compact {
        table.add_row(vec![
            Cell::new(&key),
            right_cell(&format_compact(data.stats.total, nf), None, false),
            right_cell(&format_signed(data.deltas.total, nf), delta_color, false),
            right_cell(&format_compact(data.cumulatives.total, nf), None, false),
        ]);
        return;
    }

    table.add_row(vec![
        Cell::new(&key),
        right_cell(&format_number(data.stats.count, nf), None, false),
        right_cell(&format_number(data.stats.total, nf), None, false),
        right_cell(&format_number(data.stats.mean, nf), None, false),
        right_cell(&format_number(data.stats.median, nf), None, false),
        right_cell(&format_number(data.stats.min, nf), None, false),
        right_cell(&format_number(data.stats.max, nf), None, false),
        right_cell(&format_signed(data.deltas.total, nf), delta_color, false),
        right_cell(&format_percent(data.percents.total, nf), delta_color, false),
        right_cell(&format_number(data.cumulatives.total, nf), None, false),
    ]);
}

fn add_total_row(table: &mut Table, count: f64, total: f64, opts: &TableOptions) {
    let cyan = if opts.use_color { Some(Color::Cyan) } else { None };
    let nf = opts.number_format;

    if opts.compact {
        table.add_row(vec![
            styled_cell("TOTAL", cyan, true),
            right_cell(&format_compact(total, nf), cyan, true),
            Cell::new(""),
            Cell::new(""),
        ]);
    } else {
        let mut row = vec![
            styled_cell("TOTAL", cyan, true),
            right_cell(&format_number(count, nf), cyan, true),
            right_cell(&format_number(total, nf), cyan, true),
        ];
        row.extend(std::iter::repeat_with(|| Cell::new("")).take(7));
        table.add_row(row);
    }
}

/// One row per period; `rows` come in ascending key order
pub(crate) fn print_period_table(
    rows: &[Arc<PeriodData>],
    granularity: Granularity,
    options: TableOptions,
) {
    let cfg = period_config(granularity);
    let mut table = create_styled_table();
    table.set_header(build_header(&cfg, &options));

    let ordered: Box<dyn Iterator<Item = &Arc<PeriodData>>> = match options.order {
        SortOrder::Asc => Box::new(rows.iter()),
        SortOrder::Desc => Box::new(rows.iter().rev()),
    };
    for data in ordered {
        add_period_row(&mut table, data, &options);
    }

    let count: f64 = rows.iter().map(|d| d.stats.count).sum();
    let total: f64 = rows.iter().map(|d| d.stats.total).sum();
    add_total_row(&mut table, count, total, &options);

    println!("\n  {}\n", cfg.title);
    println!("{table}");
    println!(
        "\n  {} periods, {} numbers\n",
        rows.len(),
        format_number(count, options.number_format)
    );
}

/// Every metric of one period, with its comparison and running columns
pub(crate) fn print_detail_table(data: &PeriodData, options: TableOptions) {
    let c = options.use_color;
    let nf = options.number_format;
    let keyed = !matches!(data.id, PeriodId::AllTime);

    let mut table = create_styled_table();
    let mut header = vec![header_cell("Metric", c), header_cell("Value", c)];
    if keyed {
        header.extend([
            header_cell("Δ", c),
            header_cell("%Δ", c),
            header_cell("Cumulative", c),
            header_cell("Cum Δ", c),
            header_cell("Cum %Δ", c),
        ]);
    }
    if data.extremes.is_some() {
        header.extend([header_cell("Lowest day", c), header_cell("Highest day", c)]);
    }
    table.set_header(header);

    let values = metrics(&data.stats);
    let deltas = metrics(&data.deltas);
    let pcts = percents(&data.percents);
    let cumulatives = metrics(&data.cumulatives);
    let cum_deltas = metrics(&data.cumulative_deltas);
    let cum_pcts = percents(&data.cumulative_percents);
    let extremes = data
        .extremes
        .map(|e| (metrics(&e.min), metrics(&e.max)));

    for (i, (name, value)) in values.iter().enumerate() {
        let mut row = vec![Cell::new(*name), right_cell(&format_number(*value, nf), None, false)];
        if keyed {
            let delta_color = change_color(deltas[i].1, c);
            let cum_color = change_color(cum_deltas[i].1, c);
            row.extend([
                right_cell(&format_signed(deltas[i].1, nf), delta_color, false),
                right_cell(&format_percent(pcts[i], nf), delta_color, false),
                right_cell(&format_number(cumulatives[i].1, nf), None, false),
                right_cell(&format_signed(cum_deltas[i].1, nf), cum_color, false),
                right_cell(&format_percent(cum_pcts[i], nf), cum_color, false),
            ]);
        }
        if let Some((min, max)) = &extremes {
            row.extend([
                right_cell(&format_number(min[i].1, nf), None, false),
                right_cell(&format_number(max[i].1, nf), None, false),
            ]);
        }
        table.add_row(row);
    }

    println!("\n  {}\n", data.id);
    println!("{table}");
    println!(
        "\n  {} days, {} numbers\n",
        data.children.days.len(),
        data.numbers.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_follow_stats_fields() {
        let stats = daytally::core::summarize(&[1.0, 2.0, 3.0]).unwrap();
        let rows = metrics(&stats);
        assert_eq!(rows[0], ("Count", 3.0));
        assert_eq!(rows[1], ("Total", 6.0));
        assert_eq!(rows[9].0, "Stdev");
    }

    #[test]
    fn period_labels() {
        assert_eq!(period_config(Granularity::Week).label, "Week");
        assert_eq!(period_config(Granularity::Year).title, "Yearly Totals");
    }

    #[test]
    fn header_width_matches_rows() {
        let opts = TableOptions {
            order: SortOrder::Asc,
            use_color: false,
            compact: false,
            number_format: NumberFormat::default(),
        };
        let cfg = period_config(Granularity::Day);
        assert_eq!(build_header(&cfg, &opts).len(), 10);
        let compact = TableOptions {
            compact: true,
            ..opts
        };
        assert_eq!(build_header(&cfg, &compact).len(), 4);
    }
}
