use daytally::core::{DateFilter, period_bounds};
use daytally::source::load_entries;
use daytally::{AppError, Granularity, PeriodCache, PeriodData};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::cli::{Cli, Report, parse_command};
use crate::config::default_data_path;
use crate::output::{
    NumberFormat, TableOptions, output_detail_json, output_period_json, print_detail_table,
    print_period_table,
};
use crate::utils::{Timezone, parse_date, parse_set};

pub(crate) struct CommandContext<'a> {
    pub(crate) filter: DateFilter,
    pub(crate) cli: &'a Cli,
    pub(crate) timezone: Timezone,
    pub(crate) number_format: NumberFormat,
}

impl CommandContext<'_> {
    fn table_options(&self) -> TableOptions {
        TableOptions {
            order: self.cli.order,
            use_color: self.cli.use_color(),
            compact: self.cli.compact,
            number_format: self.number_format,
        }
    }

    fn print_detail(&self, data: &PeriodData) {
        if self.cli.json {
            println!("{}", output_detail_json(data));
        } else {
            print_detail_table(data, self.table_options());
        }
    }
}

/// Load the dataset and apply `--set` overrides
fn build_cache(cli: &Cli) -> Result<PeriodCache, AppError> {
    let start = Instant::now();
    let entries = match cli.data.clone().or_else(default_data_path) {
        Some(path) => load_entries(&path)?,
        None => Vec::new(),
    };

    let mut cache = PeriodCache::new();
    cache.set_days(entries)?;
    for raw in &cli.set {
        cache.set_day(parse_set(raw)?)?;
    }
    debug!(
        days = cache.day_count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "cache ready"
    );
    Ok(cache)
}

/// Populated periods overlapping the date filter, ascending
fn collect_rows(
    cache: &mut PeriodCache,
    granularity: Granularity,
    filter: &DateFilter,
) -> Result<Vec<Arc<PeriodData>>, AppError> {
    let keys: Vec<String> = cache
        .populated_keys(granularity)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let (start, end) = period_bounds(&key, granularity)?;
        if !filter.overlaps(start, end) {
            continue;
        }
        let data = cache.period_data(granularity, &key)?;
        // Periods whose days were all cleared stay indexed but have nothing to show
        if data.stats.is_populated() {
            rows.push(data);
        }
    }
    Ok(rows)
}

fn handle_periods(
    cache: &mut PeriodCache,
    granularity: Granularity,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let rows = collect_rows(cache, granularity, &ctx.filter)?;
    if rows.is_empty() {
        println!("No data found.");
        return Ok(());
    }
    if ctx.cli.json {
        println!("{}", output_period_json(&rows, ctx.cli.order));
    } else {
        print_period_table(&rows, granularity, ctx.table_options());
    }
    Ok(())
}

fn handle_show(cache: &mut PeriodCache, key: &str, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let granularity = Granularity::detect(key).ok_or_else(|| AppError::UnknownKey {
        input: key.to_string(),
    })?;
    let data = cache.period_data(granularity, key)?;
    ctx.print_detail(&data);
    Ok(())
}

fn handle_today(cache: &mut PeriodCache, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let today = ctx.timezone.today().format("%Y-%m-%d").to_string();
    if cache.get_day(&today).is_none_or(<[f64]>::is_empty) {
        println!("No data found for {today}.");
        return Ok(());
    }
    let data = cache.day_data(&today)?;
    ctx.print_detail(&data);
    Ok(())
}

fn handle_alltime(cache: &mut PeriodCache, ctx: &CommandContext<'_>) {
    let data = cache.alltime_data();
    if !data.stats.is_populated() && !ctx.cli.json {
        println!("No data found.");
        return;
    }
    ctx.print_detail(&data);
}

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let since = cli.since.as_deref().map(parse_date).transpose()?;
    let until = cli.until.as_deref().map(parse_date).transpose()?;
    let ctx = CommandContext {
        filter: DateFilter::new(since, until),
        cli,
        timezone: Timezone::parse(cli.timezone.as_deref())?,
        number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
    };

    let mut cache = build_cache(cli)?;

    match parse_command(&cli.command) {
        Report::Periods(granularity) => handle_periods(&mut cache, granularity, &ctx),
        Report::Show(key) => handle_show(&mut cache, &key, &ctx),
        Report::Today => handle_today(&mut cache, &ctx),
        Report::AllTime => {
            handle_alltime(&mut cache, &ctx);
            Ok(())
        }
    }
}
