use daytally::PeriodData;
use std::sync::Arc;

use crate::cli::SortOrder;

fn to_pretty<T: serde::Serialize + ?Sized>(value: &T, empty: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        tracing::error!("failed to serialize JSON output: {e}");
        empty.to_string()
    })
}

/// Period rows as a JSON array; `rows` come in ascending key order
pub(crate) fn output_period_json(rows: &[Arc<PeriodData>], order: SortOrder) -> String {
    let ordered: Vec<&PeriodData> = match order {
        SortOrder::Asc => rows.iter().map(Arc::as_ref).collect(),
        SortOrder::Desc => rows.iter().rev().map(Arc::as_ref).collect(),
    };
    to_pretty(&ordered, "[]")
}

pub(crate) fn output_detail_json(data: &PeriodData) -> String {
    to_pretty(data, "{}")
}
