mod format;
mod json;
mod table;

pub(crate) use format::NumberFormat;
pub(crate) use json::{output_detail_json, output_period_json};
pub(crate) use table::{TableOptions, print_detail_table, print_period_table};
