use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};
use daytally::AppError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "zh" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Grouped number with at most two decimals, trailing zeros dropped
pub(super) fn format_number(n: f64, format: NumberFormat) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let rounded = format!("{:.2}", n.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac = frac_part.trim_end_matches('0');
    let sign = if n < 0.0 && rounded != "0.00" { "-" } else { "" };
    let grouped = group_digits(int_part, format.group_sep);
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{}{frac}", format.decimal_sep)
    }
}

/// Format number in compact form (K, M, B suffixes)
pub(super) fn format_compact(n: f64, format: NumberFormat) -> String {
    let (sign, value) = if n < 0.0 { ("-", -n) } else { ("", n) };
    let (scaled, suffix) = if value >= 1_000_000_000.0 {
        (value / 1_000_000_000.0, "B")
    } else if value >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if value >= 1_000.0 {
        (value / 1_000.0, "K")
    } else {
        return format_number(n, format);
    };
    let mut s = format!("{scaled:.1}");
    if format.decimal_sep != '.' {
        s = s.replace('.', &format.decimal_sep.to_string());
    }
    format!("{sign}{s}{suffix}")
}

/// Number with an explicit `+` on positive values
pub(super) fn format_signed(n: f64, format: NumberFormat) -> String {
    let s = format_number(n, format);
    if n > 0.0 && s != "0" {
        format!("+{s}")
    } else {
        s
    }
}

/// One-decimal percent; `-` when there was no baseline
pub(super) fn format_percent(p: Option<f64>, format: NumberFormat) -> String {
    let Some(p) = p else {
        return "-".to_string();
    };
    let mut s = format!("{p:+.1}");
    if format.decimal_sep != '.' {
        s = s.replace('.', &format.decimal_sep.to_string());
    }
    format!("{s}%")
}

/// Green for growth, red for decline
pub(super) fn change_color(n: f64, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    if n > 0.0 {
        Some(Color::Green)
    } else if n < 0.0 {
        Some(Color::Red)
    } else {
        None
    }
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}
