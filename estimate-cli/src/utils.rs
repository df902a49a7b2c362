use estimate_core::ReportKind;
use estimate_core::report::format_euros;
use rust_decimal::Decimal;

/// `clap` value parser for `--report`.
pub fn parse_report_kind(s: &str) -> Result<ReportKind, String> {
    ReportKind::parse(s).ok_or_else(|| format!("unknown report '{s}' (summary, detailed, quote)"))
}

/// Formats an optional amount for display, using "-" when `None`.
pub fn opt_euros_display(d: Option<Decimal>) -> String {
    d.map(format_euros).unwrap_or_else(|| "-".to_string())
}

/// Turns an answer key into a prompt label: `masonry.wallArea` becomes
/// `Masonry wall area`.
pub fn field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c == '.' {
            label.push(' ');
        } else if c.is_uppercase() {
            label.push(' ');
            label.extend(c.to_lowercase());
        } else {
            label.push(c);
        }
    }
    label
}
