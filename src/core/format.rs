fn group_thousands(units: u64) -> String {
    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Whole units with thousands separators, e.g. `-12,345`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    if !rounded.is_finite() {
        return "0".to_string();
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(rounded.abs() as u64))
}

/// Compact chart axis label, e.g. `2.5M`, `450K`, `80`.
pub fn format_axis_label(amount: f64) -> String {
    if amount == 0.0 || !amount.is_finite() {
        return "0".to_string();
    }
    let abs_value = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{sign}{:.1}M", abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{sign}{:.0}K", abs_value / 1_000.0)
    } else {
        format!("{sign}{abs_value:.0}")
    }
}
