//! COP amount formatting for rendered quotes

/// Format a COP amount with thousands separators and no decimals
///
/// Amounts are rounded to the nearest peso, matching how the quote
/// display presents money.
pub fn format_cop(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a rate given in percent, trimming trailing zeros
pub fn format_pct(rate_pct: f64) -> String {
    let s = format!("{rate_pct:.4}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}
