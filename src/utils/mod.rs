/// Format an amount with thousands separators and two decimals.
/// 1234567.891 → "1,234,567.89"
pub fn fmt_amount(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{int_grouped}.{frac_part}")
}

/// "+20.00" / "-3.10"
pub fn fmt_signed(n: f64) -> String {
    if n >= 0.0 {
        format!("+{}", fmt_amount(n))
    } else {
        fmt_amount(n)
    }
}

/// "+0.81%" / "-1.20%"
pub fn fmt_pct(n: f64) -> String {
    format!("{}{:.2}%", if n >= 0.0 { "+" } else { "" }, n)
}

pub fn or_dash(s: Option<String>) -> String {
    s.unwrap_or_else(|| "—".to_string())
}
