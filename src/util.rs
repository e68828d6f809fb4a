// Utility helpers for parsing and number formatting.
//
// All the forgiving CSV number handling lives here so the pipeline can
// assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a revenue-like value into `f64`, forgiving common export quirks.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace and drops inner spaces used as thousands separators.
/// - Rejects values that contain alphabetic characters (this also keeps
///   `NaN` and `inf` out).
/// - A lone `,` with no `.` is a decimal comma (`"12,5"`); otherwise commas
///   are thousands separators (`"1,234.50"`).
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let s = if !s.contains('.') && s.matches(',').count() == 1 {
        s.replace(',', ".")
    } else {
        s.replace(',', "")
    };
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Trimmed owned string, empty when missing.
pub fn clean_text(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Signed one-decimal percentage, e.g. `+23.4%` or `-50.0%`.
pub fn format_pct(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{:.1}%", pct)
    } else if pct < 0.0 {
        format!("{:.1}%", pct)
    } else {
        "0.0%".to_string()
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
