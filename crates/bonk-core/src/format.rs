//! Balance display formatting
//!
//! Every balance/amount shown to the user goes through [`format_amount`] so
//! all screens render the same underlying value identically. Values at or
//! above one million abbreviate to `X.YM`, at or above one thousand to
//! `X.YK`; smaller values render with up to `max_decimals` places
//! (0 for whole-token counts, up to 4 for sub-1 fractional amounts).

/// Magnitude threshold for the `M` suffix
const MILLION: f64 = 1_000_000.0;

/// Magnitude threshold for the `K` suffix
const THOUSAND: f64 = 1_000.0;

/// Format a token amount for display.
pub fn format_amount(value: f64, max_decimals: u32) -> String {
    let abs = value.abs();

    if abs >= MILLION {
        format!("{:.1}M", value / MILLION)
    } else if abs >= THOUSAND {
        format!("{:.1}K", value / THOUSAND)
    } else {
        trim_trailing_zeros(format!("{:.*}", max_decimals as usize, value))
    }
}

/// Strip trailing fractional zeros ("6.2500" -> "6.25", "100.00" -> "100").
fn trim_trailing_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
