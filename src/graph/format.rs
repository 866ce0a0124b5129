//! Number and text formatting shared by labels, tooltips and attribute values.

/// Format with at most one decimal, dropping trailing zeros.
///
/// Infinite values are spelled out and `NaN` is rendered as `N/A`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "N/A".into()
    } else if value == f64::INFINITY {
        "Infinity".into()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".into()
    } else {
        trim_decimals(value, 1)
    }
}

/// Format with at most three decimals, dropping trailing zeros.
///
/// Infinite values are rendered as `INF` and `-INF`, `NaN` as `N/A`.
pub fn format_number_more_decimals(value: f64) -> String {
    if value.is_nan() {
        "N/A".into()
    } else if value == f64::INFINITY {
        "INF".into()
    } else if value == f64::NEG_INFINITY {
        "-INF".into()
    } else {
        trim_decimals(value, 3)
    }
}

/// Like [`format_number_more_decimals`] for a textual value, which is returned
/// unchanged if it does not parse as a number
pub fn format_text_more_decimals(value: &str) -> String {
    match parse_real(value) {
        Some(v) => format_number_more_decimals(v),
        None => value.to_string(),
    }
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    match text {
        "-0" => "0".into(),
        _ => text.to_string(),
    }
}

/// Render a real attribute value. Whole numbers keep one decimal and the
/// non-finite values use the spellings the consumer parses.
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value == f64::INFINITY {
        "Infinity".into()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".into()
    } else if value.fract() == 0.0 && value.abs() < 1e7 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Parse a real value as rendered by [`format_real`], also accepting the
/// abbreviated infinities
pub fn parse_real(text: &str) -> Option<f64> {
    match text.trim() {
        "Infinity" | "INF" | "inf" => Some(f64::INFINITY),
        "-Infinity" | "-INF" | "-inf" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse::<f64>().ok(),
    }
}

/// Wrap tooltip text for the consumer's HTML renderer
pub fn to_html(text: &str) -> String {
    format!("<html>{}</html>", text.replace('\n', "<br>"))
}
