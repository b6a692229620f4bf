//! Thousands separators for the decimal display.

/// Group the integer part of `text` with `,` every three digits.
///
/// The sign, the fractional part and a trailing `.` are kept as typed. Text
/// that is not a plain decimal number (error messages, hex digits) is
/// returned unchanged.
pub fn group_digits(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let is_number = !integer.is_empty()
        && integer.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().skip(1).all(|c| c.is_ascii_digit());
    if !is_number {
        return text.to_string();
    }

    format!("{sign}{}{fraction}", format_with_separators(integer))
}

/// Insert separators into a run of ASCII digits.
fn format_with_separators(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
