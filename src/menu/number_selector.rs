//! Numeric prompt with optional binary size suffixes.

use crate::error::PromptError;
use crate::ui::Ui;

const KIB: u64 = 1024;

/// Ask for a number. Input that does not parse keeps `current`.
pub fn ask_number(
    ui: &dyn Ui,
    current: u64,
    prompt: &str,
    allow_size_suffix: bool,
) -> Result<u64, PromptError> {
    let raw = ui.ask_text(prompt)?;
    match parse_amount(&raw, allow_size_suffix) {
        Some(value) => Ok(value),
        None => {
            ui.show_error(&format!("Failed to parse input: '{}'", raw.trim()));
            Ok(current)
        }
    }
}

/// Parse `"8"`, `"8gb"`, `"512 M"` and the like. Suffixes are 1024-based and
/// case-insensitive; without `allow_size_suffix` only plain digits parse.
pub fn parse_amount(raw: &str, allow_size_suffix: bool) -> Option<u64> {
    let compact = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let split = compact
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(compact.len());
    let (digits, suffix) = compact.split_at(split);
    let value = digits.parse::<u64>().ok()?;

    let multiplier = match suffix {
        "" => 1,
        _ if !allow_size_suffix => return None,
        "k" | "kb" => KIB,
        "m" | "mb" => KIB.pow(2),
        "g" | "gb" => KIB.pow(3),
        "t" | "tb" => KIB.pow(4),
        _ => return None,
    };
    value.checked_mul(multiplier)
}

/// `"<n> Bytes"`, plus the largest whole unit when `n` exceeds 1 KB.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB"];
    let mut value = bytes as f64;
    let mut index = 0;
    while value > KIB as f64 && index < UNITS.len() - 1 {
        value /= KIB as f64;
        index += 1;
    }
    if index == 0 {
        return format!("{bytes} Bytes");
    }
    let scaled = format!("{value:.2}");
    let scaled = scaled.trim_end_matches('0').trim_end_matches('.');
    format!("{bytes} Bytes ({scaled} {})", UNITS[index])
}
