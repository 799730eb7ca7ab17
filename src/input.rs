//! Normalization of user-entered values before they reach a pipeline.

use serde_json::Value;

/// Decimal places of the native token.
pub const NATIVE_DECIMALS: usize = 18;

/// Parse a parameter list typed by a user.
///
/// A JSON array is used item by item (non-string items keep their JSON
/// text). Anything else is split on commas, trimmed, and blank entries are
/// dropped.
pub fn parse_transaction_params(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
        return items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect();
    }

    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn normalize_address(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Ledger key queried by a balance lookup.
///
/// Plain wallet addresses are only trimmed, since the ledger key is
/// case-sensitive. Wallet IDs are brought to their `kwl-<id>-cc` form.
pub fn balance_target(raw: &str, is_wallet_id: bool) -> String {
    if is_wallet_id {
        normalize_wallet_id(raw)
    } else {
        raw.trim().to_string()
    }
}

/// Convert a decimal amount to an integer string scaled by `10^decimals`.
///
/// Extra fractional digits are truncated. Returns `None` for anything that
/// is not an unsigned decimal number.
pub fn to_raw_units(amount: &str, decimals: usize) -> Option<String> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() {
                return None;
            }
            (whole, fraction)
        }
        None => (amount, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return None;
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(decimals));

    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
}

/// Canonical `kwl-<id>-cc` form of a wallet ID.
///
/// Accepts the bare ID or any mix of the prefix and suffix, in any case.
/// Blank input stays blank.
pub fn normalize_wallet_id(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }
    let id = lowered.strip_prefix("kwl-").unwrap_or(&lowered);
    let id = id.strip_suffix("-cc").unwrap_or(id);
    format!("kwl-{}-cc", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_json_array() {
        assert_eq!(
            parse_transaction_params(r#"["0xabc", 100, true]"#),
            ["0xabc", "100", "true"]
        );
        assert!(parse_transaction_params("[]").is_empty());
    }

    #[test]
    fn test_params_from_csv() {
        assert_eq!(parse_transaction_params(" a, b ,,c "), ["a", "b", "c"]);
        assert_eq!(parse_transaction_params("{\"a\":1}"), ["{\"a\":1}"]);
        assert!(parse_transaction_params("   ").is_empty());
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("  0xAbC  "), "0xabc");
    }

    #[test]
    fn test_balance_target() {
        assert_eq!(balance_target("  0xAbC  ", false), "0xAbC");
        assert_eq!(balance_target(" Kwl-Alice-CC ", true), "kwl-alice-cc");
        assert_eq!(balance_target("alice", true), "kwl-alice-cc");
        assert_eq!(balance_target("   ", true), "");
    }

    #[test]
    fn test_to_raw_units() {
        assert_eq!(to_raw_units("1", NATIVE_DECIMALS).unwrap(), "1000000000000000000");
        assert_eq!(to_raw_units("1.5", NATIVE_DECIMALS).unwrap(), "1500000000000000000");
        assert_eq!(to_raw_units(".25", NATIVE_DECIMALS).unwrap(), "250000000000000000");
        assert_eq!(to_raw_units("0", NATIVE_DECIMALS).unwrap(), "0");
        assert_eq!(to_raw_units("0.000000000000000001", NATIVE_DECIMALS).unwrap(), "1");
        assert_eq!(to_raw_units("0.0000000000000000019", NATIVE_DECIMALS).unwrap(), "1");
        assert_eq!(to_raw_units("12.34", 2).unwrap(), "1234");
    }

    #[test]
    fn test_to_raw_units_rejects_garbage() {
        for bad in ["", ".", "1.", "-1", "1e3", "1.2.3", "abc", "1,5"] {
            assert_eq!(to_raw_units(bad, NATIVE_DECIMALS), None, "{bad:?}");
        }
    }

    #[test]
    fn test_normalize_wallet_id() {
        assert_eq!(normalize_wallet_id("ABC123"), "kwl-abc123-cc");
        assert_eq!(normalize_wallet_id(" kwl-abc123-CC "), "kwl-abc123-cc");
        assert_eq!(normalize_wallet_id("abc123-cc"), "kwl-abc123-cc");
        assert_eq!(normalize_wallet_id("  "), "");
    }
}
