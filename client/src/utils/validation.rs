//! Validation of user input before it reaches a transaction.

use crate::core::error::TxError;
use crate::core::Amount;
use alloy_primitives::{Address, U256};

/// Parse a decimal amount typed by the user into a raw integer with `decimals` places.
///
/// Fraction digits beyond `decimals` are truncated. Empty, non-numeric, non-positive and
/// out-of-range input is rejected, as is input that truncates to zero.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, TxError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TxError::InvalidAmount("Amount is required".into()));
    }

    let amount: Amount = input
        .parse()
        .map_err(|_| TxError::InvalidAmount(format!("'{}' is not a number", input)))?;
    if !amount.is_positive() {
        return Err(TxError::InvalidAmount("Amount must be greater than zero".into()));
    }

    let raw = amount
        .to_raw(decimals)
        .ok_or_else(|| TxError::InvalidAmount("Amount is too large".into()))?;
    if raw.is_zero() {
        return Err(TxError::InvalidAmount(format!(
            "Amount is below the token's {} decimal places",
            decimals
        )));
    }
    Ok(raw)
}

/// Parse a hex address, accepting any checksum casing.
pub fn validate_address(input: &str) -> Result<Address, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Address is required".into());
    }
    if !input.starts_with("0x") || input.len() != 42 {
        return Err("Address must be 0x followed by 40 hex characters".into());
    }
    input
        .parse::<Address>()
        .map_err(|e| format!("Invalid address: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_scales() {
        assert_eq!(
            parse_amount("1.5", 18),
            Ok(U256::from(1_500_000_000_000_000_000u128))
        );
        assert_eq!(parse_amount(" 2 ", 6), Ok(U256::from(2_000_000u64)));
        assert_eq!(parse_amount("0.1234567", 6), Ok(U256::from(123_456u64)));
    }

    #[test]
    fn test_parse_amount_rejects() {
        for bad in ["", "abc", "0", "-1", "0.0000001"] {
            assert!(
                matches!(parse_amount(bad, 6), Err(TxError::InvalidAmount(_))),
                "accepted {:?}",
                bad
            );
        }
        let huge = format!("1{}", "0".repeat(80));
        assert!(matches!(parse_amount(&huge, 18), Err(TxError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_amount_exponent_notation() {
        let started = std::time::Instant::now();
        for bad in ["1e999999999", "1e-999999999", "5e80"] {
            assert!(
                matches!(parse_amount(bad, 18), Err(TxError::InvalidAmount(_))),
                "accepted {:?}",
                bad
            );
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(parse_amount("2.5e1", 6), Ok(U256::from(25_000_000u64)));
    }

    #[test]
    fn test_validate_address() {
        let a = validate_address("0x000000000000000000000000000000000000dEaD").unwrap();
        assert_eq!(a, Address::left_padding_from(&[0xde, 0xad]));
        assert!(validate_address("").is_err());
        assert!(validate_address("0x1234").is_err());
        assert!(validate_address("0xzz0000000000000000000000000000000000dead").is_err());
    }
}
