//! # Shared Utility Functions
//!
//! Address display helpers used by the sync core logs and presentation adapters.
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x73feaa1eE314F8c655E354234017bE2193C9E24E";
//! assert_eq!(format_address(address, 6, 4), "0x73fe...E24E");
//! ```

use alloy_primitives::Address;

/// Format an address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// Strings not longer than `prefix_len + suffix_len` are returned unchanged.
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if !address.is_ascii()
        || address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Checksummed `0x1234...abcd` form of an account.
pub fn truncate_address(address: &Address) -> String {
    format_address(&address.to_checksum(None), 6, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let addr = "0x73feaa1eE314F8c655E354234017bE2193C9E24E";
        assert_eq!(format_address(addr, 6, 4), "0x73fe...E24E");
        assert_eq!(format_address(addr, 2, 2), "0x...4E");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("0xabc", 4, 4), "0xabc");
        assert_eq!(format_address("", 4, 4), "");
    }

    #[test]
    fn test_truncate_address_is_checksummed() {
        let addr: Address = "0x73feaa1ee314f8c655e354234017be2193c9e24e".parse().unwrap();
        assert_eq!(truncate_address(&addr), "0x73fe...E24E");
    }
}
