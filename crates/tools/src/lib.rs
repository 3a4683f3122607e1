pub mod config;
pub mod logging;
pub mod record_file;
pub mod seed;

/// Format a seed as an exact decimal string with no prefix or suffix.
pub fn format_seed(seed: u64) -> String {
    seed.to_string()
}

/// Format a layout fingerprint as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_fingerprint(fingerprint: u64) -> String {
    format!("0x{fingerprint:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_zero_padded_lowercase_hex() {
        assert_eq!(format_fingerprint(0xAB), "0x00000000000000ab");
        assert_eq!(format_fingerprint(u64::MAX), "0xffffffffffffffff");
    }

    #[test]
    fn seed_is_plain_decimal() {
        assert_eq!(format_seed(18_446_744_073_709_551_615), "18446744073709551615");
    }
}
