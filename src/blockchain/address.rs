//! Checksum address parsing.
//!
//! Accepts `0x`-prefixed, 40-digit hex. All-lowercase or all-uppercase digits
//! are treated as un-checksummed and accepted; mixed case must match the
//! EIP-55 checksum exactly.

use alloy::primitives::Address;
use serde::Serializer;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address must have 40 hex digits, got {0}")]
    WrongLength(usize),

    #[error("address contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// Parse an account address, enforcing the checksum when one is present.
pub fn parse_checksummed(input: &str) -> Result<Address, AddressError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    let digits = input.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidCharacter(c));
    }
    if digits.len() != 40 {
        return Err(AddressError::WrongLength(digits.len()));
    }

    let address: Address = input.parse().map_err(|_| AddressError::WrongLength(digits.len()))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != input {
        return Err(AddressError::ChecksumMismatch);
    }

    Ok(address)
}

/// Serialize an address in EIP-55 form, for `#[serde(serialize_with)]`.
pub fn serialize_checksummed<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&address.to_checksum(None))
}

pub fn serialize_checksummed_opt<S>(
    address: &Option<Address>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match address {
        Some(address) => serializer.serialize_some(&address.to_checksum(None)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_accepts_checksummed() {
        let address = parse_checksummed(CHECKSUMMED).unwrap();
        assert_eq!(address.to_string(), CHECKSUMMED);
    }

    #[test]
    fn test_accepts_single_case() {
        let lower = parse_checksummed(&CHECKSUMMED.to_lowercase()).unwrap();
        let upper = parse_checksummed(&format!("0x{}", CHECKSUMMED[2..].to_uppercase())).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.to_string(), CHECKSUMMED);
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // First letter flipped to upper case
        let tampered = "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        assert_eq!(parse_checksummed(tampered), Err(AddressError::ChecksumMismatch));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(parse_checksummed(""), Err(AddressError::Empty));
        assert_eq!(
            parse_checksummed("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(parse_checksummed("0xf39Fd6"), Err(AddressError::WrongLength(6)));
        assert_eq!(
            parse_checksummed(&format!("{CHECKSUMMED}00")),
            Err(AddressError::WrongLength(42))
        );
        assert_eq!(
            parse_checksummed("0xg39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            Err(AddressError::InvalidCharacter('g'))
        );
    }

    #[test]
    fn test_serializes_checksummed() {
        #[derive(Serialize)]
        struct Holder {
            #[serde(serialize_with = "serialize_checksummed")]
            owner: Address,
            #[serde(serialize_with = "serialize_checksummed_opt")]
            issuer: Option<Address>,
            #[serde(serialize_with = "serialize_checksummed_opt")]
            missing: Option<Address>,
        }

        let address = parse_checksummed(&CHECKSUMMED.to_lowercase()).unwrap();
        let json = serde_json::to_value(Holder {
            owner: address,
            issuer: Some(address),
            missing: None,
        })
        .unwrap();

        assert_eq!(json["owner"], CHECKSUMMED);
        assert_eq!(json["issuer"], CHECKSUMMED);
        assert!(json["missing"].is_null());
    }
}
