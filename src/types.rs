//! Leaf-level fixed-width newtypes.
//!
//! `Address` and `Salt` replace raw byte slices at the API boundary, catching
//! width mistakes at compile time. Both serialize as transparent
//! `0x`-prefixed lowercase hex strings so they are wire-compatible with JSON
//! tooling.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Error returned when constructing a newtype from an invalid hex string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexParseError {
    #[error("invalid {kind} length: expected {expected} hex chars, got {got}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid characters in {kind}: '{got}'")]
    InvalidChars { kind: &'static str, got: String },
}

fn decode_fixed<const N: usize>(kind: &'static str, s: &str) -> Result<[u8; N], HexParseError> {
    let hex_part = s.strip_prefix("0x").unwrap_or(s);
    if hex_part.len() != N * 2 {
        return Err(HexParseError::InvalidLength {
            kind,
            expected: N * 2,
            got: hex_part.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(hex_part, &mut out).map_err(|_| HexParseError::InvalidChars {
        kind,
        got: s.to_string(),
    })?;
    Ok(out)
}

// ── Address ─────────────────────────────────────────────────────────────

/// Fixed-width 20-byte instance/contract identifier.
///
/// `Address::ZERO` is the null identifier the allocation primitive uses to
/// signal failure; it never denotes a live instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;
    pub const ZERO: Self = Self([0u8; Self::LEN]);

    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Width-checked construction from a slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HexParseError> {
        let arr: [u8; Self::LEN] =
            bytes
                .try_into()
                .map_err(|_| HexParseError::InvalidLength {
                    kind: "Address",
                    expected: Self::LEN * 2,
                    got: bytes.len() * 2,
                })?;
        Ok(Self(arr))
    }

    /// Validated constructor — accepts `0x`-prefixed or bare lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, HexParseError> {
        decode_fixed("Address", s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; Self::LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

// ── Salt ────────────────────────────────────────────────────────────────

/// Caller-chosen 32-byte value for the deterministic allocation path.
///
/// Together with the deployer identity and the stub bytes it fixes a clone's
/// address before creation. It has no meaning on the sequential path.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt([u8; 32]);

impl Salt {
    pub const LEN: usize = 32;
    pub const ZERO: Self = Self([0u8; Self::LEN]);

    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Convenience: the integer big-endian in the trailing bytes.
    pub const fn from_u64(v: u64) -> Self {
        let mut out = [0u8; Self::LEN];
        let be = v.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            out[Self::LEN - 8 + i] = be[i];
            i += 1;
        }
        Self(out)
    }

    /// Validated constructor — accepts `0x`-prefixed or bare lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, HexParseError> {
        decode_fixed("Salt", s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", self.to_hex())
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_roundtrip() {
        let a = Address::from_hex("0x00112233445566778899aabbccddeeff00112233").unwrap();
        assert_eq!(a.to_hex(), "0x00112233445566778899aabbccddeeff00112233");
        assert_eq!(format!("{a}"), a.to_hex());
    }

    #[test]
    fn address_accepts_bare_hex() {
        let bare = Address::from_hex("00112233445566778899aabbccddeeff00112233").unwrap();
        let prefixed = Address::from_hex("0x00112233445566778899aabbccddeeff00112233").unwrap();
        assert_eq!(bare, prefixed);
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!(matches!(
            Address::from_hex("0xaabb"),
            Err(HexParseError::InvalidLength { expected: 40, .. })
        ));
    }

    #[test]
    fn address_rejects_non_hex() {
        assert!(matches!(
            Address::from_hex("0xzz112233445566778899aabbccddeeff00112233"),
            Err(HexParseError::InvalidChars { .. })
        ));
    }

    #[test]
    fn address_from_slice_checks_width() {
        assert!(Address::from_slice(&[1u8; 20]).is_ok());
        assert!(Address::from_slice(&[1u8; 19]).is_err());
        assert!(Address::from_slice(&[1u8; 21]).is_err());
    }

    #[test]
    fn address_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1u8; 20]).is_zero());
    }

    #[test]
    fn address_serde_roundtrip() {
        let a = Address::from_bytes([0xab; 20]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", a.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }

    #[test]
    fn salt_from_u64_is_big_endian_tail() {
        let s = Salt::from_u64(0x0102);
        let b = s.as_bytes();
        assert_eq!(&b[..30], &[0u8; 30]);
        assert_eq!(b[30], 0x01);
        assert_eq!(b[31], 0x02);
    }

    #[test]
    fn salt_hex_roundtrip() {
        let s = Salt::from_u64(7);
        let back = Salt::from_hex(&s.to_hex()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn salt_serde_roundtrip() {
        let s = Salt::from_u64(42);
        let json = serde_json::to_string(&s).unwrap();
        let back: Salt = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
