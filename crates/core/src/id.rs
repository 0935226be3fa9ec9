//! Product identifiers.
//!
//! Identifiers follow the document-store object-id layout: 12 bytes made of a
//! 4-byte big-endian Unix timestamp (seconds), 5 process-unique random bytes,
//! and a 3-byte counter. On the wire they are 24 hexadecimal characters.

use core::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;

/// Number of raw bytes in a [`ProductId`].
pub const PRODUCT_ID_LEN: usize = 12;

/// Number of hex characters in the textual form of a [`ProductId`].
pub const PRODUCT_ID_HEX_LEN: usize = PRODUCT_ID_LEN * 2;

/// Identifier of a product, assigned by the store at creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId([u8; PRODUCT_ID_LEN]);

impl ProductId {
    /// Generate a fresh identifier.
    ///
    /// Identifiers generated by one process never repeat unless more than 2^24
    /// are issued within the same second.
    pub fn generate() -> Self {
        let mut bytes = [0u8; PRODUCT_ID_LEN];

        let secs = Utc::now().timestamp() as u32;
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());

        let count = next_count();
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);

        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; PRODUCT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRODUCT_ID_LEN] {
        &self.0
    }

    /// Pure syntactic check: exactly 24 ASCII hex digits (either case).
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == PRODUCT_ID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

// Random bytes of a v7 UUID; bytes 9..14 carry no version/variant bits.
fn process_unique() -> &'static [u8] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let seed = Uuid::now_v7();
        let mut out = [0u8; 5];
        out.copy_from_slice(&seed.as_bytes()[9..14]);
        out
    })
}

fn next_count() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| {
        let seed = Uuid::now_v7();
        let b = seed.as_bytes();
        AtomicU32::new(u32::from_be_bytes([0, b[13], b[14], b[15]]))
    });
    counter.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ProductId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_well_formed(s) {
            return Err(CatalogError::invalid_identifier(format!(
                "ProductId: expected {PRODUCT_ID_HEX_LEN} hex characters, got {s:?}"
            )));
        }

        let raw = s.as_bytes();
        let mut bytes = [0u8; PRODUCT_ID_LEN];
        for (i, out) in bytes.iter_mut().enumerate() {
            // Both nibbles are hex digits (checked above).
            let hi = hex_value(raw[2 * i]).unwrap_or(0);
            let lo = hex_value(raw[2 * i + 1]).unwrap_or(0);
            *out = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for ProductId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.to_string()
    }
}
