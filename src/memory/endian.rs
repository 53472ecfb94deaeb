// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Decodes up to eight bytes into an unsigned integer. Returns `None` for
    /// an empty or oversized slice.
    pub fn decode_uint(self, bytes: &[u8]) -> Option<u64> {
        if bytes.is_empty() || bytes.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        match self {
            Self::Little => {
                buf[..bytes.len()].copy_from_slice(bytes);
                Some(u64::from_le_bytes(buf))
            }
            Self::Big => {
                buf[8 - bytes.len()..].copy_from_slice(bytes);
                Some(u64::from_be_bytes(buf))
            }
        }
    }

    /// Like [`decode_uint`](Self::decode_uint) but sign-extends from the
    /// slice's width.
    pub fn decode_int(self, bytes: &[u8]) -> Option<i64> {
        let raw = self.decode_uint(bytes)?;
        let bits = bytes.len() as u32 * 8;
        if bits == 64 {
            return Some(raw as i64);
        }
        let shift = 64 - bits;
        Some(((raw << shift) as i64) >> shift)
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little"),
            Self::Big => write!(f, "big"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_uint() {
        assert_eq!(Endianness::Little.decode_uint(&[0x01, 0x02]), Some(0x0201));
        assert_eq!(Endianness::Big.decode_uint(&[0x01, 0x02]), Some(0x0102));
        assert_eq!(Endianness::Little.decode_uint(&[]), None);
        assert_eq!(Endianness::Little.decode_uint(&[0; 9]), None);
    }

    #[test]
    fn test_decode_int_sign_extends() {
        assert_eq!(Endianness::Little.decode_int(&[0xff, 0xff]), Some(-1));
        assert_eq!(Endianness::Little.decode_int(&[0xfe, 0xff, 0xff, 0xff]), Some(-2));
        assert_eq!(Endianness::Little.decode_int(&[0x7f]), Some(127));
    }
}
