// Wed Jan 15 2026 - Alex

use crate::memory::{Address, Endianness, MemoryError};

const STRING_CHUNK: usize = 64;

/// Anything that can hand out bytes at an offset: a memory image, a
/// virtual address space layered over one, or a raw registry value.
pub trait ByteSource: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn name(&self) -> &str;

    /// Virtual to physical translation. Flat sources have none.
    fn translate(&self, _addr: Address) -> Option<Address> {
        None
    }

    fn is_valid(&self, addr: Address, len: usize) -> bool {
        self.read_bytes(addr, len.max(1)).is_ok()
    }

    fn read_uint(&self, addr: Address, width: usize, endian: Endianness) -> Result<u64, MemoryError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(MemoryError::UnsupportedWidth(width));
        }
        let bytes = self.read_bytes(addr, width)?;
        endian
            .decode_uint(&bytes)
            .ok_or(MemoryError::ShortRead { addr: addr.as_u64(), wanted: width, got: bytes.len() })
    }

    fn read_int(&self, addr: Address, width: usize, endian: Endianness) -> Result<i64, MemoryError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(MemoryError::UnsupportedWidth(width));
        }
        let bytes = self.read_bytes(addr, width)?;
        endian
            .decode_int(&bytes)
            .ok_or(MemoryError::ShortRead { addr: addr.as_u64(), wanted: width, got: bytes.len() })
    }

    /// Reads a NUL-terminated string of at most `max_len` bytes. A string
    /// that runs into an unreadable page is cut at the last readable byte.
    fn read_c_string(&self, addr: Address, max_len: usize) -> Result<String, MemoryError> {
        let mut out = Vec::new();
        let mut cursor = addr;

        while out.len() < max_len {
            let want = STRING_CHUNK.min(max_len - out.len());
            let chunk = match self.read_bytes(cursor, want) {
                Ok(chunk) => chunk,
                Err(_) => read_bytewise(self, cursor, want),
            };
            if chunk.is_empty() {
                break;
            }
            if let Some(nul) = chunk.iter().position(|&b| b == 0) {
                out.extend_from_slice(&chunk[..nul]);
                return Ok(String::from_utf8_lossy(&out).into_owned());
            }
            let short = chunk.len() < want;
            out.extend_from_slice(&chunk);
            if short {
                break;
            }
            cursor = match cursor.checked_add(want as u64) {
                Some(next) => next,
                None => break,
            };
        }

        if out.is_empty() && !self.is_valid(addr, 1) {
            return Err(MemoryError::Unmapped(addr.as_u64()));
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn read_bytewise<S: ByteSource + ?Sized>(source: &S, addr: Address, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    for i in 0..len as u64 {
        let Some(at) = addr.checked_add(i) else { break };
        match source.read_bytes(at, 1) {
            Ok(byte) if byte.len() == 1 => out.push(byte[0]),
            _ => break,
        }
    }
    out
}
