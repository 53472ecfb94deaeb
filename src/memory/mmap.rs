// Tue Jan 13 2026 - Alex

use crate::memory::{Address, ByteSource, MemoryError};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// A raw memory image on disk, mapped read-only.
pub struct MmapSource {
    mmap: Arc<Mmap>,
    base_address: Address,
    name: String,
}

impl MmapSource {
    pub fn from_file<P: AsRef<Path>>(path: P, base_address: Address) -> Result<Self, MemoryError> {
        let name = path.as_ref().display().to_string();
        let file = File::open(path.as_ref())?;
        // The image is opened read-only and never resized while mapped.
        let mmap = unsafe { Mmap::map(&file) }?;
        log::debug!("mapped {} ({} bytes) at {}", name, mmap.len(), base_address);
        Ok(Self {
            mmap: Arc::new(mmap),
            base_address,
            name,
        })
    }

    pub fn base_address(&self) -> Address {
        self.base_address
    }

    pub fn size(&self) -> usize {
        self.mmap.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_ref()
    }

    fn offset(&self, addr: Address) -> Result<usize, MemoryError> {
        let offset = addr
            .as_u64()
            .checked_sub(self.base_address.as_u64())
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;
        if offset >= self.mmap.len() as u64 {
            return Err(MemoryError::OutOfBounds(addr.as_u64()));
        }
        Ok(offset as usize)
    }
}

impl ByteSource for MmapSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let offset = self.offset(addr)?;
        match offset.checked_add(len) {
            Some(end) if end <= self.mmap.len() => Ok(self.mmap[offset..end].to_vec()),
            _ => Err(MemoryError::ShortRead {
                addr: addr.as_u64(),
                wanted: len,
                got: self.mmap.len() - offset,
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
