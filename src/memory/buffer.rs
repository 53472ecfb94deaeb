// Tue Jan 13 2026 - Alex

use crate::memory::{Address, ByteSource, MemoryError};
use std::sync::Arc;

/// A flat in-memory byte store, e.g. a registry value pulled out of a hive
/// or a synthetic image built in a test.
#[derive(Clone)]
pub struct BufferSource {
    data: Arc<Vec<u8>>,
    base_address: Address,
    name: String,
}

impl BufferSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_base(data, Address::zero())
    }

    pub fn with_base(data: Vec<u8>, base_address: Address) -> Self {
        Self {
            data: Arc::new(data),
            base_address,
            name: "buffer".to_string(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn base_address(&self) -> Address {
        self.base_address
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    fn offset(&self, addr: Address) -> Result<usize, MemoryError> {
        let offset = addr
            .as_u64()
            .checked_sub(self.base_address.as_u64())
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;
        if offset >= self.data.len() as u64 {
            return Err(MemoryError::OutOfBounds(addr.as_u64()));
        }
        Ok(offset as usize)
    }
}

impl ByteSource for BufferSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let offset = self.offset(addr)?;
        let end = offset
            .checked_add(len)
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;
        if end > self.data.len() {
            return Err(MemoryError::ShortRead {
                addr: addr.as_u64(),
                wanted: len,
                got: self.data.len() - offset,
            });
        }
        Ok(self.data[offset..end].to_vec())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
