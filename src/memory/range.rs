// Tue Jan 13 2026 - Alex

use crate::memory::Address;
use std::fmt;

/// Half-open `[start, end)` span of addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

impl MemoryRange {
    /// Returns `None` when `end < start`, which happens with garbage module
    /// records.
    pub fn new(start: Address, end: Address) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    pub fn from_start_size(start: Address, size: u64) -> Option<Self> {
        Self::new(start, start.checked_add(size)?)
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.is_within_range(self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_containment() {
        let range = MemoryRange::from_start_size(Address::new(0x1000), 0x100).unwrap();
        assert!(range.contains(Address::new(0x1000)));
        assert!(range.contains(Address::new(0x10ff)));
        assert!(!range.contains(Address::new(0x1100)));
        assert_eq!(range.size(), 0x100);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(MemoryRange::new(Address::new(0x2000), Address::new(0x1000)).is_none());
        assert!(MemoryRange::from_start_size(Address::new(u64::MAX), 2).is_none());
    }
}
