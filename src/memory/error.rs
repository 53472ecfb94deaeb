// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unmapped address 0x{0:x}")]
    Unmapped(u64),
    #[error("Out of bounds: address 0x{0:x} not in range")]
    OutOfBounds(u64),
    #[error("Short read at 0x{addr:x}: wanted {wanted} bytes, got {got}")]
    ShortRead { addr: u64, wanted: usize, got: usize },
    #[error("Unsupported scalar width: {0}")]
    UnsupportedWidth(usize),
    #[error("Invalid memory range")]
    InvalidRange,
}
