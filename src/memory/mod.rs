// Tue Jan 13 2026 - Alex

pub mod address;
pub mod buffer;
pub mod endian;
pub mod error;
pub mod mmap;
pub mod range;
pub mod traits;
pub mod translated;

pub use address::Address;
pub use buffer::BufferSource;
pub use endian::Endianness;
pub use error::MemoryError;
pub use mmap::MmapSource;
pub use range::MemoryRange;
pub use traits::ByteSource;
pub use translated::TranslatedSource;
