// Fri Jan 17 2026 - Alex

use crate::memory::{Address, BufferSource, ByteSource};
use crate::profile::builtin::windows::{CACHE_ENTRY, SHIM_RECORDS};
use crate::profile::{OsFamily, Profile, ProfileMetadata};
use crate::recon::ReconError;
use crate::view::{FieldValue, TypedView};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// Blobs shorter than this cannot hold any header.
pub const MIN_BLOB_LEN: usize = 0x1c;

pub const XP_MAGIC: u32 = 0xdead_beef;
pub const MAGIC: u32 = 0xbadc_0ffe;

pub const VALUE_NAME: &str = "AppCompatCache";
const DEFAULT_CONTROL_SET: &str = "ControlSet001";

// 100ns intervals between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_DIFF: u64 = 116_444_736_000_000_000;
const FILETIME_TICKS_PER_SEC: u64 = 10_000_000;

/// Windows FILETIME.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WinTimestamp(pub u64);

impl WinTimestamp {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `None` for zero and for values outside chrono's range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if self.is_zero() {
            return None;
        }
        let since_unix = self.0 as i128 - FILETIME_UNIX_DIFF as i128;
        let ticks = FILETIME_TICKS_PER_SEC as i128;
        let secs = i64::try_from(since_unix.div_euclid(ticks)).ok()?;
        let nanos = (since_unix.rem_euclid(ticks) * 100) as u32;
        Utc.timestamp_opt(secs, nanos).single()
    }
}

impl fmt::Display for WinTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%M:%S UTC")),
            None => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShimCacheRecord {
    pub path: String,
    pub last_modified: WinTimestamp,
    /// Only the XP layout records an update time.
    pub last_update: Option<WinTimestamp>,
    pub file_size: Option<i64>,
    pub insert_flags: Option<u32>,
    pub shim_flags: Option<u32>,
}

/// Keeps tab and the visible ASCII range, dropping everything else.
pub fn sanitize(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|&&b| b == b'\t' || (33..=126).contains(&b))
        .map(|&b| b as char)
        .collect()
}

fn is_xp(meta: &ProfileMetadata) -> bool {
    (meta.major, meta.minor) <= (5, 1)
}

/// SYSTEM hive key holding the cache value for this Windows version.
pub fn registry_key(meta: &ProfileMetadata, control_set: Option<&str>) -> String {
    let control_set = control_set.unwrap_or(DEFAULT_CONTROL_SET);
    let leaf = if is_xp(meta) { "AppCompatibility" } else { "AppCompatCache" };
    format!("{}\\Control\\Session Manager\\{}", control_set, leaf)
}

/// Lazily decoded records of one ShimCache blob.
///
/// The header is validated up front: a blob too short for a header, a
/// negative count, or a non-empty record table running past the blob end
/// are errors before any record is produced.
pub struct ShimCacheRecords<'a> {
    profile: &'a Profile,
    blob: BufferSource,
    xp: bool,
    magic: Option<u64>,
    entries: Address,
    stride: u64,
    count: u64,
    next: u64,
}

impl<'a> ShimCacheRecords<'a> {
    pub fn new(profile: &'a Profile, data: Vec<u8>) -> Result<Self, ReconError> {
        profile.require_os(OsFamily::Windows)?;
        profile.require_layout(SHIM_RECORDS)?;
        profile.require_layout(CACHE_ENTRY)?;
        if data.len() < MIN_BLOB_LEN {
            return Err(ReconError::NoShimCacheData);
        }

        let len = data.len();
        let blob = BufferSource::new(data).named("AppCompatCache");
        let header = profile.view(SHIM_RECORDS, Address::zero(), &blob);
        let magic = header.read_uint("Magic");
        let raw_count = header.read_int("NumRecords").ok_or(ReconError::NoShimCacheData)?;
        let out_of_bounds = || ReconError::RecordsOutOfBounds { count: raw_count, len };
        let count = u64::try_from(raw_count).map_err(|_| out_of_bounds())?;

        let table = header.array("Entries").ok_or(ReconError::NoShimCacheData)?;
        let (entries, stride) = (table.base(), table.stride());
        let end = stride
            .checked_mul(count)
            .and_then(|size| entries.as_u64().checked_add(size))
            .ok_or_else(out_of_bounds)?;
        if count > 0 && end > len as u64 {
            return Err(out_of_bounds());
        }

        log::debug!(
            "ShimCache blob of {} bytes: magic {:#x}, {} records of {:#x} bytes",
            len,
            magic.unwrap_or(0),
            count,
            stride
        );
        Ok(Self {
            profile,
            xp: is_xp(profile.metadata()),
            blob,
            magic,
            entries,
            stride,
            count,
            next: 0,
        })
    }

    /// Header magic. Informational only, never checked.
    pub fn magic(&self) -> Option<u64> {
        self.magic
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    fn decode(&self, entry: &TypedView<'_>) -> ShimCacheRecord {
        let path = if self.xp {
            entry.array("Path").and_then(|a| a.read_bytes())
        } else {
            let offset = entry.read_uint("PathOffset").unwrap_or(0);
            let length = entry.read_uint("Length").unwrap_or(0) as usize;
            self.blob.read_bytes(Address::new(offset), length).ok()
        };
        let path = match path {
            Some(bytes) => sanitize(&bytes),
            None => {
                log::debug!("unreadable path in ShimCache entry at {}", entry.offset());
                String::new()
            }
        };

        let file_size = match entry.get("FileSize") {
            FieldValue::Struct(quad) => quad.read_int("QuadPart"),
            value => value.as_int(),
        };

        ShimCacheRecord {
            path,
            last_modified: WinTimestamp(entry.read_uint("LastModified").unwrap_or(0)),
            last_update: entry.read_uint("LastUpdate").map(WinTimestamp),
            file_size,
            insert_flags: entry.read_uint("InsertFlags").map(|v| v as u32),
            shim_flags: entry
                .read_uint("ShimFlags")
                .or_else(|| entry.read_uint("Flags"))
                .map(|v| v as u32),
        }
    }
}

impl Iterator for ShimCacheRecords<'_> {
    type Item = ShimCacheRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let at = self.entries + self.next * self.stride;
        self.next += 1;
        let entry = self.profile.view(CACHE_ENTRY, at, &self.blob);
        Some(self.decode(&entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left, Some(left))
    }
}

/// Decodes every record of `data`.
pub fn decode(profile: &Profile, data: Vec<u8>) -> Result<Vec<ShimCacheRecord>, ReconError> {
    Ok(ShimCacheRecords::new(profile, data)?.collect())
}
