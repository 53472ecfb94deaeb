// Fri Jan 17 2026 - Alex

use crate::config::AnalysisConfig;
use crate::memory::{Address, ByteSource};
use crate::profile::{FieldType, OsFamily, Profile, ProfileError, ProfileMetadata, ScalarKind, Version};
use crate::recon::ReconError;
use crate::view::{LazyArray, TypedView};
use crate::walk::BucketWalk;
use serde::Serialize;
use std::net::Ipv4Addr;

const DEV_NAME_LEN: usize = 16;

/// Where `rtable` keeps its `dst_entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteCacheVariant {
    /// `rtable.dst`
    Direct,
    /// `rtable.u.dst`, kernels before 2.6.36
    Union,
}

impl RouteCacheVariant {
    pub const UNION_UNTIL: Version = Version::new(2, 6, 36);

    pub fn for_metadata(meta: &ProfileMetadata) -> Self {
        if meta.version() < Self::UNION_UNTIL {
            RouteCacheVariant::Union
        } else {
            RouteCacheVariant::Direct
        }
    }

    pub fn dst_path(self) -> &'static str {
        match self {
            RouteCacheVariant::Direct => "dst",
            RouteCacheVariant::Union => "u.dst",
        }
    }

    pub fn next_path(self) -> &'static str {
        match self {
            RouteCacheVariant::Direct => "dst.rt_next",
            RouteCacheVariant::Union => "u.dst.rt_next",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Device name, `*` when the route has no device.
    pub interface: String,
    pub destination: Option<Ipv4Addr>,
    pub gateway: Option<Ipv4Addr>,
}

/// Entries of the IPv4 routing cache.
pub struct RouteCache<'a> {
    walk: BucketWalk<'a>,
    variant: RouteCacheVariant,
}

impl<'a> RouteCache<'a> {
    pub fn new(profile: &'a Profile, source: &'a dyn ByteSource, config: &AnalysisConfig) -> Result<Self, ReconError> {
        profile.require_os(OsFamily::Linux)?;
        let variant = RouteCacheVariant::for_metadata(profile.metadata());

        let mask = profile
            .symbol_value("rt_hash_mask", &FieldType::scalar(ScalarKind::U32), source)
            .as_uint()
            .ok_or_else(|| ReconError::MissingSymbol("rt_hash_mask".to_string()))?;
        let table = profile
            .symbol_value("rt_hash_table", &FieldType::pointer_to_struct("rt_hash_bucket"), source)
            .as_uint()
            .ok_or_else(|| ReconError::MissingSymbol("rt_hash_table".to_string()))?;
        let buckets = LazyArray::new(
            profile,
            source,
            FieldType::struct_named("rt_hash_bucket"),
            Address::new(table),
            mask,
        )
        .ok_or_else(|| ProfileError::MissingType("rt_hash_bucket".to_string()))?;

        log::debug!("route cache: {} buckets at {:#x}, {:?} layout", mask, table, variant);
        let walk = BucketWalk::new(profile, source, "rtable", variant.next_path())
            .table(buckets, Some("chain"))
            .with_limit(config.max_chain_nodes);
        Ok(Self { walk, variant })
    }

    pub fn variant(&self) -> RouteCacheVariant {
        self.variant
    }

    fn entry(&self, rtable: &TypedView<'_>) -> RouteEntry {
        let dst = rtable.member(self.variant.dst_path());
        let interface = match dst.pointer("dev") {
            Some(dev) if !dev.is_null() => dev.deref().read_string("name", DEV_NAME_LEN).unwrap_or_default(),
            _ => "*".to_string(),
        };
        RouteEntry {
            interface,
            destination: ipv4(rtable, "rt_dst"),
            gateway: ipv4(rtable, "rt_gateway"),
        }
    }
}

/// Reads a 32-bit field as an address in network byte order.
fn ipv4(view: &TypedView<'_>, field: &str) -> Option<Ipv4Addr> {
    let octets = view
        .cast(field, &FieldType::array(FieldType::scalar(ScalarKind::U8), 4))
        .into_array()?
        .read_bytes()?;
    let octets: [u8; 4] = octets.try_into().ok()?;
    Some(Ipv4Addr::from(octets))
}

impl Iterator for RouteCache<'_> {
    type Item = RouteEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let rtable = self.walk.next()?;
        Some(self.entry(&rtable))
    }
}
