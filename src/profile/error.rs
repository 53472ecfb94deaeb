// Tue Jan 13 2026 - Alex

use crate::profile::{Architecture, OsFamily};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Unsupported profile: {os} {major}.{minor} {architecture}")]
    UnsupportedProfile {
        os: OsFamily,
        major: u32,
        minor: u32,
        architecture: Architecture,
    },
    #[error("Profile is for {found}, expected {expected}")]
    WrongOs { expected: OsFamily, found: OsFamily },
    #[error("Layout patches have cyclic precedence: {0:?}")]
    PrecedenceCycle(Vec<String>),
    #[error("Type not present in profile: {0}")]
    MissingType(String),
    #[error("Malformed layout document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
