//! Optional metadata artifacts.
//!
//! Some files in a published bundle (`manifest.json`, the legacy `latest.json`
//! marker) may legitimately be missing or corrupt. Reads of those files return
//! an [`Artifact`] instead of a `Result`, so callers cannot accidentally turn a
//! missing manifest into a failed request.

use serde::de::DeserializeOwned;

/// Outcome of reading an optional artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact<T> {
    Present(T),
    Absent,
    /// The artifact exists (or could not be read) but is unusable. Carries the reason for logs.
    Malformed(String),
}

impl<T> Artifact<T> {
    /// Parse raw bytes as JSON. `None` means the object does not exist.
    pub fn from_json(bytes: Option<&[u8]>) -> Self
    where
        T: DeserializeOwned,
    {
        match bytes {
            None => Self::Absent,
            Some(raw) => match serde_json::from_slice(raw) {
                Ok(value) => Self::Present(value),
                Err(e) => Self::Malformed(e.to_string()),
            },
        }
    }

    /// Collapse to an `Option`, treating malformed artifacts as absent.
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Artifact<U> {
        match self {
            Self::Present(v) => Artifact::Present(f(v)),
            Self::Absent => Artifact::Absent,
            Self::Malformed(reason) => Artifact::Malformed(reason),
        }
    }
}
