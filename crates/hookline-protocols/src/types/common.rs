//! Common utility types.

use serde::{Deserialize, Serialize};

/// Caller-supplied parameters for a subscription or an event.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Seconds since the Unix epoch.
pub type Timestamp = i64;

/// Current time as a [`Timestamp`].
pub fn now_timestamp() -> Timestamp {
    chrono::Utc::now().timestamp()
}

/// Semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<String>,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }
}
