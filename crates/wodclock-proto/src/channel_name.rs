//! Tenant-scoped channel naming.
//!
//! Display and Remotes rendezvous without negotiation: both derive the channel
//! name from the tenant ("box") identifier alone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Result};

/// Tenant (box) identifier, typically the box slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Validate and wrap a tenant identifier.
    ///
    /// Rejects empty identifiers and identifiers containing `:` or whitespace,
    /// since either would make channel names ambiguous.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.contains(':') || id.chars().any(char::is_whitespace) {
            return Err(ProtocolError::InvalidTenant(id));
        }
        Ok(Self(id))
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of the timer channel for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(String);

impl ChannelName {
    /// Suffix appended to the tenant identifier.
    pub const SUFFIX: &'static str = "timer";

    /// Derive the timer channel for `tenant`: `"<tenant>:timer"`.
    pub fn for_tenant(tenant: &TenantId) -> Self {
        Self(format!("{tenant}:{}", Self::SUFFIX))
    }

    /// The channel name as sent to the transport.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
