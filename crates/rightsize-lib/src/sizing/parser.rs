//! Instance type parsing
//!
//! Splits identifiers such as `t3a.large`, `db.r6g.xlarge` or
//! `cache.t4g.micro` into a family token and a size tier. Service prefixes
//! (`db.`, `cache.`) stay part of the family.

use super::ladder::SizeTier;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};

const SERVICE_PREFIXES: [&str; 2] = ["db.", "cache."];

/// Instance type decomposed into family and size
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceType {
    pub family: String,
    pub size: SizeTier,
}

impl InstanceType {
    /// Family name without any `db.` / `cache.` service prefix
    pub fn base_family(&self) -> &str {
        base_family(&self.family)
    }

    /// Same family at another size
    pub fn with_size(&self, size: SizeTier) -> String {
        format!("{}.{}", self.family, size)
    }
}

impl std::fmt::Display for InstanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.family, self.size)
    }
}

/// Strip a service prefix from a family token
pub fn base_family(family: &str) -> &str {
    SERVICE_PREFIXES
        .iter()
        .find_map(|prefix| family.strip_prefix(prefix))
        .unwrap_or(family)
}

/// Split an instance type into `(family, size)` without validating the size
pub fn split_instance_type(instance_type: &str) -> Option<(String, &str)> {
    let parts: Vec<&str> = instance_type.split('.').collect();

    let prefixed = SERVICE_PREFIXES
        .iter()
        .any(|prefix| instance_type.starts_with(prefix));
    if prefixed && parts.len() >= 3 {
        return Some((format!("{}.{}", parts[0], parts[1]), parts[2]));
    }

    if parts.len() == 2 {
        return Some((parts[0].to_string(), parts[1]));
    }

    None
}

/// Parse an instance type into family and ladder tier
pub fn parse(instance_type: &str) -> Result<InstanceType, ParseError> {
    let (family, size) = split_instance_type(instance_type)
        .ok_or_else(|| ParseError::Unparseable(instance_type.to_string()))?;

    if family.is_empty() || family.ends_with('.') {
        return Err(ParseError::Unparseable(instance_type.to_string()));
    }

    let size = SizeTier::from_suffix(size).ok_or_else(|| ParseError::UnknownSize {
        instance_type: instance_type.to_string(),
        size: size.to_string(),
    })?;

    Ok(InstanceType { family, size })
}
