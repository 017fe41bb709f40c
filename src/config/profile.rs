//! Raw profile document structure and resolution into flat deployment parameters.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

/// Flat deployment parameters for one named profile.
///
/// Every field except `bid_price` is guaranteed non-empty after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParams {
    pub application: String,
    pub region: String,
    pub subnet_id: String,
    pub security_group: String,
    pub ami: String,
    pub keypair: String,
    pub bid_price: Option<String>,
    pub instance_type: String,
    pub aws_profile: String,
}

#[derive(Debug, Deserialize)]
pub struct RawProfileDoc {
    pub application: Option<String>,
    pub profile: Option<BTreeMap<String, RawProfileEntry>>,
    pub app: Option<RawAppSection>,
    pub ec2: Option<RawEc2Section>,
}

#[derive(Debug, Deserialize)]
pub struct RawProfileEntry {
    pub region: Option<String>,
    pub subnet: Option<BTreeMap<String, String>>,
    pub security_group: Option<String>,
    pub keypair: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAppSection {
    pub instance_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEc2Section {
    pub instance_type: Option<BTreeMap<String, RawInstanceTypeEntry>>,
    pub ami: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

#[derive(Debug, Deserialize)]
pub struct RawInstanceTypeEntry {
    pub arch: Option<String>,
    pub bid_price: Option<BTreeMap<String, String>>,
}

/// Resolve one named profile from the raw document.
pub fn resolve_params(
    raw: &RawProfileDoc,
    profile_name: &str,
    path: &Path,
) -> Result<ResolvedParams, ConfigError> {
    let application = require_field(raw.application.as_deref(), "application", path)?;

    let profiles = raw.profile.as_ref().ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "profile",
    })?;
    let entry = profiles
        .get(profile_name)
        .ok_or_else(|| ConfigError::MissingProfile {
            path: path.to_path_buf(),
            profile: profile_name.to_string(),
        })?;

    let region = require_field(entry.region.as_deref(), "profile.region", path)?;
    // Subnet policy: lexicographically smallest availability-zone key wins.
    let subnet_id = entry
        .subnet
        .as_ref()
        .and_then(|subnets| subnets.values().next())
        .map(String::as_str)
        .ok_or(ConfigError::MissingField {
            path: path.to_path_buf(),
            field: "profile.subnet",
        })
        .and_then(|subnet| require_field(Some(subnet), "profile.subnet", path))?;
    let security_group = require_field(
        entry.security_group.as_deref(),
        "profile.security_group",
        path,
    )?;
    let keypair = require_field(entry.keypair.as_deref(), "profile.keypair", path)?;
    let aws_profile = require_field(entry.profile.as_deref(), "profile.profile", path)?;

    let instance_type = require_field(
        raw.app
            .as_ref()
            .and_then(|app| app.instance_type.as_deref()),
        "app.instance_type",
        path,
    )?;

    let ec2 = raw.ec2.as_ref().ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "ec2",
    })?;
    let type_entry = ec2
        .instance_type
        .as_ref()
        .and_then(|types| types.get(&instance_type))
        .ok_or_else(|| ConfigError::MissingInstanceType {
            path: path.to_path_buf(),
            instance_type: instance_type.clone(),
        })?;
    let arch = require_field(type_entry.arch.as_deref(), "ec2.instance_type.arch", path)?;
    // Absent bid price means on-demand, not an error.
    let bid_price = type_entry
        .bid_price
        .as_ref()
        .and_then(|bids| bids.get(&region))
        .cloned();

    let ami = ec2
        .ami
        .as_ref()
        .and_then(|amis| amis.get(&region))
        .and_then(|by_arch| by_arch.get(&arch))
        .cloned()
        .ok_or_else(|| ConfigError::MissingAmi {
            path: path.to_path_buf(),
            region: region.clone(),
            arch: arch.clone(),
        })?;
    if ami.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            path: path.to_path_buf(),
            field: "ec2.ami",
        });
    }

    Ok(ResolvedParams {
        application,
        region,
        subnet_id,
        security_group,
        ami,
        keypair,
        bid_price,
        instance_type,
        aws_profile,
    })
}

fn require_field(
    value: Option<&str>,
    field: &'static str,
    path: &Path,
) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field,
    })?;
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            path: path.to_path_buf(),
            field,
        });
    }
    Ok(value.to_string())
}
