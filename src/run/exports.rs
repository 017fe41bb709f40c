//! Map resolved parameters onto the environment the Vagrantfile reads.

use std::collections::BTreeMap;

use crate::config::ResolvedParams;

pub const VAR_APPLICATION: &str = "VAGRANT_APPLICATION";
pub const VAR_AWS_PROFILE: &str = "VAGRANT_AWS_PROFILE";
pub const VAR_REGION: &str = "VAGRANT_AWS_REGION";
pub const VAR_CREDS: &str = "VAGRANT_AWS_CREDS";
pub const VAR_SUBNET_ID: &str = "VAGRANT_AWS_SUBNET_ID";
pub const VAR_SECURITY_GROUP: &str = "VAGRANT_AWS_SECURITY_GROUP";
pub const VAR_AMI: &str = "VAGRANT_AWS_AMI";
pub const VAR_KEYPAIR: &str = "VAGRANT_AWS_EC2_KEYPAIR";
pub const VAR_INSTANCE_TYPE: &str = "VAGRANT_AWS_EC2_INSTANCE_TYPE";
pub const VAR_BID_PRICE: &str = "VAGRANT_AWS_EC2_BID_PRICE";

/// Build the environment map handed to the vagrant subprocess.
///
/// The map is never written into this process's own environment; it travels
/// to `Command::envs` directly. `BTreeMap` keeps iteration (and therefore the
/// `exports` output) sorted by variable name. The bid price entry is omitted
/// when the profile has no bid, and the creds entry is only present while a
/// staged credentials file exists.
pub fn environment_map(
    params: &ResolvedParams,
    staged_creds: Option<&str>,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(VAR_APPLICATION.to_string(), params.application.clone());
    env.insert(VAR_AWS_PROFILE.to_string(), params.aws_profile.clone());
    env.insert(VAR_REGION.to_string(), params.region.clone());
    env.insert(VAR_SUBNET_ID.to_string(), params.subnet_id.clone());
    env.insert(VAR_SECURITY_GROUP.to_string(), params.security_group.clone());
    env.insert(VAR_AMI.to_string(), params.ami.clone());
    env.insert(VAR_KEYPAIR.to_string(), params.keypair.clone());
    env.insert(VAR_INSTANCE_TYPE.to_string(), params.instance_type.clone());
    if let Some(bid_price) = &params.bid_price {
        env.insert(VAR_BID_PRICE.to_string(), bid_price.clone());
    }
    if let Some(creds) = staged_creds {
        env.insert(VAR_CREDS.to_string(), creds.to_string());
    }
    env
}

/// Render `export NAME=value` lines for consumption by a calling shell.
pub fn render_exports(env: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in env {
        out.push_str(&format!("export {name}={value}\n"));
    }
    out
}
