use tracing::{debug, info};

use super::{ProfileDocument, AWS_JSON_ENV_KEY, DEFAULT_AWS_JSON_PATH};

pub fn log_env_source(path: &std::path::Path, from_env: bool) {
    if from_env {
        info!(
            target: "devup::config",
            path = %path.display(),
            "Loading profile document using DEVUP_AWS_JSON environment variable"
        );
    } else {
        debug!(
            target: "devup::config",
            path = %path.display(),
            env = AWS_JSON_ENV_KEY,
            default = DEFAULT_AWS_JSON_PATH,
            "DEVUP_AWS_JSON not set; using default aws.json"
        );
    }
}

pub fn log_loaded(document: &ProfileDocument) {
    info!(
        target: "devup::config",
        path = %document.source_path.display(),
        application = %document.params.application,
        region = %document.params.region,
        instance_type = %document.params.instance_type,
        ami = %document.params.ami,
        has_bid_price = document.params.bid_price.is_some(),
        "Profile document loaded successfully"
    );
}
