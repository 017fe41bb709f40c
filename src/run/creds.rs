//! Staging of a single-profile AWS credentials file for the instance.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::UserDirs;
use tracing::info;

use crate::lib::errors::CredsError;

/// File the staged credentials are written to, next to the Vagrantfile.
pub const STAGED_CREDS_FILE: &str = "creds_placeholder.txt";

const ACCESS_KEY_FIELD: &str = "aws_access_key_id";
const SECRET_KEY_FIELD: &str = "aws_secret_access_key";

/// One access/secret pair extracted from a credentials section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Default location of the shared AWS credentials file.
pub fn default_credentials_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().join(".aws/credentials"))
}

/// Extract one section from the shared credentials file and write a minimal
/// `[default]` file for the instance to consume.
pub fn stage_credentials(source: &Path, section: &str, dest: &Path) -> Result<(), CredsError> {
    if !source.exists() {
        return Err(CredsError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(source).map_err(|err| CredsError::Io {
        path: source.to_path_buf(),
        source: err,
    })?;
    let pair = extract_credential_pair(&contents, section, source)?;

    let staged = format!(
        "[default]\n{ACCESS_KEY_FIELD} = {}\n{SECRET_KEY_FIELD} = {}\n",
        pair.access_key_id, pair.secret_access_key
    );
    fs::write(dest, staged).map_err(|err| CredsError::Io {
        path: dest.to_path_buf(),
        source: err,
    })?;

    info!(
        target: "devup::creds",
        section = section,
        dest = %dest.display(),
        "Staged scoped credentials file"
    );
    Ok(())
}

/// Overwrite the staged file with nothing, so the secrets stop living on disk.
pub fn erase_staged(dest: &Path) -> Result<(), CredsError> {
    fs::write(dest, "").map_err(|err| CredsError::Io {
        path: dest.to_path_buf(),
        source: err,
    })?;
    info!(target: "devup::creds", dest = %dest.display(), "Erased staged credentials file");
    Ok(())
}

/// Scan for `[section]`; the two lines that follow must be the access key and
/// the secret key, in that order.
pub fn extract_credential_pair(
    contents: &str,
    section: &str,
    path: &Path,
) -> Result<CredentialPair, CredsError> {
    let header = format!("[{section}]");
    let mut lines = contents.lines();
    while let Some(line) = lines.next() {
        if line.trim_end() != header {
            continue;
        }
        let access_key_id = expect_entry(lines.next(), ACCESS_KEY_FIELD, section, path)?;
        let secret_access_key = expect_entry(lines.next(), SECRET_KEY_FIELD, section, path)?;
        return Ok(CredentialPair {
            access_key_id,
            secret_access_key,
        });
    }
    Err(CredsError::SectionNotFound {
        path: path.to_path_buf(),
        section: section.to_string(),
    })
}

fn expect_entry(
    line: Option<&str>,
    expected_key: &'static str,
    section: &str,
    path: &Path,
) -> Result<String, CredsError> {
    let malformed = || CredsError::MalformedEntry {
        path: path.to_path_buf(),
        section: section.to_string(),
        expected: expected_key,
    };
    let line = line.ok_or_else(malformed)?;
    let (key, value) = line.split_once('=').ok_or_else(malformed)?;
    if key.trim() != expected_key {
        return Err(malformed());
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(malformed());
    }
    Ok(value.to_string())
}
