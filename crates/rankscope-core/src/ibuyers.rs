//! Known iBuyer domains, with an optional YAML override file.
//!
//! The built-in list covers the large national iBuyers. Deployments that
//! track additional competitors swap it out via `RANKSCOPE_IBUYERS_PATH`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Domains of companies that buy houses directly at scale.
const BUILTIN_IBUYERS: &[&str] = &[
    "opendoor.com",
    "offerpad.com",
    "redfin.com",
    "zillow.com",
    "homelight.com",
    "knock.com",
    "orchard.com",
    "webuyuglyhouses.com",
    "houzeo.com",
];

/// Set of base domains considered iBuyers.
#[derive(Debug, Clone)]
pub struct IbuyerList {
    domains: HashSet<String>,
}

impl IbuyerList {
    /// The built-in list of known national iBuyers.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            domains: BUILTIN_IBUYERS.iter().map(|&d| d.to_owned()).collect(),
        }
    }

    /// Whether `domain` (a lowercase base domain) is a known iBuyer.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct IbuyersFile {
    ibuyers: Vec<String>,
}

/// Load and validate an iBuyer list from a YAML file of the form
/// `ibuyers: [domain, ...]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty entries, duplicates).
pub fn load_ibuyers(path: &Path) -> Result<IbuyerList, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IbuyersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: IbuyersFile = serde_yaml::from_str(&content)?;
    validate_ibuyers(&file.ibuyers)
}

fn validate_ibuyers(entries: &[String]) -> Result<IbuyerList, ConfigError> {
    if entries.is_empty() {
        return Err(ConfigError::Validation(
            "ibuyers list must not be empty".to_string(),
        ));
    }
    let mut domains = HashSet::new();
    for entry in entries {
        let domain = entry.trim().to_ascii_lowercase();
        if domain.is_empty() {
            return Err(ConfigError::Validation(
                "ibuyer domain must be non-empty".to_string(),
            ));
        }
        if !domains.insert(domain.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate ibuyer domain: '{domain}'"
            )));
        }
    }
    Ok(IbuyerList { domains })
}
