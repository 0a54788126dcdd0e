//! Declared group configuration and the state recorded after each lifecycle call

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use yaml_peg::serde as yaml;

use crate::client::GroupId;
use crate::error::{GroupError, Result};
use crate::logging::debug;

/// A group, as declared by the user
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupConfig {
    /// The name of the group.
    pub name: String,
    /// The ID of the authentication domain the group will belong to. Can't be
    /// changed once the group exists.
    pub authentication_domain_id: String,
    /// IDs of users to be added to the group.
    #[serde(default)]
    pub users: BTreeSet<String>,
}

impl GroupConfig {
    /// Basic constructor
    pub fn new<I, S>(name: &str, authentication_domain_id: &str, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_owned(),
            authentication_domain_id: authentication_domain_id.to_owned(),
            users: users.into_iter().map(Into::into).collect(),
        }
    }

    /// Make sure the required fields are filled in.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if self.authentication_domain_id.is_empty() {
            return Err(GroupError::Validation {
                field: "authentication_domain_id",
            });
        }
        Ok(())
    }
}

/// An empty name is never allowed, regardless of what came before.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(GroupError::Validation { field: "name" })
    } else {
        Ok(())
    }
}

/// The recorded state of a group after a lifecycle call. This reflects what the
/// remote service reported (or accepted), not necessarily what was declared.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupState {
    /// remote id
    pub id: GroupId,
    /// display name
    pub name: String,
    /// authentication domain the group belongs to
    pub authentication_domain_id: String,
    /// member user ids
    #[serde(default)]
    pub users: BTreeSet<String>,
}

/// The groups config file: a map of address -> group
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct GroupsFile {
    /// All declared groups, keyed by address
    #[serde(default)]
    pub groups: BTreeMap<String, GroupConfig>,
}

impl GroupsFile {
    /// Parse the yaml config from a string.
    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let mut docs = yaml::from_str::<GroupsFile>(raw).context("Deserializing groups config")?;
        docs.pop()
            .ok_or_else(|| anyhow!["groups config is empty"])
    }

    /// Read the yaml config from a file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Reading {}", path.as_ref().display()))?;
        Self::from_yaml(&raw)
    }

    /// Validate every group, naming the address of the first bad one.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (address, group) in &self.groups {
            group
                .validate()
                .with_context(|| format!("invalid configuration for group {address}"))?;
        }
        Ok(())
    }
}

/// Alias for HashMap to hold credentials information.
pub type CredentialsMap = HashMap<String, String>;

/// Read the credentials file: a map of service name -> credentials.
pub fn fetch_credentials<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<HashMap<String, CredentialsMap>> {
    debug!("Trying to read credentials from {:?}", path.as_ref());
    let credentials_raw = fs::read_to_string(&path)
        .with_context(|| format!("Reading {}", path.as_ref().display()))?;
    let mut config = yaml::from_str::<HashMap<String, CredentialsMap>>(&credentials_raw)
        .context("Deserializing credentials")?;

    config
        .pop()
        .ok_or_else(|| anyhow!["failed to read credentials"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_groups_config_works() -> anyhow::Result<()> {
        let config = r#"
groups:
    engineering:
        name: Engineering
        authentication_domain_id: fdb1a2c0-domain
        users:
            - "1001"
            - "1002"
            - "1001"
    observers:
        name: Observers
        authentication_domain_id: fdb1a2c0-domain
"#;
        let parsed = GroupsFile::from_yaml(config)?;
        parsed.validate()?;

        let eng = &parsed.groups["engineering"];
        assert_eq!(eng.name, "Engineering");
        // duplicates collapse
        assert_eq!(eng.users, BTreeSet::from(["1001".to_owned(), "1002".to_owned()]));
        assert!(parsed.groups["observers"].users.is_empty());
        Ok(())
    }

    #[test]
    fn empty_fields_fail_validation() {
        let no_name = GroupConfig::new("", "domain", ["1"]);
        assert!(matches!(
            no_name.validate(),
            Err(GroupError::Validation { field: "name" })
        ));

        let no_domain = GroupConfig::new("Admins", "", Vec::<String>::new());
        assert!(matches!(
            no_domain.validate(),
            Err(GroupError::Validation {
                field: "authentication_domain_id"
            })
        ));
    }

    #[test]
    fn invalid_group_names_its_address() {
        let file = GroupsFile {
            groups: [("broken".to_owned(), GroupConfig::new("", "d", ["1"]))].into(),
        };
        let err = file.validate().unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }
}
