//! Decide what a group needs: creation, replacement, an in-place update, or nothing

use std::fmt::Display;

use colored::Colorize;

use crate::{
    config::{GroupConfig, GroupState},
    error::Result,
    reconcile::{reconcile, reconcile_name, MembershipChanges},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// The change needed to bring a group in line with its configuration
pub enum GroupPlan {
    /// The group doesn't exist yet
    Create {
        /// what will be created
        config: GroupConfig,
    },
    /// The authentication domain changed. Groups can't move between domains, so
    /// the old group is deleted and a new one created.
    Replace {
        /// the group being replaced
        prior: GroupState,
        /// what will be created in its place
        config: GroupConfig,
    },
    /// Rename and/or change members in place
    Update {
        /// the group being updated
        prior: GroupState,
        /// the desired configuration
        config: GroupConfig,
        /// (old name, new name), if the name changes
        rename: Option<(String, String)>,
        /// users to add and remove
        membership: MembershipChanges,
    },
    /// Already up to date
    NoChange,
}

impl GroupPlan {
    /// True when nothing needs to be sent to the remote service
    pub fn is_no_change(&self) -> bool {
        matches!(self, GroupPlan::NoChange)
    }
}

/// Compare the recorded state (if any) with the configuration.
pub fn plan(prior: Option<&GroupState>, desired: &GroupConfig) -> Result<GroupPlan> {
    desired.validate()?;

    let prior = match prior {
        None => {
            return Ok(GroupPlan::Create {
                config: desired.to_owned(),
            })
        }
        Some(p) => p,
    };

    if prior.authentication_domain_id != desired.authentication_domain_id {
        return Ok(GroupPlan::Replace {
            prior: prior.to_owned(),
            config: desired.to_owned(),
        });
    }

    let rename = reconcile_name(&prior.name, &desired.name)
        .map(|new| (prior.name.to_owned(), new.to_owned()));
    let membership = reconcile(&prior.users, &desired.users);

    if rename.is_none() && membership.is_empty() {
        return Ok(GroupPlan::NoChange);
    }
    Ok(GroupPlan::Update {
        prior: prior.to_owned(),
        config: desired.to_owned(),
        rename,
        membership,
    })
}

impl Display for GroupPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut text = "".to_owned();
        match self {
            GroupPlan::Create { config } => {
                text += format!("{}", format!("+ group: {}\n", config.name).green()).as_str();
                text += format!("  authentication domain: {}\n", config.authentication_domain_id)
                    .as_str();
                if !config.users.is_empty() {
                    text += "  users:\n";
                }
                for user in &config.users {
                    text += format!("{}", format!("    + {user}\n").green()).as_str();
                }
            }
            GroupPlan::Replace { prior, config } => {
                text += format!(
                    "{}",
                    format!("-/+ group: {} (id {})\n", prior.name, prior.id).red()
                )
                .as_str();
                text += format!(
                    "  authentication domain: {} -> {} (forces replacement)\n",
                    prior.authentication_domain_id, config.authentication_domain_id
                )
                .as_str();
            }
            GroupPlan::Update {
                prior,
                rename,
                membership,
                ..
            } => {
                text += format!(
                    "{}{} (id {})\n",
                    "~ group: ".yellow(),
                    prior.name.yellow(),
                    prior.id
                )
                .as_str();
                if let Some((old, new)) = rename {
                    text += format!("  name: {old} -> {new}\n").as_str();
                }
                text += membership.to_string().as_str();
            }
            GroupPlan::NoChange => text += "no changes",
        }
        write!(f, "{text}")
    }
}
