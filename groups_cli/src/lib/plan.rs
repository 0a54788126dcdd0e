//! Plan the changes needed to bring the recorded groups in line with the config

use std::{collections::BTreeMap, fmt::Display};

use anyhow::{Context, Result};
use colored::Colorize;

use groups_core::{
    config::GroupsFile,
    log_runtime,
    logging::{debug, warn},
    plan::{plan as plan_group, GroupPlan},
    GroupManagementClient, GroupResource, GroupState,
};

use crate::state::StateFile;

/// The change for a single address
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Change {
    /// The address is in the config
    Group(GroupPlan),
    /// The address is only in the state, so the group goes away
    Destroy(GroupState),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Group(plan) => write!(f, "{plan}"),
            Change::Destroy(state) => write!(
                f,
                "{}",
                format!("- group: {} (id {})\n", state.name, state.id).red()
            ),
        }
    }
}

/// Re-read every recorded group. Groups that no longer exist are dropped from
/// the state.
pub(crate) async fn refresh<C: GroupManagementClient>(
    resource: &GroupResource<C>,
    state: &mut StateFile,
) -> Result<()> {
    let recorded = state
        .groups
        .iter()
        .map(|(address, group)| (address.to_owned(), group.id.to_owned()))
        .collect::<Vec<_>>();

    for (address, id) in recorded {
        match resource
            .read(&id)
            .await
            .with_context(|| format!("refreshing {address}"))?
        {
            Some(current) => {
                state.groups.insert(address, current);
            }
            None => {
                warn!("group {id} ({address}) no longer exists; removing it from the state");
                state.groups.remove(&address);
            }
        }
    }
    Ok(())
}

/// Compare the config with the (refreshed) state, address by address.
pub(crate) fn changes(config: &GroupsFile, state: &StateFile) -> Result<BTreeMap<String, Change>> {
    let mut changes = BTreeMap::new();

    for (address, desired) in &config.groups {
        let plan = plan_group(state.groups.get(address), desired)
            .with_context(|| format!("planning {address}"))?;
        if plan.is_no_change() {
            debug!("{address} is up to date");
            continue;
        }
        changes.insert(address.to_owned(), Change::Group(plan));
    }

    for (address, recorded) in &state.groups {
        if !config.groups.contains_key(address) {
            changes.insert(address.to_owned(), Change::Destroy(recorded.to_owned()));
        }
    }

    Ok(changes)
}

pub(crate) fn print_changes(changes: &BTreeMap<String, Change>) {
    if changes.is_empty() {
        println!("No changes found");
        return;
    }
    for (address, change) in changes {
        println!("{address}:");
        println!("{}", textwrap::indent(&change.to_string(), "  "));
    }
}

pub(super) async fn plan<C: GroupManagementClient>(
    resource: &GroupResource<C>,
    config: &GroupsFile,
    mut state: StateFile,
) -> Result<()> {
    log_runtime!("refreshing state", refresh(resource, &mut state).await?);
    let changes = changes(config, &state)?;
    print_changes(&changes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use groups_core::{client::GroupId, GroupConfig};

    use super::*;

    fn recorded(id: &str, name: &str, users: &[&str]) -> GroupState {
        GroupState {
            id: GroupId(id.to_owned()),
            name: name.to_owned(),
            authentication_domain_id: "domain-a".to_owned(),
            users: users.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn changes_cover_create_update_and_destroy() -> Result<()> {
        let config = GroupsFile {
            groups: [
                (
                    "new".to_owned(),
                    GroupConfig::new("New", "domain-a", ["1"]),
                ),
                (
                    "same".to_owned(),
                    GroupConfig::new("Same", "domain-a", ["1"]),
                ),
                (
                    "renamed".to_owned(),
                    GroupConfig::new("After", "domain-a", Vec::<String>::new()),
                ),
            ]
            .into(),
        };
        let state = StateFile {
            groups: [
                ("same".to_owned(), recorded("g-1", "Same", &["1"])),
                ("renamed".to_owned(), recorded("g-2", "Before", &[])),
                ("gone".to_owned(), recorded("g-3", "Gone", &["2"])),
            ]
            .into(),
        };

        let changes = changes(&config, &state)?;

        assert_eq!(changes.len(), 3);
        assert!(!changes.contains_key("same"));
        assert!(matches!(
            changes["new"],
            Change::Group(GroupPlan::Create { .. })
        ));
        assert!(matches!(
            &changes["renamed"],
            Change::Group(GroupPlan::Update { rename: Some((old, new)), .. })
                if old == "Before" && new == "After"
        ));
        assert_eq!(
            changes["gone"],
            Change::Destroy(recorded("g-3", "Gone", &["2"]))
        );
        Ok(())
    }

    #[test]
    fn invalid_config_names_the_address() {
        let config = GroupsFile {
            groups: [("broken".to_owned(), GroupConfig::new("", "domain-a", ["1"]))].into(),
        };
        let err = changes(&config, &StateFile::default()).unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }

    #[test]
    fn destroy_prints_the_recorded_group() {
        colored::control::set_override(false);
        let change = Change::Destroy(recorded("g-3", "Gone", &[]));
        assert_eq!(change.to_string(), "- group: Gone (id g-3)\n");
    }
}
