//! Apply planned changes, recording state after every group

use std::{collections::BTreeSet, path::Path};

use anyhow::{bail, Context, Result};

use groups_core::{
    config::GroupsFile,
    log_runtime,
    logging::{info, warn},
    plan::GroupPlan,
    GroupConfig, GroupError, GroupManagementClient, GroupResource, GroupState,
};

use crate::{
    plan::{changes, print_changes, refresh, Change},
    state::StateFile,
};

pub(super) async fn apply<C: GroupManagementClient>(
    resource: &GroupResource<C>,
    config: &GroupsFile,
    state_path: &Path,
) -> Result<()> {
    let mut state = StateFile::load(state_path).await?;
    log_runtime!("refreshing state", refresh(resource, &mut state).await?);
    state.save(state_path).await?;

    let changes = changes(config, &state)?;
    print_changes(&changes);

    let total = changes.len();
    for (address, change) in changes {
        info!("applying changes to {address}");
        let res = apply_change(resource, &mut state, &address, change).await;
        // whatever happened remotely is recorded before bailing
        state.save(state_path).await?;
        res.with_context(|| format!("applying changes to {address}"))?;
    }

    if total > 0 {
        println!("Applied changes to {total} group(s)");
    }
    Ok(())
}

async fn apply_change<C: GroupManagementClient>(
    resource: &GroupResource<C>,
    state: &mut StateFile,
    address: &str,
    change: Change,
) -> Result<()> {
    match change {
        Change::Group(GroupPlan::Create { config }) => {
            create(resource, state, address, &config).await?;
        }
        Change::Group(GroupPlan::Replace { prior, config }) => {
            resource.delete(&prior.id).await?;
            state.groups.remove(address);
            create(resource, state, address, &config).await?;
        }
        Change::Group(GroupPlan::Update { prior, config, .. }) => {
            let updated = resource.update(&prior, &config).await?;
            state.groups.insert(address.to_owned(), updated);
        }
        Change::Group(GroupPlan::NoChange) => (),
        Change::Destroy(recorded) => {
            resource.delete(&recorded.id).await?;
            state.groups.remove(address);
        }
    }
    Ok(())
}

async fn create<C: GroupManagementClient>(
    resource: &GroupResource<C>,
    state: &mut StateFile,
    address: &str,
    config: &GroupConfig,
) -> Result<()> {
    match resource.create(config).await {
        Ok(created) => {
            state.groups.insert(address.to_owned(), created);
            Ok(())
        }
        Err(e) => {
            if let GroupError::MembershipAfterCreate { group_id, .. } = &e {
                warn!("group {group_id} was created, but its users could not be added");
                state.groups.insert(
                    address.to_owned(),
                    GroupState {
                        id: group_id.to_owned(),
                        name: config.name.to_owned(),
                        authentication_domain_id: config.authentication_domain_id.to_owned(),
                        users: BTreeSet::new(),
                    },
                );
            }
            Err(e.into())
        }
    }
}

/// Delete recorded groups. With an address, only that group.
pub(super) async fn destroy<C: GroupManagementClient>(
    resource: &GroupResource<C>,
    address: Option<&str>,
    state_path: &Path,
) -> Result<()> {
    let mut state = StateFile::load(state_path).await?;

    let targets = match address {
        Some(address) => {
            if !state.groups.contains_key(address) {
                bail!("{address} is not in the state");
            }
            vec![address.to_owned()]
        }
        None => state.groups.keys().cloned().collect(),
    };

    if targets.is_empty() {
        println!("No groups to destroy");
        return Ok(());
    }

    for address in targets {
        let change = match state.groups.get(&address) {
            Some(recorded) => Change::Destroy(recorded.to_owned()),
            None => continue,
        };
        println!("{address}:\n{}", textwrap::indent(&change.to_string(), "  "));
        let res = apply_change(resource, &mut state, &address, change).await;
        state.save(state_path).await?;
        res.with_context(|| format!("destroying {address}"))?;
    }
    Ok(())
}
