//! An in-memory group service for tests

#![cfg(test)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::{
    client::{
        AuthenticationDomain, GroupId, GroupManagementClient, GroupWithUsers, RemoteGroup,
    },
    config::GroupState,
    error::Operation,
};

/// A call made against the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateGroup {
        authentication_domain_id: String,
        display_name: String,
    },
    ReadGroup,
    UpdateGroupName {
        group_id: GroupId,
        display_name: String,
    },
    DeleteGroup {
        group_id: GroupId,
    },
    AddUsers {
        group_id: GroupId,
        user_ids: Vec<String>,
    },
    RemoveUsers {
        group_id: GroupId,
        user_ids: Vec<String>,
    },
}

#[derive(Default)]
struct Inner {
    groups: HashMap<GroupId, GroupState>,
    calls: Vec<Call>,
    next_id: usize,
    empty_reads_remaining: usize,
}

/// Records every call and keeps groups in a map. Individual operations can be
/// made to fail or to come back empty.
#[derive(Default)]
pub(crate) struct FakeClient {
    inner: Mutex<Inner>,
    fail_on: HashSet<Operation>,
    empty_on: HashSet<Operation>,
}

impl FakeClient {
    pub(crate) fn with_group(group: GroupState) -> Self {
        let client = Self::default();
        client
            .inner
            .lock()
            .unwrap()
            .groups
            .insert(group.id.to_owned(), group);
        client
    }

    pub(crate) fn failing_on(mut self, op: Operation) -> Self {
        self.fail_on.insert(op);
        self
    }

    pub(crate) fn empty_on(mut self, op: Operation) -> Self {
        self.empty_on.insert(op);
        self
    }

    /// The next `n` reads come back empty
    pub(crate) fn empty_reads(self, n: usize) -> Self {
        self.inner.lock().unwrap().empty_reads_remaining = n;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.to_owned()
    }

    pub(crate) fn group(&self, id: &GroupId) -> Option<GroupState> {
        self.inner.lock().unwrap().groups.get(id).cloned()
    }

    /// Record the call, then decide whether it should fail or return nothing.
    /// Returns Ok(true) if the call should go through.
    fn record(&self, op: Operation, call: Call) -> Result<bool> {
        self.inner.lock().unwrap().calls.push(call);
        if self.fail_on.contains(&op) {
            return Err(anyhow!("remote failure during {op}"));
        }
        Ok(!self.empty_on.contains(&op))
    }
}

#[async_trait]
impl GroupManagementClient for FakeClient {
    async fn create_group(
        &self,
        authentication_domain_id: &str,
        display_name: &str,
    ) -> Result<Option<RemoteGroup>> {
        let call = Call::CreateGroup {
            authentication_domain_id: authentication_domain_id.to_owned(),
            display_name: display_name.to_owned(),
        };
        if !self.record(Operation::CreateGroup, call)? {
            return Ok(None);
        }
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = GroupId(format!("created-{}", inner.next_id));
        inner.groups.insert(
            id.to_owned(),
            GroupState {
                id: id.to_owned(),
                name: display_name.to_owned(),
                authentication_domain_id: authentication_domain_id.to_owned(),
                users: Default::default(),
            },
        );
        Ok(Some(RemoteGroup {
            id,
            display_name: display_name.to_owned(),
        }))
    }

    async fn get_groups_with_users(
        &self,
        authentication_domain_ids: &[String],
        group_ids: &[GroupId],
    ) -> Result<Option<Vec<AuthenticationDomain>>> {
        if !self.record(Operation::ReadGroup, Call::ReadGroup)? {
            return Ok(None);
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.empty_reads_remaining > 0 {
            inner.empty_reads_remaining -= 1;
            return Ok(None);
        }

        let mut domains: HashMap<String, Vec<GroupWithUsers>> = HashMap::new();
        for group in inner.groups.values() {
            if (!group_ids.is_empty() && !group_ids.contains(&group.id))
                || (!authentication_domain_ids.is_empty()
                    && !authentication_domain_ids.contains(&group.authentication_domain_id))
            {
                continue;
            }
            domains
                .entry(group.authentication_domain_id.to_owned())
                .or_default()
                .push(GroupWithUsers {
                    id: group.id.to_owned(),
                    display_name: group.name.to_owned(),
                    users: group.users.iter().cloned().collect(),
                });
        }
        Ok(Some(
            domains
                .into_iter()
                .map(|(id, groups)| AuthenticationDomain { id, groups })
                .collect(),
        ))
    }

    async fn update_group_name(
        &self,
        group_id: &GroupId,
        display_name: &str,
    ) -> Result<Option<RemoteGroup>> {
        let call = Call::UpdateGroupName {
            group_id: group_id.to_owned(),
            display_name: display_name.to_owned(),
        };
        if !self.record(Operation::UpdateGroupName, call)? {
            return Ok(None);
        }
        let mut inner = self.inner.lock().unwrap();
        let group = inner
            .groups
            .get_mut(group_id)
            .ok_or_else(|| anyhow!("no group {group_id}"))?;
        group.name = display_name.to_owned();
        Ok(Some(RemoteGroup {
            id: group_id.to_owned(),
            display_name: display_name.to_owned(),
        }))
    }

    async fn delete_group(&self, group_id: &GroupId) -> Result<Option<GroupId>> {
        let call = Call::DeleteGroup {
            group_id: group_id.to_owned(),
        };
        if !self.record(Operation::DeleteGroup, call)? {
            return Ok(None);
        }
        self.inner
            .lock()
            .unwrap()
            .groups
            .remove(group_id)
            .ok_or_else(|| anyhow!("no group {group_id}"))?;
        Ok(Some(group_id.to_owned()))
    }

    async fn add_users_to_groups(
        &self,
        group_ids: &[GroupId],
        user_ids: &[String],
    ) -> Result<Option<Vec<GroupId>>> {
        for group_id in group_ids {
            let call = Call::AddUsers {
                group_id: group_id.to_owned(),
                user_ids: user_ids.to_vec(),
            };
            if !self.record(Operation::AddUsers, call)? {
                return Ok(None);
            }
            if let Some(group) = self.inner.lock().unwrap().groups.get_mut(group_id) {
                group.users.extend(user_ids.iter().cloned());
            }
        }
        Ok(Some(group_ids.to_vec()))
    }

    async fn remove_users_from_groups(
        &self,
        group_ids: &[GroupId],
        user_ids: &[String],
    ) -> Result<Option<Vec<GroupId>>> {
        for group_id in group_ids {
            let call = Call::RemoveUsers {
                group_id: group_id.to_owned(),
                user_ids: user_ids.to_vec(),
            };
            if !self.record(Operation::RemoveUsers, call)? {
                return Ok(None);
            }
            if let Some(group) = self.inner.lock().unwrap().groups.get_mut(group_id) {
                group.users.retain(|u| !user_ids.contains(u));
            }
        }
        Ok(Some(group_ids.to_vec()))
    }
}
