//! Create, read, update, and delete a single group against the remote service

use std::{collections::BTreeSet, slice, sync::Arc, time::Duration};

use crate::{
    client::{GroupId, GroupManagementClient},
    config::{GroupConfig, GroupState},
    error::{GroupError, Operation, Result},
    logging::{debug, info},
    reconcile::{reconcile, reconcile_name},
    retry::{retry_with_timeout, RetryError, RetryFailure},
};

/// Default time to keep retrying an empty read
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Time budgets for the lifecycle calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// How long a read keeps retrying while the service returns empty responses
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// The lifecycle handlers for a group. The client handle is passed in, so the
/// same handlers work against the real service or a test double.
pub struct GroupResource<C: GroupManagementClient> {
    client: Arc<C>,
    timeouts: Timeouts,
}

impl<C: GroupManagementClient> GroupResource<C> {
    /// Basic constructor
    pub fn new(client: Arc<C>, timeouts: Timeouts) -> Self {
        Self { client, timeouts }
    }

    /// Create the group, then add its users.
    ///
    /// If the group is created but adding users fails, the error carries the new
    /// group id so it can still be tracked.
    pub async fn create(&self, config: &GroupConfig) -> Result<GroupState> {
        config.validate()?;

        info!("sending request to create a group with the specified configuration");
        let created = self
            .client
            .create_group(&config.authentication_domain_id, &config.name)
            .await?
            .ok_or(GroupError::EmptyResponse {
                operation: Operation::CreateGroup,
            })?;
        info!("successfully created a group, ID: {}", created.id);

        let mut state = GroupState {
            id: created.id,
            name: created.display_name,
            authentication_domain_id: config.authentication_domain_id.to_owned(),
            users: BTreeSet::new(),
        };

        if config.users.is_empty() {
            info!("no users specified in the configuration to add to the group");
            return Ok(state);
        }

        if let Err(e) = self.add_users(&state.id, &config.users).await {
            return Err(GroupError::MembershipAfterCreate {
                group_id: state.id,
                source: Box::new(e),
            });
        }
        state.users = config.users.to_owned();
        Ok(state)
    }

    /// Fetch the current state of the group. Returns `None` if the group no
    /// longer exists.
    ///
    /// Empty responses are retried until the read timeout runs out. Any other
    /// failure is returned right away.
    pub async fn read(&self, group_id: &GroupId) -> Result<Option<GroupState>> {
        let client = &self.client;
        let group_ids = slice::from_ref(group_id);

        let domains = retry_with_timeout(self.timeouts.read, move || async move {
            match client.get_groups_with_users(&[], group_ids).await {
                Err(e) => Err(RetryError::NonRetryable(GroupError::Remote(e))),
                Ok(None) => Err(RetryError::Retryable(GroupError::EmptyResponse {
                    operation: Operation::ReadGroup,
                })),
                Ok(Some(domains)) => Ok(domains),
            }
        })
        .await
        .map_err(|failure| match failure {
            RetryFailure::Failed(e) => e,
            RetryFailure::TimedOut(_) => GroupError::ReadTimedOut {
                group_id: group_id.to_owned(),
                timeout: self.timeouts.read,
            },
        })?;

        let found = domains.into_iter().find_map(|domain| {
            domain
                .groups
                .into_iter()
                .find(|g| &g.id == group_id)
                .map(|g| GroupState {
                    id: g.id,
                    name: g.display_name,
                    authentication_domain_id: domain.id.to_owned(),
                    users: g.users.into_iter().collect(),
                })
        });

        match &found {
            Some(state) => debug!(
                "fetched group {} with {} users",
                state.id,
                state.users.len()
            ),
            None => info!("group {group_id} no longer exists"),
        }
        Ok(found)
    }

    /// Bring an existing group in line with `desired`.
    ///
    /// The name is handled first, then membership (add, then remove). The first
    /// failure is returned and nothing after it is attempted.
    pub async fn update(&self, prior: &GroupState, desired: &GroupConfig) -> Result<GroupState> {
        info!("updating the group with the specified configuration");
        desired.validate()?;

        if prior.authentication_domain_id != desired.authentication_domain_id {
            return Err(GroupError::RequiresReplacement {
                group_id: prior.id.to_owned(),
                from: prior.authentication_domain_id.to_owned(),
                to: desired.authentication_domain_id.to_owned(),
            });
        }

        let mut state = prior.to_owned();

        if let Some(name) = reconcile_name(&prior.name, &desired.name) {
            let updated = self
                .client
                .update_group_name(&prior.id, name)
                .await?
                .ok_or(GroupError::EmptyResponse {
                    operation: Operation::UpdateGroupName,
                })?;
            state.name = updated.display_name;
            info!("updated the group name successfully");
        }

        let changes = reconcile(&prior.users, &desired.users);
        if changes.is_empty() {
            info!("no membership changes for group {}", prior.id);
            return Ok(state);
        }

        if !changes.add.is_empty() {
            self.add_users(&prior.id, &changes.add).await?;
            state.users.extend(changes.add.iter().cloned());
        }
        if !changes.remove.is_empty() {
            self.remove_users(&prior.id, &changes.remove).await?;
            state.users.retain(|u| !changes.remove.contains(u));
        }

        Ok(state)
    }

    /// Delete the group.
    pub async fn delete(&self, group_id: &GroupId) -> Result<()> {
        self.client
            .delete_group(group_id)
            .await?
            .ok_or(GroupError::EmptyResponse {
                operation: Operation::DeleteGroup,
            })?;
        info!("successfully deleted the group with ID: {group_id}");
        Ok(())
    }

    /// Start tracking an existing group by id.
    pub async fn import(&self, group_id: &GroupId) -> Result<GroupState> {
        self.read(group_id)
            .await?
            .ok_or_else(|| GroupError::GroupNotFound {
                group_id: group_id.to_owned(),
            })
    }

    async fn add_users(&self, group_id: &GroupId, users: &BTreeSet<String>) -> Result<()> {
        let user_ids = users.iter().cloned().collect::<Vec<_>>();
        info!("sending request to add user IDs {user_ids:?} to group {group_id}");
        self.client
            .add_users_to_groups(slice::from_ref(group_id), &user_ids)
            .await?
            .ok_or(GroupError::EmptyResponse {
                operation: Operation::AddUsers,
            })?;
        info!("successfully added the following users to the group {group_id}: {user_ids:?}");
        Ok(())
    }

    async fn remove_users(&self, group_id: &GroupId, users: &BTreeSet<String>) -> Result<()> {
        let user_ids = users.iter().cloned().collect::<Vec<_>>();
        info!("sending request to remove user IDs {user_ids:?} from group {group_id}");
        self.client
            .remove_users_from_groups(slice::from_ref(group_id), &user_ids)
            .await?
            .ok_or(GroupError::EmptyResponse {
                operation: Operation::RemoveUsers,
            })?;
        info!("successfully removed the following users from the group {group_id}: {user_ids:?}");
        Ok(())
    }
}
