//! The remote group-management service, as seen by the lifecycle handlers

use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The id assigned to a group by the remote service.
#[derive(Clone, Deserialize, Serialize, Debug, Hash, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct GroupId(pub String);

impl Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(val: &str) -> Self {
        GroupId(val.to_owned())
    }
}

/// A group as returned by a create or update call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteGroup {
    /// remote id
    pub id: GroupId,
    /// display name
    pub display_name: String,
}

/// A group, along with the ids of its members
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GroupWithUsers {
    /// remote id
    pub id: GroupId,
    /// display name
    pub display_name: String,
    /// member user ids
    pub users: Vec<String>,
}

/// An authentication domain and the requested groups that belong to it
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthenticationDomain {
    /// remote id
    pub id: String,
    /// groups in this domain
    pub groups: Vec<GroupWithUsers>,
}

/// The calls the lifecycle handlers make against the remote service.
///
/// Every call returns `Ok(None)` when the service reported no error but also
/// sent back no payload. What that means is up to the caller.
#[async_trait]
pub trait GroupManagementClient: Send + Sync {
    /// Create a group in an authentication domain.
    async fn create_group(
        &self,
        authentication_domain_id: &str,
        display_name: &str,
    ) -> Result<Option<RemoteGroup>>;

    /// Fetch groups with their members. Empty filters are not applied.
    async fn get_groups_with_users(
        &self,
        authentication_domain_ids: &[String],
        group_ids: &[GroupId],
    ) -> Result<Option<Vec<AuthenticationDomain>>>;

    /// Rename a group.
    async fn update_group_name(
        &self,
        group_id: &GroupId,
        display_name: &str,
    ) -> Result<Option<RemoteGroup>>;

    /// Delete a group, returning the id of the deleted group.
    async fn delete_group(&self, group_id: &GroupId) -> Result<Option<GroupId>>;

    /// Add users to every listed group. Returns the ids of the updated groups.
    async fn add_users_to_groups(
        &self,
        group_ids: &[GroupId],
        user_ids: &[String],
    ) -> Result<Option<Vec<GroupId>>>;

    /// Remove users from every listed group. Returns the ids of the updated groups.
    async fn remove_users_from_groups(
        &self,
        group_ids: &[GroupId],
        user_ids: &[String],
    ) -> Result<Option<Vec<GroupId>>>;
}
