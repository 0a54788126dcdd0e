//! Shapes of the NerdGraph responses we care about. Every level is nullable in
//! the API, so every level is an `Option` here.

use groups_core::client::{AuthenticationDomain, GroupId, GroupWithUsers, RemoteGroup};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub(crate) struct GroupNode {
    pub(crate) id: String,
    #[serde(rename = "displayName")]
    pub(crate) display_name: Option<String>,
}

impl GroupNode {
    /// A group without its name is an incomplete payload.
    pub(crate) fn into_remote(self) -> Option<RemoteGroup> {
        Some(RemoteGroup {
            id: GroupId(self.id),
            display_name: self.display_name?,
        })
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct GroupPayload {
    pub(crate) group: Option<GroupNode>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GroupsPayload {
    pub(crate) groups: Option<Vec<GroupNode>>,
}

impl GroupsPayload {
    pub(crate) fn into_ids(self) -> Option<Vec<GroupId>> {
        self.groups
            .map(|groups| groups.into_iter().map(|g| GroupId(g.id)).collect())
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateGroupData {
    pub(crate) user_management_create_group: Option<GroupPayload>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateGroupData {
    pub(crate) user_management_update_group: Option<GroupPayload>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteGroupData {
    pub(crate) user_management_delete_group: Option<GroupPayload>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddUsersData {
    pub(crate) user_management_add_users_to_groups: Option<GroupsPayload>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveUsersData {
    pub(crate) user_management_remove_users_from_groups: Option<GroupsPayload>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GroupsWithUsersData {
    pub(crate) actor: Option<Actor>,
}

impl GroupsWithUsersData {
    /// Dig down to the page of authentication domains, if there is one
    pub(crate) fn into_page(self) -> Option<DomainPage> {
        self.actor?
            .organization?
            .user_management?
            .authentication_domains
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct Actor {
    pub(crate) organization: Option<Organization>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Organization {
    pub(crate) user_management: Option<UserManagement>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserManagement {
    pub(crate) authentication_domains: Option<DomainPage>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DomainPage {
    pub(crate) next_cursor: Option<String>,
    #[serde(default)]
    pub(crate) authentication_domains: Vec<DomainNode>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DomainNode {
    pub(crate) id: String,
    pub(crate) groups: Option<GroupPage>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GroupPage {
    #[serde(default)]
    pub(crate) groups: Vec<GroupWithUsersNode>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupWithUsersNode {
    pub(crate) id: String,
    pub(crate) display_name: Option<String>,
    pub(crate) users: Option<UserPage>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UserPage {
    #[serde(default)]
    pub(crate) users: Vec<UserNode>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UserNode {
    pub(crate) id: String,
}

impl GroupWithUsersNode {
    fn into_group(self) -> Option<GroupWithUsers> {
        Some(GroupWithUsers {
            id: GroupId(self.id),
            display_name: self.display_name?,
            users: self
                .users
                .map(|page| page.users.into_iter().map(|u| u.id).collect())
                .unwrap_or_default(),
        })
    }
}

impl DomainNode {
    /// `None` if any group in the domain came back without its name.
    pub(crate) fn into_domain(self) -> Option<AuthenticationDomain> {
        let groups = self
            .groups
            .map(|page| page.groups)
            .unwrap_or_default()
            .into_iter()
            .map(GroupWithUsersNode::into_group)
            .collect::<Option<Vec<_>>>()?;
        Some(AuthenticationDomain {
            id: self.id,
            groups,
        })
    }
}
