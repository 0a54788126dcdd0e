//! Group management against New Relic's NerdGraph API
//!
#![deny(missing_docs)]

mod creds;
mod payloads;
mod queries;
mod rest;

use anyhow::Result;
use async_trait::async_trait;
use groups_core::{
    client::{AuthenticationDomain, GroupId, GroupManagementClient, RemoteGroup},
    logging::debug,
};
use serde_json::json;

pub use creds::{NerdGraphCredentials, Region};
pub use rest::NerdGraphRestConfig;

use payloads::{
    AddUsersData, CreateGroupData, DeleteGroupData, DomainNode, GroupNode, GroupsWithUsersData,
    RemoveUsersData, UpdateGroupData,
};
use rest::NerdGraphRestClient;

/// Talks to the user management part of NerdGraph
pub struct NerdGraphClient {
    rest_client: NerdGraphRestClient,
}

impl NerdGraphClient {
    /// Validate the credentials and set up the http client.
    pub fn new(credentials: NerdGraphCredentials, config: NerdGraphRestConfig) -> Result<Self> {
        Ok(Self {
            rest_client: NerdGraphRestClient::new(credentials, config)?,
        })
    }
}

/// `null` instead of an empty list, so that the filter isn't applied
fn id_filter<T: serde::Serialize>(ids: &[T]) -> serde_json::Value {
    if ids.is_empty() {
        serde_json::Value::Null
    } else {
        json!(ids)
    }
}

#[async_trait]
impl GroupManagementClient for NerdGraphClient {
    async fn create_group(
        &self,
        authentication_domain_id: &str,
        display_name: &str,
    ) -> Result<Option<RemoteGroup>> {
        let data: Option<CreateGroupData> = self
            .rest_client
            .execute(
                queries::CREATE_GROUP,
                json!({
                    "authenticationDomainId": authentication_domain_id,
                    "displayName": display_name,
                }),
            )
            .await?;
        Ok(data
            .and_then(|d| d.user_management_create_group)
            .and_then(|p| p.group)
            .and_then(GroupNode::into_remote))
    }

    async fn get_groups_with_users(
        &self,
        authentication_domain_ids: &[String],
        group_ids: &[GroupId],
    ) -> Result<Option<Vec<AuthenticationDomain>>> {
        let group_ids = group_ids.iter().map(|g| g.0.as_str()).collect::<Vec<_>>();
        let mut domains = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: Option<GroupsWithUsersData> = self
                .rest_client
                .execute(
                    queries::GROUPS_WITH_USERS,
                    json!({
                        "authenticationDomainIds": id_filter(authentication_domain_ids),
                        "groupIds": id_filter(group_ids.as_slice()),
                        "cursor": cursor,
                    }),
                )
                .await?;

            // a missing page or group name anywhere leaves the result incomplete
            let page = match data.and_then(GroupsWithUsersData::into_page) {
                Some(page) => page,
                None => return Ok(None),
            };
            match page
                .authentication_domains
                .into_iter()
                .map(DomainNode::into_domain)
                .collect::<Option<Vec<_>>>()
            {
                Some(page_domains) => domains.extend(page_domains),
                None => return Ok(None),
            }
            match page.next_cursor {
                Some(next) => {
                    debug!("fetching next page of authentication domains");
                    cursor = Some(next);
                }
                None => break,
            }
        }

        Ok(Some(domains))
    }

    async fn update_group_name(
        &self,
        group_id: &GroupId,
        display_name: &str,
    ) -> Result<Option<RemoteGroup>> {
        let data: Option<UpdateGroupData> = self
            .rest_client
            .execute(
                queries::UPDATE_GROUP,
                json!({"id": group_id.0, "displayName": display_name}),
            )
            .await?;
        Ok(data
            .and_then(|d| d.user_management_update_group)
            .and_then(|p| p.group)
            .and_then(GroupNode::into_remote))
    }

    async fn delete_group(&self, group_id: &GroupId) -> Result<Option<GroupId>> {
        let data: Option<DeleteGroupData> = self
            .rest_client
            .execute(queries::DELETE_GROUP, json!({"id": group_id.0}))
            .await?;
        Ok(data
            .and_then(|d| d.user_management_delete_group)
            .and_then(|p| p.group)
            .map(|g| GroupId(g.id)))
    }

    async fn add_users_to_groups(
        &self,
        group_ids: &[GroupId],
        user_ids: &[String],
    ) -> Result<Option<Vec<GroupId>>> {
        let data: Option<AddUsersData> = self
            .rest_client
            .execute(
                queries::ADD_USERS_TO_GROUPS,
                json!({"groupIds": group_ids, "userIds": user_ids}),
            )
            .await?;
        Ok(data
            .and_then(|d| d.user_management_add_users_to_groups)
            .and_then(|p| p.into_ids()))
    }

    async fn remove_users_from_groups(
        &self,
        group_ids: &[GroupId],
        user_ids: &[String],
    ) -> Result<Option<Vec<GroupId>>> {
        let data: Option<RemoveUsersData> = self
            .rest_client
            .execute(
                queries::REMOVE_USERS_FROM_GROUPS,
                json!({"groupIds": group_ids, "userIds": user_ids}),
            )
            .await?;
        Ok(data
            .and_then(|d| d.user_management_remove_users_from_groups)
            .and_then(|p| p.into_ids()))
    }
}
