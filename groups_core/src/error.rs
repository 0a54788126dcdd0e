//! Errors returned by the group lifecycle handlers

use std::{fmt::Display, time::Duration};

use thiserror::Error;

use crate::client::GroupId;

/// A remote operation, used to label errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a group
    CreateGroup,
    /// Fetch groups and their members
    ReadGroup,
    /// Change a group's display name
    UpdateGroupName,
    /// Delete a group
    DeleteGroup,
    /// Add users to groups
    AddUsers,
    /// Remove users from groups
    RemoveUsers,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Operation::CreateGroup => "create group",
            Operation::ReadGroup => "fetch group",
            Operation::UpdateGroupName => "update group",
            Operation::DeleteGroup => "delete group",
            Operation::AddUsers => "add users to group",
            Operation::RemoveUsers => "remove users from group",
        };
        write!(f, "{text}")
    }
}

/// Everything that can go wrong while managing a group.
#[derive(Debug, Error)]
pub enum GroupError {
    /// A required field was empty. Raised before any remote call.
    #[error("`{field}` cannot be an empty string")]
    Validation {
        /// the offending field
        field: &'static str,
    },

    /// The remote call failed. The underlying error is passed through as-is.
    #[error(transparent)]
    Remote(#[from] anyhow::Error),

    /// The remote call returned neither an error nor a payload.
    #[error("failed to {operation}: no response returned")]
    EmptyResponse {
        /// the call that came back empty
        operation: Operation,
    },

    /// The read kept coming back empty until the timeout ran out.
    #[error("timed out after {timeout:?} waiting to fetch group {group_id}")]
    ReadTimedOut {
        /// the group being read
        group_id: GroupId,
        /// the configured read timeout
        timeout: Duration,
    },

    /// The authentication domain can only be set at creation.
    #[error(
        "group {group_id} cannot move from authentication domain {from} to {to} in place; \
        it must be replaced"
    )]
    RequiresReplacement {
        /// the group being updated
        group_id: GroupId,
        /// the current authentication domain
        from: String,
        /// the requested authentication domain
        to: String,
    },

    /// The group exists remotely, but adding its initial members failed.
    #[error("created group {group_id}, but failed to add its users")]
    MembershipAfterCreate {
        /// the id of the newly created group
        group_id: GroupId,
        /// why adding the members failed
        #[source]
        source: Box<GroupError>,
    },

    /// No group with this id exists remotely.
    #[error("group {group_id} does not exist")]
    GroupNotFound {
        /// the id that was looked up
        group_id: GroupId,
    },
}

impl GroupError {
    /// Whether the error is a validation failure (no remote call was made).
    pub fn is_validation(&self) -> bool {
        matches!(self, GroupError::Validation { .. })
    }
}

/// Result alias for group operations
pub type Result<T, E = GroupError> = std::result::Result<T, E>;
