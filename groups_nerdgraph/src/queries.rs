//! GraphQL documents for the user management API

pub(crate) const CREATE_GROUP: &str = r#"
mutation CreateGroup($authenticationDomainId: ID!, $displayName: String!) {
  userManagementCreateGroup(
    createGroupOptions: {
      authenticationDomainId: $authenticationDomainId
      displayName: $displayName
    }
  ) {
    group {
      id
      displayName
    }
  }
}"#;

pub(crate) const UPDATE_GROUP: &str = r#"
mutation UpdateGroup($id: ID!, $displayName: String!) {
  userManagementUpdateGroup(updateGroupOptions: { id: $id, displayName: $displayName }) {
    group {
      id
      displayName
    }
  }
}"#;

pub(crate) const DELETE_GROUP: &str = r#"
mutation DeleteGroup($id: ID!) {
  userManagementDeleteGroup(groupOptions: { id: $id }) {
    group {
      id
    }
  }
}"#;

pub(crate) const ADD_USERS_TO_GROUPS: &str = r#"
mutation AddUsersToGroups($groupIds: [ID!]!, $userIds: [ID!]!) {
  userManagementAddUsersToGroups(
    addUsersToGroupsOptions: { groupIds: $groupIds, userIds: $userIds }
  ) {
    groups {
      id
    }
  }
}"#;

pub(crate) const REMOVE_USERS_FROM_GROUPS: &str = r#"
mutation RemoveUsersFromGroups($groupIds: [ID!]!, $userIds: [ID!]!) {
  userManagementRemoveUsersFromGroups(
    removeUsersFromGroupsOptions: { groupIds: $groupIds, userIds: $userIds }
  ) {
    groups {
      id
    }
  }
}"#;

pub(crate) const GROUPS_WITH_USERS: &str = r#"
query GroupsWithUsers($authenticationDomainIds: [ID!], $groupIds: [ID!], $cursor: String) {
  actor {
    organization {
      userManagement {
        authenticationDomains(id: $authenticationDomainIds, cursor: $cursor) {
          nextCursor
          authenticationDomains {
            id
            groups(id: $groupIds) {
              groups {
                id
                displayName
                users {
                  users {
                    id
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}"#;
