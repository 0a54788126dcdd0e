use std::{sync::Arc, time::Duration};

use groups_core::{
    client::GroupId, error::Operation, GroupConfig, GroupError, GroupResource, GroupState,
    Timeouts,
};
use groups_nerdgraph::{NerdGraphClient, NerdGraphCredentials, NerdGraphRestConfig, Region};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestHarness {
    server: MockServer,
    resource: GroupResource<NerdGraphClient>,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_timeouts(Timeouts::default()).await
    }

    async fn with_timeouts(timeouts: Timeouts) -> Self {
        let server = MockServer::start().await;
        let client = NerdGraphClient::new(
            NerdGraphCredentials::new(
                "NRAK-test".to_owned(),
                Region::Us,
                Some(format!("{}/graphql", server.uri())),
            ),
            NerdGraphRestConfig::default(),
        )
        .unwrap();
        Self {
            server,
            resource: GroupResource::new(Arc::new(client), timeouts),
        }
    }

    /// Respond to any request whose body contains `operation`
    async fn mount(&self, operation: &str, body: serde_json::Value, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains(operation))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .named(operation)
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Respond to the read query for the page requested with `cursor`
    async fn mount_page(
        &self,
        cursor: Option<&str>,
        body: serde_json::Value,
        times: Option<u64>,
    ) {
        let mock = Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("GroupsWithUsers"))
            .and(body_partial_json(json!({"variables": {"cursor": cursor}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body));
        match times {
            Some(n) => mock.up_to_n_times(n).expect(n),
            None => mock,
        }
        .mount(&self.server)
        .await;
    }
}

fn domain_page(next_cursor: Option<&str>, domains: serde_json::Value) -> serde_json::Value {
    json!({"data": {"actor": {"organization": {"userManagement": {
        "authenticationDomains": {
            "nextCursor": next_cursor,
            "authenticationDomains": domains
        }
    }}}}})
}

fn existing(users: &[&str]) -> GroupState {
    GroupState {
        id: GroupId("g-42".to_owned()),
        name: "Engineering".to_owned(),
        authentication_domain_id: "domain-a".to_owned(),
        users: users.iter().map(|u| u.to_string()).collect(),
    }
}

#[tokio::test]
async fn create_group_with_users() -> anyhow::Result<()> {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "userManagementCreateGroup",
            json!({"data": {"userManagementCreateGroup": {"group": {
                "id": "g-42", "displayName": "Engineering"
            }}}}),
            1,
        )
        .await;
    harness
        .mount(
            "userManagementAddUsersToGroups",
            json!({"data": {"userManagementAddUsersToGroups": {"groups": [{"id": "g-42"}]}}}),
            1,
        )
        .await;

    let state = harness
        .resource
        .create(&GroupConfig::new("Engineering", "domain-a", ["1001", "1002"]))
        .await?;

    assert_eq!(state, existing(&["1001", "1002"]));
    Ok(())
}

#[tokio::test]
async fn read_group_with_users() -> anyhow::Result<()> {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "GroupsWithUsers",
            json!({"data": {"actor": {"organization": {"userManagement": {
                "authenticationDomains": {
                    "nextCursor": null,
                    "authenticationDomains": [{
                        "id": "domain-a",
                        "groups": {"groups": [{
                            "id": "g-42",
                            "displayName": "Engineering",
                            "users": {"users": [{"id": "1002"}, {"id": "1001"}]}
                        }]}
                    }]
                }
            }}}}}),
            1,
        )
        .await;

    let state = harness.resource.read(&GroupId("g-42".to_owned())).await?;
    assert_eq!(state, Some(existing(&["1001", "1002"])));
    Ok(())
}

#[tokio::test]
async fn read_of_deleted_group_is_none() -> anyhow::Result<()> {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "GroupsWithUsers",
            json!({"data": {"actor": {"organization": {"userManagement": {
                "authenticationDomains": {
                    "nextCursor": null,
                    "authenticationDomains": [{"id": "domain-a", "groups": {"groups": []}}]
                }
            }}}}}),
            1,
        )
        .await;

    assert_eq!(harness.resource.read(&GroupId("g-42".to_owned())).await?, None);
    Ok(())
}

#[tokio::test]
async fn update_renames_and_reconciles_members() -> anyhow::Result<()> {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "userManagementUpdateGroup",
            json!({"data": {"userManagementUpdateGroup": {"group": {
                "id": "g-42", "displayName": "Platform"
            }}}}),
            1,
        )
        .await;
    harness
        .mount(
            "userManagementAddUsersToGroups",
            json!({"data": {"userManagementAddUsersToGroups": {"groups": [{"id": "g-42"}]}}}),
            1,
        )
        .await;
    harness
        .mount(
            "userManagementRemoveUsersFromGroups",
            json!({"data": {"userManagementRemoveUsersFromGroups": {"groups": [{"id": "g-42"}]}}}),
            1,
        )
        .await;

    let state = harness
        .resource
        .update(
            &existing(&["a", "b"]),
            &GroupConfig::new("Platform", "domain-a", ["b", "c"]),
        )
        .await?;

    assert_eq!(state.name, "Platform");
    assert_eq!(state.users, existing(&["b", "c"]).users);
    Ok(())
}

#[tokio::test]
async fn failed_add_stops_the_update() {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "userManagementAddUsersToGroups",
            json!({"data": null, "errors": [{"message": "User 'c' does not exist"}]}),
            1,
        )
        .await;
    harness
        .mount(
            "userManagementRemoveUsersFromGroups",
            json!({"data": {"userManagementRemoveUsersFromGroups": {"groups": [{"id": "g-42"}]}}}),
            0,
        )
        .await;

    let res = harness
        .resource
        .update(
            &existing(&["a", "b"]),
            &GroupConfig::new("Engineering", "domain-a", ["b", "c"]),
        )
        .await;

    match res {
        Err(GroupError::Remote(e)) => assert!(e.to_string().contains("does not exist")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn null_mutation_payload_is_an_empty_response() {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "userManagementDeleteGroup",
            json!({"data": {"userManagementDeleteGroup": null}}),
            1,
        )
        .await;

    let res = harness.resource.delete(&GroupId("g-42".to_owned())).await;
    assert!(matches!(
        res,
        Err(GroupError::EmptyResponse {
            operation: Operation::DeleteGroup
        })
    ));
}

#[tokio::test]
async fn read_follows_the_cursor_to_later_pages() -> anyhow::Result<()> {
    let harness = TestHarness::new().await;
    harness
        .mount_page(
            None,
            domain_page(Some("c1"), json!([{"id": "domain-z", "groups": {"groups": []}}])),
            Some(1),
        )
        .await;
    harness
        .mount_page(
            Some("c1"),
            domain_page(
                None,
                json!([{
                    "id": "domain-a",
                    "groups": {"groups": [{
                        "id": "g-42",
                        "displayName": "Engineering",
                        "users": {"users": [{"id": "1001"}]}
                    }]}
                }]),
            ),
            Some(1),
        )
        .await;

    let state = harness.resource.read(&GroupId("g-42".to_owned())).await?;
    assert_eq!(state, Some(existing(&["1001"])));
    Ok(())
}

#[tokio::test]
async fn null_later_page_is_retried_instead_of_reading_as_deleted() -> anyhow::Result<()> {
    let harness = TestHarness::with_timeouts(Timeouts {
        read: Duration::from_secs(30),
    })
    .await;
    let first_page = domain_page(Some("c1"), json!([{"id": "domain-z", "groups": {"groups": []}}]));
    harness.mount_page(None, first_page, Some(2)).await;
    // the first request for the second page comes back empty
    harness
        .mount_page(Some("c1"), json!({"data": null}), Some(1))
        .await;
    harness
        .mount_page(
            Some("c1"),
            domain_page(
                None,
                json!([{
                    "id": "domain-a",
                    "groups": {"groups": [{
                        "id": "g-42",
                        "displayName": "Engineering",
                        "users": {"users": []}
                    }]}
                }]),
            ),
            Some(1),
        )
        .await;

    let state = harness.resource.read(&GroupId("g-42".to_owned())).await?;
    assert_eq!(state, Some(existing(&[])));
    Ok(())
}

#[tokio::test]
async fn null_later_page_times_out_rather_than_losing_the_group() {
    let harness = TestHarness::with_timeouts(Timeouts {
        read: Duration::from_millis(100),
    })
    .await;
    harness
        .mount_page(
            None,
            domain_page(Some("c1"), json!([{"id": "domain-z", "groups": {"groups": []}}])),
            None,
        )
        .await;
    harness
        .mount_page(Some("c1"), json!({"data": null}), None)
        .await;

    let res = harness.resource.read(&GroupId("g-42".to_owned())).await;
    assert!(matches!(res, Err(GroupError::ReadTimedOut { .. })));
}

#[tokio::test]
async fn created_group_without_a_name_is_an_empty_response() {
    let harness = TestHarness::new().await;
    harness
        .mount(
            "userManagementCreateGroup",
            json!({"data": {"userManagementCreateGroup": {"group": {
                "id": "g-42", "displayName": null
            }}}}),
            1,
        )
        .await;

    let res = harness
        .resource
        .create(&GroupConfig::new("Engineering", "domain-a", Vec::<String>::new()))
        .await;
    assert!(matches!(
        res,
        Err(GroupError::EmptyResponse {
            operation: Operation::CreateGroup
        })
    ));
}
