//! Group store behaviour as seen by the protocol layer.

mod common;

use common::{empty_registry, group_store};
use scim_resource_store::ScimError;
use scim_resource_store::filter::FilterExpression;
use scim_resource_store::patch::{PatchOp, PatchOperation};
use scim_resource_store::resource::{Group, GroupMember};
use scim_resource_store::storage::{PageRequest, UpdateRequest};
use serde_json::json;

#[tokio::test]
async fn test_extension_list_is_empty() {
    let registry = empty_registry().await;
    assert!(registry.extension_schemas("Group").is_empty());
}

#[tokio::test]
async fn test_simple_create_and_get() {
    let groups = group_store();

    let created = groups.create(Group::new("test-me")).await.unwrap();
    assert_eq!(created.display_name.as_deref(), Some("test-me"));
    let id = created.id.clone().expect("create assigns an id");

    let fetched = groups.get(&id).await;
    assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn test_recreate_conflicts() {
    let groups = group_store();
    let created = groups.create(Group::new("test-me")).await.unwrap();

    let err = groups.create(created.clone()).await.unwrap_err();
    assert!(matches!(err, ScimError::Conflict { .. }));
    assert_eq!(groups.len().await, 1);
}

#[tokio::test]
async fn test_delete_and_get() {
    let groups = group_store();
    let created = groups.create(Group::new("test-me")).await.unwrap();
    let id = created.id.unwrap();

    groups.delete(&id).await;
    assert!(groups.get(&id).await.is_none());
}

#[tokio::test]
async fn test_find() {
    let groups = group_store();
    let page = PageRequest::default();

    let response = groups.find(None, &page).await.unwrap();
    assert!(response.resources.is_empty());
    assert_eq!(response.total_results, 0);

    let group1 = groups.create(Group::new("test-me1")).await.unwrap();
    let group2 = groups.create(Group::new("test-me2")).await.unwrap();

    let response = groups.find(None, &page).await.unwrap();
    assert_eq!(response.resources, vec![group1, group2]);
    assert_eq!(response.total_results, 2);
}

#[tokio::test]
async fn test_find_with_filter_is_unsupported() {
    let groups = group_store();
    groups.create(Group::new("test-me1")).await.unwrap();

    let err = groups
        .find(
            Some(&FilterExpression::eq("displayName", "test-me1")),
            &PageRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScimError::UnsupportedFilter { .. }));
    assert_eq!(err.status_code(), 501);
}

#[tokio::test]
async fn test_update() {
    let groups = group_store();
    let mut group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    group.display_name = Some("test-me2".to_string());
    let result = groups
        .update(UpdateRequest::replace(id.clone(), group))
        .await
        .unwrap();

    assert_eq!(result.display_name.as_deref(), Some("test-me2"));
    assert_eq!(groups.get(&id).await, Some(result));
}

#[tokio::test]
async fn test_update_with_patch_with_path() {
    let groups = group_store();
    let group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    let result = groups
        .update(UpdateRequest::patch(
            id,
            group,
            vec![PatchOperation::replace("displayName", json!("test-me2"))],
        ))
        .await
        .unwrap();

    assert_eq!(result.display_name.as_deref(), Some("test-me2"));
}

#[tokio::test]
async fn test_update_with_patch_no_path() {
    let groups = group_store();
    let group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    let result = groups
        .update(UpdateRequest::patch(
            id.clone(),
            group,
            vec![PatchOperation::without_path(
                PatchOp::Replace,
                json!({"id": id, "displayName": "test-me2"}),
            )],
        ))
        .await
        .unwrap();

    assert_eq!(result.display_name.as_deref(), Some("test-me2"));
    assert_eq!(result.id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn test_update_with_patch_add_to_list() {
    let groups = group_store();
    let group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    let result = groups
        .update(UpdateRequest::patch(
            id,
            group,
            vec![PatchOperation::add("members", json!([{"value": "member1"}]))],
        ))
        .await
        .unwrap();

    assert_eq!(result.members, vec![GroupMember::new("member1")]);
}

#[tokio::test]
async fn test_update_with_patch_add_as_property() {
    let groups = group_store();
    let group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    let result = groups
        .update(UpdateRequest::patch(
            id,
            group,
            vec![PatchOperation::add("displayName", json!("test-me2"))],
        ))
        .await
        .unwrap();

    assert_eq!(result.display_name.as_deref(), Some("test-me2"));
}

#[tokio::test]
async fn test_update_with_patch_remove_as_property() {
    let groups = group_store();
    let group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    let result = groups
        .update(UpdateRequest::patch(
            id,
            group,
            vec![PatchOperation::remove("displayName")],
        ))
        .await
        .unwrap();

    assert!(result.display_name.is_none());
}

#[tokio::test]
async fn test_update_with_patch_from_wire_json() {
    let groups = group_store();
    let group = groups.create(Group::new("test-me1")).await.unwrap();
    let id = group.id.clone().unwrap();

    let operations: Vec<PatchOperation> = serde_json::from_value(json!([
        {"op": "Add", "path": "members", "value": [{"value": "member1"}]}
    ]))
    .unwrap();

    let result = groups
        .update(UpdateRequest::patch(id, group, operations))
        .await
        .unwrap();

    assert_eq!(result.members, vec![GroupMember::new("member1")]);
}

#[tokio::test]
async fn test_remove_members_is_unsupported_and_store_unchanged() {
    let groups = group_store();
    let group = groups
        .create(Group::new("test-me1").with_member(GroupMember::new("member1")))
        .await
        .unwrap();
    let id = group.id.clone().unwrap();

    let err = groups
        .update(UpdateRequest::patch(
            id.clone(),
            group.clone(),
            vec![PatchOperation::remove("members")],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ScimError::UnsupportedPatch { .. }));
    assert_eq!(groups.get(&id).await, Some(group));
}

#[tokio::test]
async fn test_end_to_end_create_get_patch_get() {
    let groups = group_store();

    let created = groups.create(Group::new("test-me")).await.unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(groups.get(&id).await.as_ref(), Some(&created));

    groups
        .update(UpdateRequest::patch(
            id.clone(),
            created,
            vec![PatchOperation::replace("displayName", json!("test-me2"))],
        ))
        .await
        .unwrap();

    let fetched = groups.get(&id).await.unwrap();
    assert_eq!(fetched.display_name.as_deref(), Some("test-me2"));
}
