//! Concurrent access to a shared store.

mod common;

use common::{group_store, init_logging};
use futures::future::join_all;
use scim_resource_store::ScimError;
use scim_resource_store::resource::{Group, User};
use scim_resource_store::storage::{PageRequest, ResourceStore, UpdateRequest};
use std::collections::HashSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_id_have_one_winner() {
    let groups = group_store();

    let attempts = (0..16).map(|i| {
        let groups = groups.clone();
        tokio::spawn(async move {
            groups
                .create(Group::new(format!("attempt-{}", i)).with_id("shared"))
                .await
        })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ScimError::Conflict { .. })))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(groups.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_user_name_have_one_winner() {
    init_logging();
    let users = ResourceStore::<User>::new();

    let attempts = (0..16).map(|_| {
        let users = users.clone();
        tokio::spawn(async move { users.create(User::new("jcoder")).await })
    });
    let results = join_all(attempts).await;

    let winners = results
        .iter()
        .filter(|joined| matches!(joined, Ok(Ok(_))))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(users.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_id_less_creates_get_distinct_ids() {
    let groups = group_store();

    let creates = (0..50).map(|i| {
        let groups = groups.clone();
        tokio::spawn(async move { groups.create(Group::new(format!("group-{}", i))).await })
    });
    let ids: HashSet<String> = join_all(creates)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes").expect("create succeeds"))
        .filter_map(|group| group.id)
        .collect();

    assert_eq!(ids.len(), 50);
    let listed = groups.find(None, &PageRequest::default()).await.unwrap();
    assert_eq!(listed.total_results, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_whole_records_during_updates() {
    let groups = group_store();
    groups
        .create(Group::new("name-0").with_id("g1"))
        .await
        .unwrap();

    let writer = {
        let groups = groups.clone();
        tokio::spawn(async move {
            for i in 1..=100 {
                groups
                    .update(UpdateRequest::replace("g1", Group::new(format!("name-{}", i))))
                    .await
                    .expect("update succeeds");
            }
        })
    };

    let readers = (0..4).map(|_| {
        let groups = groups.clone();
        tokio::spawn(async move {
            for _ in 0..100 {
                let group = groups.get("g1").await.expect("record stays present");
                assert_eq!(group.id.as_deref(), Some("g1"));
                assert!(
                    group
                        .display_name
                        .as_deref()
                        .is_some_and(|name| name.starts_with("name-"))
                );
            }
        })
    });

    writer.await.unwrap();
    for reader in join_all(readers).await {
        reader.unwrap();
    }

    let last = groups.get("g1").await.unwrap();
    assert_eq!(last.display_name.as_deref(), Some("name-100"));
}
