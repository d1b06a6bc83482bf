//! Integration tests for share link creation and access.

mod helpers;

use std::sync::Arc;

use sharehub_core::error::{AppError, ErrorKind};
use sharehub_service::share::{AccessDenied, CreateShareRequest, ShareLinkRegistry};
use sharehub_worker::ShareSweepJob;

fn request(resource_id: sharehub_core::types::id::ResourceId) -> CreateShareRequest {
    CreateShareRequest {
        resource_id,
        ttl_hours: Some(1),
        max_access: 0,
        password: None,
    }
}

#[tokio::test]
async fn test_single_use_link_scenario() {
    let app = helpers::TestApp::new();
    let owner = app.user("alice");
    let file = app.store_file("report.pdf");

    let view = app
        .shares
        .create_share_link(
            &owner,
            CreateShareRequest {
                max_access: 1,
                ..request(file.id)
            },
        )
        .await
        .unwrap();

    let grant = app.shares.access_shared_resource(&view.token, None).await.unwrap();
    assert_eq!(grant.resource.id, file.id);
    assert!(grant.exhausted);

    let link = app.shares.registry().get(&view.token).await.unwrap();
    assert!(!link.active);

    let denied = app
        .shares
        .access_shared_resource(&view.token, None)
        .await
        .unwrap_err();
    assert_eq!(denied, AccessDenied::AccessLimitReached);
    assert_eq!(AppError::from(denied).kind, ErrorKind::Authorization);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_grants_exactly_limit() {
    let app = helpers::TestApp::new();
    let owner = app.user("alice");
    let file = app.store_file("video.mp4");

    for (attempts, limit) in [(20usize, 3u32), (2, 5)] {
        let view = app
            .shares
            .create_share_link(
                &owner,
                CreateShareRequest {
                    max_access: limit,
                    ..request(file.id)
                },
            )
            .await
            .unwrap();

        let tasks: Vec<_> = (0..attempts)
            .map(|_| {
                let shares = Arc::clone(&app.shares);
                let token = view.token.clone();
                tokio::spawn(async move { shares.access_shared_resource(&token, None).await })
            })
            .collect();

        let granted = futures::future::join_all(tasks)
            .await
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        assert_eq!(granted, attempts.min(limit as usize));
    }
}

#[tokio::test]
async fn test_password_failures_do_not_count() {
    let app = helpers::TestApp::new();
    let owner = app.user("alice");
    let file = app.store_file("secret.txt");

    let view = app
        .shares
        .create_share_link(
            &owner,
            CreateShareRequest {
                max_access: 2,
                password: Some("open sesame".to_string()),
                ..request(file.id)
            },
        )
        .await
        .unwrap();

    for _ in 0..3 {
        assert_eq!(
            app.shares.access_shared_resource(&view.token, None).await.unwrap_err(),
            AccessDenied::PasswordRequired
        );
        assert_eq!(
            app.shares
                .access_shared_resource(&view.token, Some("nope"))
                .await
                .unwrap_err(),
            AccessDenied::PasswordMismatch
        );
    }
    assert_eq!(app.shares.registry().get(&view.token).await.unwrap().access_count, 0);

    let grant = app
        .shares
        .access_shared_resource(&view.token, Some("open sesame"))
        .await
        .unwrap();
    assert_eq!(grant.remaining, Some(1));
}

#[tokio::test]
async fn test_revoked_link_is_inactive() {
    let app = helpers::TestApp::new();
    let owner = app.user("alice");
    let file = app.store_file("notes.md");
    let view = app.shares.create_share_link(&owner, request(file.id)).await.unwrap();

    app.shares.revoke_share_link(&owner, &view.token).await.unwrap();
    app.shares.revoke_share_link(&owner, &view.token).await.unwrap();

    let denied = app
        .shares
        .access_shared_resource(&view.token, None)
        .await
        .unwrap_err();
    assert_eq!(denied, AccessDenied::Inactive);
    assert_eq!(AppError::from(denied).kind, ErrorKind::Gone);
}

#[tokio::test]
async fn test_unknown_token_not_found() {
    let app = helpers::TestApp::new();
    let denied = app
        .shares
        .access_shared_resource("does-not-exist", None)
        .await
        .unwrap_err();
    assert_eq!(denied, AccessDenied::NotFound);
    assert_eq!(AppError::from(denied).kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_deleting_resource_invalidates_links() {
    let app = helpers::TestApp::new();
    let owner = app.user("alice");
    let file = app.store_file("album.zip");
    let first = app.shares.create_share_link(&owner, request(file.id)).await.unwrap();
    let second = app.shares.create_share_link(&owner, request(file.id)).await.unwrap();

    assert_eq!(app.shares.delete_resource(&owner, file.id).await.unwrap(), 2);
    for token in [&first.token, &second.token] {
        assert_eq!(
            app.shares.access_shared_resource(token, None).await.unwrap_err(),
            AccessDenied::Inactive
        );
    }

    let err = app
        .shares
        .create_share_link(&owner, request(file.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_owner_listing_and_sweep() {
    let app = helpers::TestApp::new();
    let owner = app.user("alice");
    let file = app.store_file("plan.docx");

    let kept = app.shares.create_share_link(&owner, request(file.id)).await.unwrap();
    let revoked = app.shares.create_share_link(&owner, request(file.id)).await.unwrap();
    app.shares.revoke_share_link(&owner, &revoked.token).await.unwrap();

    let listed = app.shares.list_share_links(&owner, false).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].token, kept.token);
    assert!(listed[0].share_url.starts_with(&app.config.share.public_base_url));

    let report = ShareSweepJob::new(Arc::clone(&app.shares)).run().await;
    assert_eq!(report.swept, 0);
}
