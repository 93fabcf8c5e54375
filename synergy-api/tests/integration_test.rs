/// Integration tests for the SynergySphere API
///
/// These tests drive the full router end-to-end against a real PostgreSQL:
/// registration and login, the authentication chain, project lifecycle,
/// membership management, and the task workflow.
///
/// They are `#[ignore]`d by default; run them with a database available:
///
/// ```bash
/// DATABASE_URL=postgres://... JWT_SECRET=... cargo test -- --ignored
/// ```

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{create_user, unique_email, TestContext};
use serde_json::{json, Value};
use tower::Service as _;

async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(&ctx, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("register");

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "full_name": "New User",
            "password": "long-enough-password"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email.as_str());
    assert!(body["id"].is_i64());
    assert!(body.get("hashed_password").is_none());

    // Same email again is rejected up front.
    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "full_name": "Impostor",
            "password": "long-enough-password"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    // Login is form-encoded with a `username` field.
    let form = format!("username={}&password=long-enough-password", email);
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_login_wrong_password_does_not_leak_existence() {
    let ctx = TestContext::new().await.unwrap();

    let known = &ctx.user.email;
    let unknown = unique_email("ghost");

    for username in [known.as_str(), unknown.as_str()] {
        let form = format!("username={}&password=wrong-password", username);
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();

        let response = ctx.app.clone().call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Incorrect email or password");
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(&ctx, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&ctx, "GET", "/api/users/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&ctx, "GET", "/api/users/me", Some(&ctx.jwt_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], ctx.user.id);
    assert_eq!(body["email"], ctx.user.email.as_str());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_user_search() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let needle = unique_email("searchable");
    create_user(&ctx.db, &needle, "password-123").await.unwrap();

    // Empty query returns an empty list, not the whole table.
    let (status, body) = send(&ctx, "GET", "/api/users?email=", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/api/users?email={}", &needle[..20]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert!(results.iter().any(|u| u["email"] == needle.as_str()));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_project_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let (status, project) = send(
        &ctx,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({"name": "Apollo", "description": "moonshot"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["owner_id"], ctx.user.id);
    let project_id = project["id"].as_i64().unwrap();

    // Owner shows up in their own project list.
    let (status, list) = send(&ctx, "GET", "/api/projects", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"].as_i64() == Some(project_id)));

    // Detail includes the auto-enrolled owner as a member.
    let (status, detail) = send(
        &ctx,
        "GET",
        &format!("/api/projects/{}", project_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let members = detail["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["id"], ctx.user.id);
    assert_eq!(detail["tasks"], json!([]));

    // Partial update: rename, leave description untouched.
    let (status, updated) = send(
        &ctx,
        "PUT",
        &format!("/api/projects/{}", project_id),
        Some(&token),
        Some(json!({"name": "Artemis"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Artemis");
    assert_eq!(updated["description"], "moonshot");

    // Explicit null clears the description.
    let (status, updated) = send(
        &ctx,
        "PUT",
        &format!("/api/projects/{}", project_id),
        Some(&token),
        Some(json!({"description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], Value::Null);

    let (status, body) = send(&ctx, "GET", "/api/projects/999999999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_membership_management() {
    let ctx = TestContext::new().await.unwrap();
    let owner_token = ctx.jwt_token.clone();

    let outsider = create_user(&ctx.db, &unique_email("outsider"), "password-123")
        .await
        .unwrap();
    let outsider_token = ctx.token_for(&outsider).unwrap();

    let (_, project) = send(
        &ctx,
        "POST",
        "/api/projects",
        Some(&owner_token),
        Some(json!({"name": "Members"})),
    )
    .await;
    let project_id = project["id"].as_i64().unwrap();

    // Non-members cannot read the project.
    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/api/projects/{}", project_id),
        Some(&outsider_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Non-owners cannot add members, even themselves.
    let (status, _) = send(
        &ctx,
        "POST",
        &format!("/api/projects/{}/members?user_id={}", project_id, outsider.id),
        Some(&outsider_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Adding a nonexistent user is a 404.
    let (status, _) = send(
        &ctx,
        "POST",
        &format!("/api/projects/{}/members?user_id=999999999", project_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Owner adds the outsider.
    let (status, added) = send(
        &ctx,
        "POST",
        &format!("/api/projects/{}/members?user_id={}", project_id, outsider.id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["id"], outsider.id);

    // A second add is a conflict.
    let (status, body) = send(
        &ctx,
        "POST",
        &format!("/api/projects/{}/members?user_id={}", project_id, outsider.id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User is already a member of this project");

    // The new member can now read the project but still not update it.
    let (status, _) = send(
        &ctx,
        "GET",
        &format!("/api/projects/{}", project_id),
        Some(&outsider_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &ctx,
        "PUT",
        &format!("/api/projects/{}", project_id),
        Some(&outsider_token),
        Some(json!({"name": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_task_workflow() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let (_, project) = send(
        &ctx,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({"name": "Tasks"})),
    )
    .await;
    let project_id = project["id"].as_i64().unwrap();

    // Status is forced to To-Do no matter what the client sends.
    let (status, task) = send(
        &ctx,
        "POST",
        &format!("/api/projects/{}/tasks", project_id),
        Some(&token),
        Some(json!({"title": "Ship it", "status": "Done"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "To-Do");
    assert_eq!(task["assignee_id"], Value::Null);
    let task_id = task["id"].as_i64().unwrap();

    // A non-member assignee is rejected.
    let stranger = create_user(&ctx.db, &unique_email("stranger"), "password-123")
        .await
        .unwrap();
    let (status, body) = send(
        &ctx,
        "POST",
        &format!("/api/projects/{}/tasks", project_id),
        Some(&token),
        Some(json!({"title": "Unassignable", "assignee_id": stranger.id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assignee is not a member of this project");

    // Move the first task along and assign it to the owner.
    let (status, task) = send(
        &ctx,
        "PUT",
        &format!("/api/projects/{}/tasks/{}", project_id, task_id),
        Some(&token),
        Some(json!({"status": "In Progress", "assignee_id": ctx.user.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "In Progress");
    assert_eq!(task["assignee_id"], ctx.user.id);
    assert_eq!(task["title"], "Ship it");

    // Explicit null unassigns without touching the status.
    let (status, task) = send(
        &ctx,
        "PUT",
        &format!("/api/projects/{}/tasks/{}", project_id, task_id),
        Some(&token),
        Some(json!({"assignee_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "In Progress");
    assert_eq!(task["assignee_id"], Value::Null);

    // The task is invisible under a different project's path.
    let (_, other) = send(
        &ctx,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({"name": "Other"})),
    )
    .await;
    let other_id = other["id"].as_i64().unwrap();

    let (status, _) = send(
        &ctx,
        "PUT",
        &format!("/api/projects/{}/tasks/{}", other_id, task_id),
        Some(&token),
        Some(json!({"status": "Done"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = send(
        &ctx,
        "GET",
        &format!("/api/projects/{}/tasks", project_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}
