//! HTTP-level integration tests for the `/categories` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json_auth, put_json_auth, seed_category, seed_user};
use inotebook_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_category_under_parent(pool: PgPool) {
    let (_, token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/categories",
        json!({ "name": "  Web  ", "parent": tech.id, "description": "Frontend and backend" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Web");
    assert_eq!(json["data"]["parent_id"], tech.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn super_admin_passes_admin_guard(pool: PgPool) {
    let (_, token) = seed_user(&pool, "Root", Role::SuperAdmin).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/categories", json!({ "name": "Tech" }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_category_guards(pool: PgPool) {
    let (_, user_token) = seed_user(&pool, "Reader", Role::User).await;
    let (_, admin_token) = seed_user(&pool, "Admin", Role::Admin).await;
    seed_category(&pool, "Tech", None).await;
    let app = common::build_test_app(pool);

    // Non-admin.
    let response =
        post_json_auth(app.clone(), "/api/v1/categories", json!({ "name": "Art" }), &user_token)
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Name too short.
    let response =
        post_json_auth(app.clone(), "/api/v1/categories", json!({ "name": "A" }), &admin_token)
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing parent.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "Orphan", "parent": 9999 }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Duplicate root name.
    let response =
        post_json_auth(app, "/api/v1/categories", json!({ "name": "Tech" }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tree_nests_and_sorts_children(pool: PgPool) {
    let tech = seed_category(&pool, "Tech", None).await;
    seed_category(&pool, "Art", None).await;
    seed_category(&pool, "web", Some(tech.id)).await;
    seed_category(&pool, "Databases", Some(tech.id)).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/categories/tree").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let roots = json["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["name"], "Art");
    assert_eq!(roots[1]["name"], "Tech");

    let children = roots[1]["children"].as_array().unwrap();
    assert_eq!(children[0]["name"], "Databases");
    assert_eq!(children[1]["name"], "web");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_category_includes_parent_name(pool: PgPool) {
    let tech = seed_category(&pool, "Tech", None).await;
    let web = seed_category(&pool, "Web", Some(tech.id)).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), &format!("/api/v1/categories/{}", web.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["parent_name"], "Tech");

    let missing = get(app, "/api/v1/categories/424242").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ancestors_are_root_first(pool: PgPool) {
    let tech = seed_category(&pool, "Tech", None).await;
    let web = seed_category(&pool, "Web", Some(tech.id)).await;
    let app = common::build_test_app(pool);

    let path = format!("/api/v1/categories/{}/ancestors", web.id);
    let first = body_json(get(app.clone(), &path).await).await;
    let second = body_json(get(app, &path).await).await;

    assert_eq!(
        first["data"],
        json!([{ "id": tech.id, "name": "Tech" }, { "id": web.id, "name": "Web" }])
    );
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_self_parent_and_deep_cycle(pool: PgPool) {
    let (_, token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let web = seed_category(&pool, "Web", Some(tech.id)).await;
    let rust = seed_category(&pool, "Rust", Some(web.id)).await;
    let app = common::build_test_app(pool);

    let path = format!("/api/v1/categories/{}", tech.id);

    let response =
        put_json_auth(app.clone(), &path, json!({ "parent_id": tech.id }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        put_json_auth(app.clone(), &path, json!({ "parent_id": rust.id }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("cycle"));

    let response = put_json_auth(app, &path, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_renames_and_detaches(pool: PgPool) {
    let (_, token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let web = seed_category(&pool, "Web", Some(tech.id)).await;
    let app = common::build_test_app(pool);

    let path = format!("/api/v1/categories/{}", web.id);
    let response = put_json_auth(
        app.clone(),
        &path,
        json!({ "name": "Web Dev", "parent_id": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Web Dev");
    assert!(json["data"]["parent_id"].is_null());

    let missing_parent =
        put_json_auth(app, &path, json!({ "parent_id": 9999 }), &token).await;
    assert_eq!(missing_parent.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_update_body_is_rejected_before_lookup(pool: PgPool) {
    let (_, token) = seed_user(&pool, "Admin", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/categories/999999",
        json!({ "name": "A" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json_auth(
        app.clone(),
        "/api/v1/categories/999999",
        json!({ "parent_id": 999999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        put_json_auth(app, "/api/v1/categories/999999", json!({ "name": "Valid" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
