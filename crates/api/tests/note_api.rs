//! HTTP-level integration tests for the `/notes` resource.

mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth,
    seed_category, seed_note, seed_user,
};
use inotebook_core::roles::Role;
use inotebook_db::repositories::NoteRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_note_assigns_slug_and_defaults(pool: PgPool) {
    let (user, token) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "title": "  Hello World  ",
        "description": "Some words about things",
        "categoryId": tech.id,
    });
    let first = post_json_auth(app.clone(), "/api/v1/notes/addnote", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let json = body_json(first).await;
    assert_eq!(json["data"]["title"], "Hello World");
    assert_eq!(json["data"]["slug"], "hello-world");
    assert_eq!(json["data"]["tag"], "General");
    assert_eq!(json["data"]["read_time_minutes"], 1);
    assert_eq!(json["data"]["is_featured"], false);
    assert_eq!(json["data"]["user_id"], user.id);
    assert_eq!(json["data"]["author_name"], "Writer");
    assert_eq!(json["data"]["category_name"], "Tech");
    assert!(json["data"]["date"].is_string());

    let second = post_json_auth(app, "/api/v1/notes/addnote", body, &token).await;
    assert_eq!(body_json(second).await["data"]["slug"], "hello-world-2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_note_validation(pool: PgPool) {
    let (_, token) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/notes/addnote",
        json!({ "title": "Valid", "description": "Valid body", "categoryId": tech.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/notes/addnote",
        json!({ "title": "Hi", "description": "Valid body", "categoryId": tech.id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/notes/addnote",
        json!({ "title": "Valid", "description": "Valid body", "categoryId": 9999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn featured_flag_only_applies_for_admins(pool: PgPool) {
    let (_, user_token) = seed_user(&pool, "Writer", Role::User).await;
    let (_, admin_token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "title": "Featured try",
        "description": "Some words here",
        "categoryId": tech.id,
        "isFeatured": true,
    });

    let response =
        post_json_auth(app.clone(), "/api/v1/notes/addnote", body.clone(), &user_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["is_featured"], false);

    let response = post_json_auth(app, "/api/v1/notes/addnote", body, &admin_token).await;
    assert_eq!(body_json(response).await["data"]["is_featured"], true);
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_slug_and_recomputes_read_time(pool: PgPool) {
    let (owner, token) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let note = seed_note(&pool, owner.id, tech.id, "Original Title").await;
    let app = common::build_test_app(pool);

    let long_description = vec!["word"; 450].join(" ");
    let response = put_json_auth(
        app,
        &format!("/api/v1/notes/updatenote/{}", note.id),
        json!({ "title": "Brand New Title", "description": long_description }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Brand New Title");
    assert_eq!(json["data"]["slug"], note.slug);
    assert_eq!(json["data"]["read_time_minutes"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_or_admin_guard(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "Writer", Role::User).await;
    let (_, stranger_token) = seed_user(&pool, "Stranger", Role::User).await;
    let (_, admin_token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let note = seed_note(&pool, owner.id, tech.id, "Guarded Note").await;
    let app = common::build_test_app(pool.clone());

    let path = format!("/api/v1/notes/updatenote/{}", note.id);

    let response =
        put_json_auth(app.clone(), &path, json!({ "tag": "Hacked" }), &stranger_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Missing note is 404 even for a stranger.
    let response = put_json_auth(
        app.clone(),
        "/api/v1/notes/updatenote/999999",
        json!({ "tag": "Hacked" }),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response =
        put_json_auth(app.clone(), &path, json!({ "tag": "Reviewed" }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/notes/deletenote/{}", note.id),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(
        app,
        &format!("/api/v1/notes/deletenote/{}", note.id),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], note.id);
    assert!(NoteRepo::find_by_id(&pool, note.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_update_is_rejected(pool: PgPool) {
    let (owner, token) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let note = seed_note(&pool, owner.id, tech.id, "Some Note").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/notes/updatenote/{}", note.id),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_update_body_is_rejected_before_lookup(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "Writer", Role::User).await;
    let (_, stranger_token) = seed_user(&pool, "Stranger", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let note = seed_note(&pool, owner.id, tech.id, "Guarded Note").await;
    let app = common::build_test_app(pool);

    // Not the caller's note, but the short title is reported first.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/notes/updatenote/{}", note.id),
        json!({ "title": "x" }),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json_auth(
        app,
        "/api/v1/notes/updatenote/999999",
        json!({ "description": "abc" }),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn fetch_by_slug_includes_ancestor_path(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let web = seed_category(&pool, "Web", Some(tech.id)).await;
    let note = seed_note(&pool, owner.id, web.id, "Axum Routing").await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), &format!("/api/v1/notes/fetchNoteBySlug/{}", note.slug)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], note.id);
    assert_eq!(
        json["data"]["ancestor_path"],
        json!([{ "id": tech.id, "name": "Tech" }, { "id": web.id, "name": "Web" }])
    );

    let missing = get(app, "/api/v1/notes/fetchNoteBySlug/no-such-note").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fetch_all_notes_scopes_by_role(pool: PgPool) {
    let (writer, writer_token) = seed_user(&pool, "Writer", Role::User).await;
    let (other, _) = seed_user(&pool, "Other", Role::User).await;
    let (_, admin_token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    seed_note(&pool, writer.id, tech.id, "Mine").await;
    seed_note(&pool, other.id, tech.id, "Theirs").await;
    let app = common::build_test_app(pool);

    let mine = body_json(get_auth(app.clone(), "/api/v1/notes/fetchallnotes", &writer_token).await).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
    assert_eq!(mine["data"][0]["title"], "Mine");

    let all = body_json(get_auth(app, "/api/v1/notes/fetchallnotes", &admin_token).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paging_walks_full_set_without_duplicates(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    for i in 0..5 {
        seed_note(&pool, owner.id, tech.id, &format!("Note number {i}")).await;
    }
    let app = common::build_test_app(pool);

    let mut seen = HashSet::new();
    let mut sizes = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let path = match &cursor {
            Some(c) => format!("/api/v1/notes/fetchNextNote?limit=2&lastId={c}"),
            None => "/api/v1/notes/fetchNextNote?limit=2".to_string(),
        };
        let page = body_json(get(app.clone(), &path).await).await;
        let items = page["items"].as_array().unwrap();
        sizes.push(items.len());
        for item in items {
            assert!(seen.insert(item["id"].as_i64().unwrap()));
        }
        if page["has_more"] == false {
            break;
        }
        cursor = Some(page["next_cursor"].as_str().unwrap().to_string());
    }

    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(seen.len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn next_page_edge_cases(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/notes/fetchNextNote?lastId=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app.clone(), "/api/v1/notes/fetchNextNote?categoryId=9999").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "items": [], "has_more": false, "next_cursor": null }));

    let response = get(app, "/api/v1/notes/fetchNextNote").await;
    assert_eq!(body_json(response).await["items"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn by_category_page_and_titles(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "Writer", Role::User).await;
    let tech = seed_category(&pool, "Tech", None).await;
    let art = seed_category(&pool, "Art", None).await;
    seed_note(&pool, owner.id, tech.id, "Zebra Patterns").await;
    seed_note(&pool, owner.id, tech.id, "Async Rust").await;
    seed_note(&pool, owner.id, art.id, "Watercolor").await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), &format!("/api/v1/notes/by-category/{}", tech.id)).await).await;
    assert_eq!(json["category"], json!({ "id": tech.id, "name": "Tech" }));
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["has_more"], false);

    let titles = body_json(
        get(app.clone(), &format!("/api/v1/notes/by-category/{}/titles", tech.id)).await,
    )
    .await;
    assert_eq!(titles["data"][0]["title"], "Async Rust");
    assert_eq!(titles["data"][1]["title"], "Zebra Patterns");

    let missing = get(app, "/api/v1/notes/by-category/9999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_featured_and_recent(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "Writer", Role::User).await;
    let (_, admin_token) = seed_user(&pool, "Admin", Role::Admin).await;
    let tech = seed_category(&pool, "Tech", None).await;
    seed_note(&pool, owner.id, tech.id, "Tokio Internals").await;
    seed_note(&pool, owner.id, tech.id, "Gardening 100%").await;
    let app = common::build_test_app(pool);

    post_json_auth(
        app.clone(),
        "/api/v1/notes/addnote",
        json!({ "title": "Pinned", "description": "Featured body", "categoryId": tech.id, "isFeatured": true }),
        &admin_token,
    )
    .await;

    let found = body_json(get(app.clone(), "/api/v1/notes/search?query=tokio").await).await;
    assert_eq!(found["items"].as_array().unwrap().len(), 1);

    // `%` is matched literally.
    let literal = body_json(get(app.clone(), "/api/v1/notes/search?query=100%25").await).await;
    assert_eq!(literal["items"].as_array().unwrap().len(), 1);

    let empty = get(app.clone(), "/api/v1/notes/search?query=%20").await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let featured = body_json(get(app.clone(), "/api/v1/notes/featured").await).await;
    assert_eq!(featured["data"].as_array().unwrap().len(), 1);
    assert_eq!(featured["data"][0]["title"], "Pinned");

    let batch = body_json(get(app.clone(), "/api/v1/notes/featured/batch").await).await;
    assert_eq!(batch["items"].as_array().unwrap().len(), 1);

    let recent = body_json(get(app, "/api/v1/notes/recent?limit=2").await).await;
    let recent = recent["data"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["title"], "Pinned");
}
