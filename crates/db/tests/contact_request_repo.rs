//! Integration tests for consultation request storage and digest marking.

use inotebook_core::contact::{validate_submission, ContactStatus};
use inotebook_core::roles::Role;
use inotebook_db::models::contact_request::CreateContactRequest;
use inotebook_db::models::user::CreateUser;
use inotebook_db::repositories::{ContactRequestRepo, UserRepo};
use sqlx::PgPool;

fn submission(name: &str) -> CreateContactRequest {
    validate_submission(name, "Lead@Example.com", Some(""), "I would like a consultation")
        .unwrap()
        .into()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_defaults(pool: PgPool) {
    let req = ContactRequestRepo::create(&pool, &submission("Ada"))
        .await
        .unwrap();
    assert_eq!(req.status, "New");
    assert!(!req.emailed_in_batch);
    assert_eq!(req.email, "lead@example.com");
    assert!(req.company.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_emailed_touches_only_given_ids(pool: PgPool) {
    let a = ContactRequestRepo::create(&pool, &submission("Ada")).await.unwrap();
    let b = ContactRequestRepo::create(&pool, &submission("Bob")).await.unwrap();
    let c = ContactRequestRepo::create(&pool, &submission("Cy")).await.unwrap();

    let unsent = ContactRequestRepo::list_unsent_oldest_first(&pool).await.unwrap();
    let ids: Vec<_> = unsent.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);

    let flipped = ContactRequestRepo::mark_emailed(&pool, &[a.id, c.id]).await.unwrap();
    assert_eq!(flipped, 2);

    let unsent = ContactRequestRepo::list_unsent_oldest_first(&pool).await.unwrap();
    let ids: Vec<_> = unsent.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id]);

    // Marking again is a no-op.
    assert_eq!(ContactRequestRepo::mark_emailed(&pool, &[a.id]).await.unwrap(), 0);
    assert_eq!(ContactRequestRepo::mark_emailed(&pool, &[]).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_status(pool: PgPool) {
    let req = ContactRequestRepo::create(&pool, &submission("Ada")).await.unwrap();

    let updated = ContactRequestRepo::update_status(&pool, req.id, ContactStatus::Contacted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "Contacted");

    assert!(
        ContactRequestRepo::update_status(&pool, 999_999, ContactStatus::Closed)
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_newest_first(pool: PgPool) {
    let a = ContactRequestRepo::create(&pool, &submission("Ada")).await.unwrap();
    let b = ContactRequestRepo::create(&pool, &submission("Bob")).await.unwrap();

    let all = ContactRequestRepo::list_newest_first(&pool).await.unwrap();
    let ids: Vec<_> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_super_admin_emails(pool: PgPool) {
    assert!(UserRepo::super_admin_emails(&pool).await.unwrap().is_empty());

    let boss = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Boss".to_string(),
            email: "boss@example.com".to_string(),
            password_hash: Some("hash".to_string()),
            country: None,
            city: None,
            about: "about is empty".to_string(),
            google_id: None,
            profile_picture_url: None,
        },
    )
    .await
    .unwrap();
    UserRepo::set_role(&pool, boss.id, Role::SuperAdmin).await.unwrap();

    assert_eq!(
        UserRepo::super_admin_emails(&pool).await.unwrap(),
        vec!["boss@example.com".to_string()]
    );
}
