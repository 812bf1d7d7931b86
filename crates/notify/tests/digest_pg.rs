//! Contact digest against a real database with a recording mailer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inotebook_core::contact::validate_submission;
use inotebook_core::roles::Role;
use inotebook_db::models::contact_request::CreateContactRequest;
use inotebook_db::models::user::CreateUser;
use inotebook_db::repositories::{ContactRequestRepo, UserRepo};
use inotebook_notify::{
    ContactDigest, DigestOutcome, EmailError, MailTransport, OutboundEmail, PgDigestStore,
};
use sqlx::PgPool;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

async fn submit(pool: &PgPool, name: &str) -> i64 {
    let input: CreateContactRequest =
        validate_submission(name, "lead@example.com", None, "Looking for help with a build")
            .unwrap()
            .into();
    ContactRequestRepo::create(pool, &input).await.unwrap().id
}

async fn super_admin(pool: &PgPool, email: &str) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Boss".to_string(),
            email: email.to_string(),
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
    UserRepo::set_role(pool, user.id, Role::SuperAdmin).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_three_pending_zero_super_admins(pool: PgPool) {
    for name in ["Ada", "Bob", "Cy"] {
        submit(&pool, name).await;
    }
    let mailer = Arc::new(RecordingMailer::default());
    let digest = ContactDigest::new(Arc::new(PgDigestStore::new(pool.clone())), mailer.clone());

    let outcome = digest.run_once().await.unwrap();
    assert_eq!(outcome, DigestOutcome::NoRecipients { pending: 3 });
    assert!(mailer.sent.lock().unwrap().is_empty());

    let unsent = ContactRequestRepo::list_unsent_oldest_first(&pool).await.unwrap();
    assert_eq!(unsent.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sent_requests_are_marked(pool: PgPool) {
    super_admin(&pool, "boss@example.com").await;
    let a = submit(&pool, "Ada").await;
    let b = submit(&pool, "Bob").await;

    let mailer = Arc::new(RecordingMailer::default());
    let digest = ContactDigest::new(Arc::new(PgDigestStore::new(pool.clone())), mailer.clone());

    let outcome = digest.run_once().await.unwrap();
    assert_eq!(
        outcome,
        DigestOutcome::Sent {
            requests: 2,
            recipients: 1
        }
    );

    for id in [a, b] {
        let row = ContactRequestRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert!(row.emailed_in_batch);
    }

    {
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["boss@example.com"]);
        assert!(sent[0].subject.starts_with("[2]"));
    }

    // A second run has nothing to do.
    assert_eq!(digest.run_once().await.unwrap(), DigestOutcome::NoWork);
}
