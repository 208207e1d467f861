//! Repository behaviour that only PostgreSQL can show.

use chrono::{TimeDelta, Utc};

use userbase_core::error::ErrorKind;
use userbase_database::migration::verify_schema;
use userbase_database::repositories::{ItemRepository, UserRepository};
use userbase_database::{ItemStore, UserDirectory};
use userbase_entity::item::CreateItem;
use userbase_entity::user::{CreateUser, UpdateUser};

use crate::helpers::{migrated_pool, test_config, unique_email};

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        name: "Repo".to_string(),
        email: email.to_string(),
        password: "not-a-real-hash".to_string(),
        is_active: true,
        is_super_user: false,
        verified: false,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_migrated_schema_passes_check() {
    let pool = migrated_pool(&test_config()).await;
    verify_schema(&pool).await.unwrap();
    // A second run applies nothing and still passes.
    userbase_database::migration::run_migrations(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_is_conflict() {
    let pool = migrated_pool(&test_config()).await;
    let repo = UserRepository::new(pool);
    let email = unique_email("dup");

    repo.create(&new_user(&email)).await.unwrap();
    let err = repo.create(&new_user(&email)).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_missing_user_is_not_found() {
    let pool = migrated_pool(&test_config()).await;
    let repo = UserRepository::new(pool);

    let err = repo
        .find_by_email(&unique_email("ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_reset_token_lookup_honours_expiry() {
    let pool = migrated_pool(&test_config()).await;
    let repo = UserRepository::new(pool);
    let user = repo.create(&new_user(&unique_email("reset"))).await.unwrap();

    let expires_at = Utc::now() + TimeDelta::minutes(15);
    let token = format!("token-{}", user.id.simple());
    repo.update_password_reset(user.id, &token, expires_at)
        .await
        .unwrap();

    let found = repo.find_by_reset_token(&token, Utc::now()).await.unwrap();
    assert_eq!(found.id, user.id);

    let err = repo
        .find_by_reset_token(&token, expires_at + TimeDelta::seconds(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let cleared = repo.reset_password(user.id, "new-hash").await.unwrap();
    assert!(cleared.password_reset_token.is_none());
    assert!(cleared.password_reset_at.is_none());
    assert_eq!(cleared.password, "new-hash");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_verification_code_cleared_on_verify() {
    let pool = migrated_pool(&test_config()).await;
    let repo = UserRepository::new(pool);
    let user = repo.create(&new_user(&unique_email("verify"))).await.unwrap();

    let code = format!("code-{}", user.id.simple());
    repo.update_verification_code(user.id, &code).await.unwrap();
    assert_eq!(
        repo.find_by_verification_code(&code).await.unwrap().id,
        user.id
    );

    let verified = repo.update_verification(user.id, "", true).await.unwrap();
    assert!(verified.verified);
    assert!(verified.verification_code.is_none());
    assert!(repo.find_by_verification_code(&code).await.is_err());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_profile_update_keeps_unset_fields() {
    let pool = migrated_pool(&test_config()).await;
    let repo = UserRepository::new(pool);
    let user = repo.create(&new_user(&unique_email("profile"))).await.unwrap();

    let updated = repo
        .update_profile(
            user.id,
            &UpdateUser {
                name: Some("Renamed".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.email, user.email);
    assert!(updated.is_active);
    assert!(updated.updated_at >= user.updated_at);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_deleting_owner_removes_items() {
    let pool = migrated_pool(&test_config()).await;
    let users = UserRepository::new(pool.clone());
    let items = ItemRepository::new(pool);
    let owner = users.create(&new_user(&unique_email("owner"))).await.unwrap();

    let item = items
        .create(
            owner.id,
            &CreateItem {
                title: "Lamp".to_string(),
                description: "Desk lamp".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(items.list_by_owner(owner.id, 0, 10).await.unwrap().len(), 1);

    users.delete(owner.id).await.unwrap();

    assert!(items.find_by_id(item.id).await.unwrap().is_none());
}
