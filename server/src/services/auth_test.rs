use super::*;

// =============================================================
// Password hashing
// =============================================================

#[test]
fn hash_verifies_against_original_password() {
    let stored = hash_password("hunter2");
    assert!(verify_password("hunter2", &stored));
}

#[test]
fn hash_rejects_wrong_password() {
    let stored = hash_password("hunter2");
    assert!(!verify_password("hunter3", &stored));
}

#[test]
fn hashes_are_salted() {
    // Same password, different salt, different stored value.
    assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
}

#[test]
fn stored_format_is_salt_and_hash() {
    let stored = hash_password("pw");
    let (salt, hash) = stored.split_once('$').expect("salt$hash");
    assert_eq!(salt.len(), 32);
    assert_eq!(hash.len(), 64);
}

#[test]
fn verify_rejects_malformed_stored_value() {
    assert!(!verify_password("pw", "no-separator-here"));
    assert!(!verify_password("pw", ""));
}

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    async fn live_pool() -> sqlx::PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for live tests");
        PgPoolOptions::new().connect(&url).await.expect("connect")
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let pool = live_pool().await;
        let email = format!("auth-test-{}@example.com", uuid::Uuid::new_v4());

        let created = register(&pool, &email, "password123", "Auth Test")
            .await
            .expect("register");
        assert_eq!(created.email, email);

        let logged_in = login(&pool, &email, "password123").await.expect("login");
        assert_eq!(logged_in.id, created.id);

        let err = login(&pool, &email, "wrong").await.expect_err("bad password");
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = register(&pool, &email, "password123", "Dup").await.expect_err("dup email");
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn get_user_fetches_registered_account() {
        let pool = live_pool().await;
        let email = format!("auth-lookup-{}@example.com", uuid::Uuid::new_v4());

        let created = register(&pool, &email, "password123", "Lookup Test")
            .await
            .expect("register");

        let fetched = get_user(&pool, created.id).await.expect("query").expect("found");
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.email, email);

        let missing = get_user(&pool, uuid::Uuid::new_v4()).await.expect("query");
        assert!(missing.is_none());
    }
}
