use super::*;

#[test]
fn bytes_to_hex_encodes_lowercase_pairs() {
    assert_eq!(bytes_to_hex(&[0x00, 0xff, 0x1a]), "00ff1a");
}

#[test]
fn generated_tokens_are_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generated_tokens_are_unique() {
    assert_ne!(generate_token(), generate_token());
}

#[test]
fn session_ttl_is_seven_days() {
    assert_eq!(SESSION_TTL_SECS, 604_800);
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
    async fn create_then_validate_then_delete_session() {
        let pool = live_pool().await;
        let user = crate::services::auth::register(
            &pool,
            &format!("session-test-{}@example.com", uuid::Uuid::new_v4()),
            "password123",
            "Session Test",
        )
        .await
        .expect("register");

        let token = create_session(&pool, user.id).await.expect("create");
        let found = validate_session(&pool, &token).await.expect("validate");
        assert_eq!(found.expect("session user").id, user.id);

        delete_session(&pool, &token).await.expect("delete");
        let gone = validate_session(&pool, &token).await.expect("validate");
        assert!(gone.is_none());
    }
}
