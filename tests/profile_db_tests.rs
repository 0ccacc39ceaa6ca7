use pretty_assertions::assert_eq;
use sqlx::PgPool;
use squadhub::database::models::AppRole;
use squadhub::database::repositories::profile as profile_repo;

async fn roles_of(pool: &PgPool, email: &str) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT r.role
        FROM user_roles r
        JOIN profiles p ON p.id = r.user_id
        WHERE p.email = $1
        ORDER BY r.role
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn profile_count(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_and_base_role_commit_together(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let profile = profile_repo::create_profile(&mut tx, "ava@example.com", "hash", "ava")
        .await
        .unwrap();
    profile_repo::grant_role(&mut tx, profile.id, AppRole::User)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(profile_count(&pool, "ava@example.com").await, 1);
    assert_eq!(roles_of(&pool, "ava@example.com").await, vec!["user"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rolled_back_registration_leaves_no_profile(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    profile_repo::create_profile(&mut tx, "ben@example.com", "hash", "ben")
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(profile_count(&pool, "ben@example.com").await, 0);
    assert!(roles_of(&pool, "ben@example.com").await.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_role_grant_and_revoke(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let profile = profile_repo::create_profile(&mut tx, "cleo@example.com", "hash", "cleo")
        .await
        .unwrap();
    profile_repo::grant_role(&mut tx, profile.id, AppRole::User)
        .await
        .unwrap();
    profile_repo::grant_role(&mut tx, profile.id, AppRole::Admin)
        .await
        .unwrap();
    // Granting twice is a no-op
    profile_repo::grant_role(&mut tx, profile.id, AppRole::Admin)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(roles_of(&pool, "cleo@example.com").await, vec!["admin", "user"]);

    let mut tx = pool.begin().await.unwrap();
    profile_repo::revoke_role(&mut tx, profile.id, AppRole::Admin)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(roles_of(&pool, "cleo@example.com").await, vec!["user"]);
}
