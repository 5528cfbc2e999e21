use autoremove_db::{create_pool_with, health_check, DbConfig};
use sqlx::PgPool;

/// Health check succeeds against a migrated database.
#[sqlx::test(migrations = "tests/migrations")]
async fn test_health_check(pool: PgPool) {
    health_check(&pool).await.unwrap();
}

/// A pool built from configuration reaches the same server the tests use.
#[sqlx::test(migrations = "tests/migrations")]
async fn test_pool_from_config(_pool: PgPool) {
    let config = DbConfig::from_vars(|key| match key {
        "DATABASE_MAX_CONNECTIONS" => Some("2".to_string()),
        _ => std::env::var(key).ok(),
    })
    .unwrap();
    assert_eq!(config.max_connections, 2);

    let pool = create_pool_with(&config).await.unwrap();
    health_check(&pool).await.unwrap();
    assert_eq!(pool.options().get_max_connections(), 2);
    pool.close().await;
}

/// `from_env` picks up the `DATABASE_URL` the test harness runs against.
#[sqlx::test(migrations = "tests/migrations")]
async fn test_config_from_env(_pool: PgPool) {
    let config = DbConfig::from_env().unwrap();
    assert_eq!(
        Some(config.database_url.as_str()),
        std::env::var("DATABASE_URL").ok().as_deref()
    );
}

/// Every fixture table carries the two soft-delete columns the models expect.
#[sqlx::test(migrations = "tests/migrations")]
async fn test_fixture_tables_have_soft_delete_columns(pool: PgPool) {
    let expected = [
        ("projects", "deleted_at", "auto_remove"),
        ("documents", "deleted_at", "auto_remove"),
        ("attachments", "removed_at", "removal_reason"),
    ];

    for (table, deleted_at, code) in expected {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT column_name::text, data_type::text
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name::text = $1
               AND column_name::text IN ($2, $3)
             ORDER BY column_name",
        )
        .bind(table)
        .bind(deleted_at)
        .bind(code)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(rows.len(), 2, "{table} should have {deleted_at} and {code}");
        for (column, data_type) in &rows {
            let want = if column == deleted_at {
                "timestamp with time zone"
            } else {
                "integer"
            };
            assert_eq!(data_type, want, "{table}.{column} has the wrong type");
        }
    }
}
