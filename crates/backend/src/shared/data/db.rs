use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_KPI_PAYLOAD_TABLE: &str = r#"
    CREATE TABLE kpi_payload (
        id TEXT PRIMARY KEY NOT NULL,
        kpi_key TEXT NOT NULL,
        time_range TEXT NOT NULL,
        raw_json TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

const CREATE_KPI_PAYLOAD_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_kpi_payload_key_range
        ON kpi_payload (kpi_key, time_range);
"#;

/// `sqlite://` URL for a file path, with the extra slash Windows drive paths need.
fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = sqlite_url(db_file)?;
    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let check_table = r#"
        SELECT name FROM sqlite_master
        WHERE type='table' AND name='kpi_payload';
    "#;
    let existing = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            check_table.to_string(),
        ))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating kpi_payload table");
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            CREATE_KPI_PAYLOAD_TABLE.to_string(),
        ))
        .await?;
    }

    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        CREATE_KPI_PAYLOAD_INDEX.to_string(),
    ))
    .await?;
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn memory_connection() -> DatabaseConnection {
    let mut opt = sea_orm::ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opt).await.unwrap();
    ensure_schema(&conn).await.unwrap();
    conn
}
