//! Connection management for the settings database

use std::path::PathBuf;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbResult<T> = Result<T, DbError>;

const DB_FILE: &str = "gemsrack-console.db";

/// Open the settings database, creating it if necessary, and run migrations.
///
/// The pool stays small: the console issues one command at a time, and the
/// busy timeout covers a second invocation racing on the same file.
pub fn init_database(data_dir: PathBuf) -> DbResult<DbPool> {
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join(DB_FILE);

    tracing::debug!("Opening settings database at {:?}", db_path);

    let manager = SqliteConnectionManager::file(&db_path).with_init(|conn| {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
        "#,
        )?;
        Ok(())
    });

    let pool = Pool::builder().max_size(2).build(manager)?;

    {
        let conn = pool.get()?;
        super::migrations::run_migrations(&conn)?;
    }

    Ok(pool)
}
