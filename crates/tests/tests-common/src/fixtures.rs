//! SQLite databases created on the fly in temporary directories.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// The statements creating a small music catalogue.
///
/// `O'Brien` has no albums and `Hidden Track` has no album. The `Quirks` table has a column
/// whose name needs escaping.
const CHINOOK: &[&str] = &[
    r#"CREATE TABLE [Artist]
(
    [ArtistId] INTEGER  NOT NULL,
    [Name] NVARCHAR(120),
    CONSTRAINT [PK_Artist] PRIMARY KEY  ([ArtistId])
)"#,
    r#"CREATE TABLE [Album]
(
    [AlbumId] INTEGER  NOT NULL,
    [Title] NVARCHAR(160)  NOT NULL,
    [ArtistId] INTEGER  NOT NULL,
    CONSTRAINT [PK_Album] PRIMARY KEY  ([AlbumId]),
    FOREIGN KEY ([ArtistId]) REFERENCES [Artist] ([ArtistId])
)"#,
    r#"CREATE TABLE [Track]
(
    [TrackId] INTEGER  NOT NULL,
    [Name] NVARCHAR(200)  NOT NULL,
    [AlbumId] INTEGER,
    [Milliseconds] INTEGER  NOT NULL,
    [UnitPrice] NUMERIC(10,2)  NOT NULL,
    CONSTRAINT [PK_Track] PRIMARY KEY  ([TrackId]),
    FOREIGN KEY ([AlbumId]) REFERENCES [Album] ([AlbumId])
)"#,
    r#"CREATE TABLE "Quirks" ("Id" INTEGER PRIMARY KEY, "Alb""um" TEXT, "Flag" BOOLEAN)"#,
    "INSERT INTO Artist (ArtistId, Name) VALUES
        (1, 'AC/DC'), (2, 'Accept'), (3, 'Aerosmith'), (4, 'O''Brien')",
    "INSERT INTO Album (AlbumId, Title, ArtistId) VALUES
        (1, 'For Those About To Rock We Salute You', 1),
        (2, 'Balls to the Wall', 2),
        (3, 'Restless and Wild', 2),
        (4, 'Let There Be Rock', 1),
        (5, 'Big Ones', 3)",
    "INSERT INTO Track (TrackId, Name, AlbumId, Milliseconds, UnitPrice) VALUES
        (1, 'For Those About To Rock (We Salute You)', 1, 343719, 0.99),
        (2, 'Balls to the Wall', 2, 342562, 0.99),
        (3, 'Fast As a Shark', 3, 230619, 0.99),
        (4, 'Restless and Wild', 3, 252051, 0.99),
        (5, 'Go Down', 4, 331180, 1.99),
        (6, 'Walk On Water', 5, 295680, 0.99),
        (7, 'Hidden Track', NULL, 1000, 0.49)",
    r#"INSERT INTO "Quirks" ("Id", "Alb""um", "Flag") VALUES (1, 'it''s', 1), (2, 'plain', 0)"#,
];

/// A database file that lives as long as this value.
#[derive(Debug)]
pub struct FixtureDatabase {
    // deleted on drop
    _dir: tempfile::TempDir,
    pub path: PathBuf,
}

impl FixtureDatabase {
    /// A read-write pool over the fixture.
    pub async fn pool(&self) -> anyhow::Result<SqlitePool> {
        open_pool(&self.path).await
    }
}

/// Create the music catalogue in a fresh temporary directory.
pub async fn chinook() -> anyhow::Result<FixtureDatabase> {
    create_database("chinook.sqlite", CHINOOK).await
}

/// Create a database containing the given tables and rows.
pub async fn create_database(
    file_name: &str,
    statements: &[&str],
) -> anyhow::Result<FixtureDatabase> {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join(file_name);

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    for statement in statements {
        sqlx::query(statement).execute(&pool).await?;
    }
    pool.close().await;

    tracing::info!(path = %path.display(), "created fixture database");
    Ok(FixtureDatabase { _dir: dir, path })
}

async fn open_pool(path: &Path) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(path);
    Ok(SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?)
}
