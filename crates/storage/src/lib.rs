//! Sqlite-backed preference store.

use std::path::Path;

use anyhow::Context as _;
use folio_core::Theme;
use rusqlite::{Connection, OptionalExtension as _};

const THEME_KEY: &str = "theme";

#[derive(Debug)]
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("open sqlite db at {}", path.as_ref().display()))?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    fn migrate(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS preferences (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                "#,
            )
            .context("create preferences table")?;
        Ok(())
    }

    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("read preference {key}"))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO preferences (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
                (key, value),
            )
            .with_context(|| format!("write preference {key}"))?;
        Ok(())
    }

    /// Persisted theme; missing or unrecognised values read as light.
    pub fn load_theme(&self) -> anyhow::Result<Theme> {
        let theme = match self.get(THEME_KEY)? {
            Some(value) => value.parse::<Theme>().unwrap_or_else(|_| {
                tracing::warn!(%value, "ignoring unknown stored theme");
                Theme::Light
            }),
            None => Theme::Light,
        };
        Ok(theme)
    }

    pub fn save_theme(&self, theme: Theme) -> anyhow::Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }
}
