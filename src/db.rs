// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::path::Path;

use kasus_core::error::ErrorReport;
use kasus_core::error::Fallible;
use kasus_core::store::KeyValueStore;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

const SCHEMA: &str = "
create table if not exists kv (
    namespace text not null,
    key text not null,
    value text not null,
    primary key (namespace, key)
) strict;
";

/// The collection's SQLite database, used as a namespaced key-value store.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(path: &Path) -> Fallible<Self> {
        log::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path).map_err(db_error)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(db_error)?)
    }

    fn with_connection(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn })
    }

    /// All keys in a namespace, sorted.
    pub fn keys(&self, namespace: &str) -> Fallible<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("select key from kv where namespace = ? order by key")
            .map_err(db_error)?;
        let rows = stmt
            .query_map([namespace], |row| row.get::<_, String>(0))
            .map_err(db_error)?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key.map_err(db_error)?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for Database {
    fn get(&self, namespace: &str, key: &str) -> Fallible<Option<String>> {
        self.conn
            .query_row(
                "select value from kv where namespace = ? and key = ?",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Fallible<()> {
        self.conn
            .execute(
                "insert into kv (namespace, key, value) values (?, ?, ?)
                 on conflict (namespace, key) do update set value = excluded.value",
                params![namespace, key, value],
            )
            .map_err(db_error)?;
        Ok(())
    }
}

fn db_error(e: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("database error: {e}"))
}

#[cfg(test)]
mod tests {
    use kasus_core::mastery::evaluate;
    use kasus_core::progress::ProgressSnapshot;
    use kasus_core::store::PROGRESS_NAMESPACE;
    use kasus_core::store::ProgressStore;
    use kasus_core::types::content_key::ContentKey;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_get_missing() -> Fallible<()> {
        let db = Database::in_memory()?;
        assert_eq!(db.get("progress", "verbs.csv")?, None);
        Ok(())
    }

    #[test]
    fn test_set_overwrites() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        db.set("settings", "mode", "prep")?;
        db.set("settings", "mode", "case")?;
        assert_eq!(db.get("settings", "mode")?.as_deref(), Some("case"));
        assert_eq!(db.get("progress", "mode")?, None);
        Ok(())
    }

    #[test]
    fn test_keys() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        db.set(PROGRESS_NAMESPACE, "verbs.csv", "{}")?;
        db.set(PROGRESS_NAMESPACE, "adjectives.csv", "{}")?;
        db.set("settings", "mode", "both")?;
        assert_eq!(db.keys(PROGRESS_NAMESPACE)?, vec!["adjectives.csv", "verbs.csv"]);
        Ok(())
    }

    #[test]
    fn test_progress_survives_reopen() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("kasus.db");
        let key = ContentKey::from("warten|auf|Ich warte auf dich.");
        let mut snapshot = ProgressSnapshot::default();
        let t = evaluate(snapshot.record(&key), true);
        snapshot.apply(&key, t);
        {
            let mut store = ProgressStore::new(Database::new(&path)?);
            store.save("verbs.csv", &snapshot);
            assert!(!store.is_degraded());
        }
        let store = ProgressStore::new(Database::new(&path)?);
        assert_eq!(store.load("verbs.csv"), snapshot);
        Ok(())
    }
}
