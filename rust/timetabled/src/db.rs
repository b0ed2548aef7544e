use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub const DB_FILE_NAME: &str = "timetable.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;

    // Plain string values keyed by name, the same shape the admin tool writes.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS storage(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;

    Ok(conn)
}

pub fn storage_get(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM storage WHERE key = ?",
        params![key],
        |row| row.get::<_, String>(0),
    )
    .optional()
}

pub fn storage_set(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO storage(key, value, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )?;
    Ok(())
}

pub fn settings_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let Some(raw) = storage_get(conn, key)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn settings_set_json(
    conn: &Connection,
    key: &str,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    storage_set(conn, key, &serde_json::to_string(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().expect("open memory db");
        conn.execute(
            "CREATE TABLE storage(key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT)",
            [],
        )
        .expect("create storage");
        conn
    }

    #[test]
    fn storage_roundtrip_overwrites_by_key() {
        let conn = memory_db();
        assert_eq!(storage_get(&conn, "academyData").expect("get"), None);
        storage_set(&conn, "academyData", "{}").expect("set");
        storage_set(&conn, "academyData", "{\"students\":[]}").expect("set again");
        assert_eq!(
            storage_get(&conn, "academyData").expect("get").as_deref(),
            Some("{\"students\":[]}")
        );
    }

    #[test]
    fn settings_json_rejects_garbage() {
        let conn = memory_db();
        storage_set(&conn, "setup.viewer", "not json").expect("set");
        assert!(settings_get_json(&conn, "setup.viewer").is_err());

        settings_set_json(&conn, "setup.viewer", &json!({ "storageKey": "x" })).expect("set");
        let v = settings_get_json(&conn, "setup.viewer")
            .expect("get")
            .expect("present");
        assert_eq!(v["storageKey"], "x");
    }
}
