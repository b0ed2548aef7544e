use crate::db;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value};

pub const VIEWER_SETTINGS_KEY: &str = "setup.viewer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSettings {
    pub storage_key: String,
    pub placeholder_text: String,
    pub lecture_label_prefix: String,
    pub highlight_color: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        ViewerSettings {
            storage_key: "academyData".to_string(),
            placeholder_text: "لا يوجد حصة".to_string(),
            lecture_label_prefix: "محاضرة".to_string(),
            highlight_color: "#e3f2fd".to_string(),
        }
    }
}

impl ViewerSettings {
    pub fn lecture_label(&self, slot: u8) -> String {
        format!("{} {}", self.lecture_label_prefix, slot)
    }

    /// Apply a partial update; the first invalid field aborts and leaves
    /// `self` untouched.
    pub fn merge_patch(&mut self, patch: &Map<String, Value>) -> Result<(), String> {
        let mut next = self.clone();
        for (k, v) in patch {
            match k.as_str() {
                "storageKey" => {
                    let s = parse_string_max(v, k, 64)?;
                    if s.is_empty() {
                        return Err("storageKey must not be empty".into());
                    }
                    next.storage_key = s;
                }
                "placeholderText" => {
                    next.placeholder_text = parse_string_max(v, k, 64)?;
                }
                "lectureLabelPrefix" => {
                    next.lecture_label_prefix = parse_string_max(v, k, 32)?;
                }
                "highlightColor" => {
                    let s = parse_string_max(v, k, 7)?.to_ascii_lowercase();
                    if !is_hex_color(&s) {
                        return Err("highlightColor must look like #rrggbb".into());
                    }
                    next.highlight_color = s;
                }
                _ => return Err(format!("unknown viewer field: {}", k)),
            }
        }
        *self = next;
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn parse_string_max(v: &Value, key: &str, max_chars: usize) -> Result<String, String> {
    let s = v.as_str().ok_or_else(|| format!("{} must be string", key))?;
    let s = s.trim();
    if s.chars().count() > max_chars {
        return Err(format!("{} length must be <= {}", key, max_chars));
    }
    Ok(s.to_string())
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn load_viewer_settings(conn: &Connection) -> anyhow::Result<ViewerSettings> {
    let mut current = ViewerSettings::default();
    // Saved settings are applied field by field so one bad value does not
    // discard the rest.
    let saved = match db::settings_get_json(conn, VIEWER_SETTINGS_KEY) {
        Ok(v) => v,
        Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => None,
        Err(e) => return Err(e),
    };
    if let Some(Value::Object(saved)) = saved {
        for (k, v) in saved {
            let mut one = Map::new();
            one.insert(k, v);
            let _ = current.merge_patch(&one);
        }
    }
    Ok(current)
}

pub fn save_viewer_settings(conn: &Connection, settings: &ViewerSettings) -> anyhow::Result<()> {
    db::settings_set_json(conn, VIEWER_SETTINGS_KEY, &settings.to_json())
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

    fn patch(v: Value) -> Map<String, Value> {
        v.as_object().cloned().expect("object")
    }

    #[test]
    fn defaults_match_the_classic_viewer() {
        let s = ViewerSettings::default();
        assert_eq!(s.storage_key, "academyData");
        assert_eq!(s.lecture_label(3), "محاضرة 3");
        assert_eq!(s.to_json()["highlightColor"], "#e3f2fd");
    }

    #[test]
    fn invalid_patch_leaves_settings_unchanged() {
        let mut s = ViewerSettings::default();
        let err = s
            .merge_patch(&patch(json!({ "storageKey": "other", "highlightColor": "blue" })))
            .expect_err("bad colour");
        assert!(err.contains("highlightColor"));
        assert_eq!(s, ViewerSettings::default());

        assert!(s.merge_patch(&patch(json!({ "storageKey": "  " }))).is_err());
        assert!(s.merge_patch(&patch(json!({ "fontSize": 3 }))).is_err());
    }

    #[test]
    fn saved_settings_roundtrip_and_tolerate_bad_fields() {
        let conn = memory_db();
        assert_eq!(load_viewer_settings(&conn).expect("load"), ViewerSettings::default());

        let mut s = ViewerSettings::default();
        s.merge_patch(&patch(json!({ "storageKey": "term2", "highlightColor": "#FFEEDD" })))
            .expect("patch");
        save_viewer_settings(&conn, &s).expect("save");
        let loaded = load_viewer_settings(&conn).expect("load");
        assert_eq!(loaded.storage_key, "term2");
        assert_eq!(loaded.highlight_color, "#ffeedd");

        db::settings_set_json(
            &conn,
            VIEWER_SETTINGS_KEY,
            &json!({ "storageKey": "term3", "highlightColor": 42 }),
        )
        .expect("set");
        let loaded = load_viewer_settings(&conn).expect("load");
        assert_eq!(loaded.storage_key, "term3");
        assert_eq!(loaded.highlight_color, "#e3f2fd");

        db::storage_set(&conn, VIEWER_SETTINGS_KEY, "garbage").expect("set");
        assert_eq!(load_viewer_settings(&conn).expect("load"), ViewerSettings::default());
    }
}
