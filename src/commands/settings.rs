use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_SCHEMA_VERSION: i64 = 1;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_BASE_URL: &str = "https://secure.runescape.com";
const DEFAULT_USER_AGENT: &str = concat!("osrs_helper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BotSettings {
    pub command_prefix: String,
    pub request_timeout: Duration,
    pub highscores_base_url: String,
    pub user_agent: String,
    pub max_clue_matches: usize,
    pub log_level: log::LevelFilter,
}

impl Default for BotSettings {
    fn default() -> Self {
        settings_from_value(&default_settings())
    }
}

pub fn load_bot_settings(data_dir: &str) -> Result<BotSettings, String> {
    let settings = load_settings_from_disk(data_dir)?;
    Ok(settings_from_value(&settings))
}

fn settings_from_value(settings: &Value) -> BotSettings {
    let text = |key: &str, default: &str| {
        settings
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    BotSettings {
        command_prefix: text("commandPrefix", DEFAULT_PREFIX),
        request_timeout: Duration::from_secs(
            settings
                .get("requestTimeoutSecs")
                .and_then(Value::as_u64)
                .unwrap_or(5),
        ),
        highscores_base_url: text("highscoresBaseUrl", DEFAULT_BASE_URL),
        user_agent: text("userAgent", DEFAULT_USER_AGENT),
        max_clue_matches: settings
            .get("maxClueMatches")
            .and_then(Value::as_u64)
            .unwrap_or(15) as usize,
        log_level: text("logLevel", "info")
            .parse()
            .unwrap_or(log::LevelFilter::Info),
    }
}

pub fn load_settings_from_disk(data_dir: &str) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_helper_dir(data_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({}))
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

fn settings_path(data_dir: &str) -> PathBuf {
    Path::new(data_dir)
        .join(".osrs_helper")
        .join("settings.json")
}

fn ensure_helper_dir(data_dir: &str) -> Result<(), String> {
    let dir = Path::new(data_dir).join(".osrs_helper");
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create .osrs_helper directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        // Unversioned files kept the prefix under a bare `prefix` key.
        if let Some(obj) = out.as_object_mut() {
            if let Some(prefix) = obj.remove("prefix") {
                obj.entry("commandPrefix".to_string()).or_insert(prefix);
            }
        }
    }

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "commandPrefix": DEFAULT_PREFIX,
        "requestTimeoutSecs": 5,
        "highscoresBaseUrl": DEFAULT_BASE_URL,
        "userAgent": DEFAULT_USER_AGENT,
        "maxClueMatches": 15,
        "logLevel": "info"
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "requestTimeoutSecs", 1, 30, 5);
    clamp_u64(obj, "maxClueMatches", 1, 50, 15);

    sanitize_enum(obj, "logLevel", &["error", "warn", "info", "debug", "trace"], "info");

    // A prefix with whitespace could never start a command word.
    ensure_text(obj, "commandPrefix", DEFAULT_PREFIX, |value| {
        !value.is_empty() && !value.chars().any(char::is_whitespace)
    });
    ensure_text(obj, "highscoresBaseUrl", DEFAULT_BASE_URL, |value| {
        value.starts_with("http://") || value.starts_with("https://")
    });
    ensure_text(obj, "userAgent", DEFAULT_USER_AGENT, |value| !value.trim().is_empty());
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

fn ensure_text(
    map: &mut Map<String, Value>,
    key: &str,
    default: &str,
    is_valid: impl Fn(&str) -> bool,
) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| is_valid(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_timeout_and_fixes_bad_values() {
        let migrated = migrate_settings(json!({
            "schema_version": 1,
            "requestTimeoutSecs": 600,
            "maxClueMatches": 0,
            "commandPrefix": "  ",
            "highscoresBaseUrl": "ftp://example.com",
            "logLevel": "loud"
        }));

        assert_eq!(migrated["requestTimeoutSecs"], json!(30));
        assert_eq!(migrated["maxClueMatches"], json!(1));
        assert_eq!(migrated["commandPrefix"], json!("!"));
        assert_eq!(migrated["highscoresBaseUrl"], json!(DEFAULT_BASE_URL));
        assert_eq!(migrated["logLevel"], json!("info"));
    }

    #[test]
    fn unversioned_prefix_moves_to_command_prefix() {
        let migrated = migrate_settings(json!({ "prefix": "?" }));

        assert_eq!(migrated["commandPrefix"], json!("?"));
        assert!(migrated.get("prefix").is_none());
        assert_eq!(
            migrated.get("schema_version").and_then(Value::as_i64),
            Some(SETTINGS_SCHEMA_VERSION)
        );
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let settings = settings_from_value(&migrate_settings(json!({
            "schema_version": 1,
            "requestTimeoutSecs": 10
        })));

        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.max_clue_matches, 15);
        assert_eq!(settings.command_prefix, "!");
        assert_eq!(settings.log_level, log::LevelFilter::Info);
    }
}
