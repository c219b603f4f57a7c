use crate::defaults::{self, Ue4UtilConfig};
use crate::error::Error;
use crate::Result;
use serde_json::Value;

// ============================================================================
// Config document edits
// ============================================================================

/// Set a value inside the config document and return the updated config.
///
/// The edited document must still deserialize into `Ue4UtilConfig`, so a
/// pointer into an unknown or mistyped field is rejected before anything is
/// saved.
pub fn set_value(config: &Ue4UtilConfig, pointer: &str, value: Value) -> Result<Ue4UtilConfig> {
    let mut document = to_document(config)?;
    set_json_pointer(&mut document, pointer, value)?;
    from_document(document)
}

/// Remove a value from the config document and return the updated config.
/// Removed fields fall back to their built-in defaults.
pub fn remove_value(config: &Ue4UtilConfig, pointer: &str) -> Result<Ue4UtilConfig> {
    let mut document = to_document(config)?;
    remove_json_pointer(&mut document, pointer)?;
    from_document(document)
}

/// Load, edit, and save the global config file.
pub fn set_and_save(pointer: &str, value: Value) -> Result<Ue4UtilConfig> {
    let config = set_value(&defaults::load_config(), pointer, value)?;
    defaults::save_config(&config)?;
    Ok(config)
}

/// Load, remove a value from, and save the global config file.
pub fn remove_and_save(pointer: &str) -> Result<Ue4UtilConfig> {
    let config = remove_value(&defaults::load_config(), pointer)?;
    defaults::save_config(&config)?;
    Ok(config)
}

fn to_document(config: &Ue4UtilConfig) -> Result<Value> {
    serde_json::to_value(config)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize config".to_string())))
}

fn from_document(document: Value) -> Result<Ue4UtilConfig> {
    serde_json::from_value(document)
        .map_err(|e| Error::validation_invalid_json(e, Some("deserialize config".to_string())))
}

// ============================================================================
// JSON Pointer Operations (internal)
// ============================================================================

pub(crate) fn set_json_pointer(root: &mut Value, pointer: &str, new_value: Value) -> Result<()> {
    let pointer = normalize_pointer(pointer)?;
    let Some((parent_ptr, token)) = split_parent_pointer(&pointer) else {
        *root = new_value;
        return Ok(());
    };

    let parent = ensure_pointer_container(root, &parent_ptr)?;
    match parent {
        Value::Object(map) => {
            map.insert(token, new_value);
            Ok(())
        }
        _ => Err(Error::config_invalid_value(
            pointer.as_str(),
            Some(value_type_name(parent).to_string()),
            "Cannot set child on non-object",
        )),
    }
}

pub(crate) fn remove_json_pointer(root: &mut Value, pointer: &str) -> Result<()> {
    let pointer = normalize_pointer(pointer)?;
    let Some((parent_ptr, token)) = split_parent_pointer(&pointer) else {
        return Err(Error::validation_invalid_argument(
            "pointer",
            "Cannot remove the document root",
            None,
            None,
        ));
    };

    let removed = root
        .pointer_mut(&parent_ptr)
        .and_then(Value::as_object_mut)
        .and_then(|map| map.remove(&token));

    match removed {
        Some(_) => Ok(()),
        None => Err(Error::config_invalid_value(
            pointer.as_str(),
            None,
            "No value at pointer",
        )),
    }
}

fn normalize_pointer(pointer: &str) -> Result<String> {
    if pointer.is_empty() {
        return Ok(String::new());
    }

    if pointer == "/" {
        return Err(Error::validation_invalid_argument(
            "pointer",
            "Invalid JSON pointer '/'",
            None,
            None,
        ));
    }

    if !pointer.starts_with('/') {
        return Err(Error::validation_invalid_argument(
            "pointer",
            format!("JSON pointer must start with '/': {}", pointer),
            None,
            None,
        ));
    }

    Ok(pointer.to_string())
}

fn split_parent_pointer(pointer: &str) -> Option<(String, String)> {
    if pointer.is_empty() {
        return None;
    }

    let (parent, token) = pointer.rsplit_once('/')?;
    Some((parent.to_string(), unescape_token(token)))
}

fn ensure_pointer_container<'a>(root: &'a mut Value, pointer: &str) -> Result<&'a mut Value> {
    let mut current = root;

    for token in pointer.split('/').skip(1).map(unescape_token) {
        if current.is_null() {
            *current = Value::Object(serde_json::Map::new());
        }

        current = match current {
            Value::Object(map) => map
                .entry(token)
                .or_insert_with(|| Value::Object(serde_json::Map::new())),
            other => {
                return Err(Error::config_invalid_value(
                    pointer,
                    Some(value_type_name(other).to_string()),
                    "Expected object at pointer",
                ))
            }
        };
    }

    Ok(current)
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::EchoTarget;
    use serde_json::json;

    #[test]
    fn set_value_updates_typed_field() {
        let config = Ue4UtilConfig::default();
        let updated = set_value(&config, "/defaults/process/raise_on_error", json!(true)).unwrap();
        assert!(updated.defaults.process.raise_on_error);
    }

    #[test]
    fn set_value_creates_env_entries() {
        let config = Ue4UtilConfig::default();
        let updated =
            set_value(&config, "/defaults/process/env/UE_BUILD", json!("shipping")).unwrap();
        assert_eq!(
            updated.defaults.process.env.get("UE_BUILD").map(String::as_str),
            Some("shipping")
        );
    }

    #[test]
    fn set_value_rejects_mistyped_value() {
        let config = Ue4UtilConfig::default();
        let err = set_value(&config, "/defaults/process/capture_echo", json!("nowhere")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_json");
    }

    #[test]
    fn set_value_rejects_relative_pointer() {
        let config = Ue4UtilConfig::default();
        let err = set_value(&config, "defaults", json!({})).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn set_value_through_scalar_is_invalid() {
        let config = Ue4UtilConfig::default();
        let err = set_value(&config, "/defaults/process/raise_on_error/deeper", json!(1))
            .unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn remove_value_restores_default() {
        let mut config = Ue4UtilConfig::default();
        config.defaults.process.capture_echo = EchoTarget::Stdout;

        let updated = remove_value(&config, "/defaults/process/capture_echo").unwrap();
        assert_eq!(updated.defaults.process.capture_echo, EchoTarget::Stderr);
    }

    #[test]
    fn remove_missing_value_is_an_error() {
        let config = Ue4UtilConfig::default();
        let err = remove_value(&config, "/defaults/process/env/ABSENT").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn pointer_tokens_are_unescaped() {
        let mut doc = json!({});
        set_json_pointer(&mut doc, "/a~1b/c~0d", json!(1)).unwrap();
        assert_eq!(doc, json!({"a/b": {"c~d": 1}}));
    }
}
