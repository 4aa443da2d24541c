//! Structured-output schemas sent with suggestion requests (Gemini schema dialect).

use serde_json::{Value, json};

/// `{ tenor: string, vehicle: string }`
pub fn structure_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tenor": {"type": "STRING"},
            "vehicle": {"type": "STRING"}
        }
    })
}

/// `{ items: string[] }`, shared by every list suggestion.
pub fn items_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "items": {
                "type": "ARRAY",
                "items": {"type": "STRING"}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_schema_fields() {
        let schema = structure_schema();
        assert_eq!(schema["properties"]["tenor"]["type"], "STRING");
        assert_eq!(schema["properties"]["vehicle"]["type"], "STRING");
    }

    #[test]
    fn test_items_schema_is_string_array() {
        let schema = items_schema();
        assert_eq!(schema["properties"]["items"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["items"]["items"]["type"], "STRING");
    }
}
