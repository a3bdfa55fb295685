//! Helpers for working with [`Part`] — the content unit artifacts accumulate.

use crate::types::Part;
use serde_json::Value;

/// Extracts text content from every [`Part::Text`] in a slice.
///
/// # Example
///
/// ```
/// use agentwire::types::Part;
/// use agentwire::utils::get_text_parts;
///
/// let parts = vec![Part::text("Hello"), Part::text("World")];
/// assert_eq!(get_text_parts(&parts), vec!["Hello", "World"]);
/// ```
pub fn get_text_parts(parts: &[Part]) -> Vec<String> {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Extracts structured data from every [`Part::Data`] in a slice.
///
/// # Example
///
/// ```
/// use agentwire::types::Part;
/// use agentwire::utils::get_data_parts;
/// use serde_json::json;
///
/// let parts = vec![Part::Data { data: json!({"key": "value"}), metadata: None }];
/// assert_eq!(get_data_parts(&parts), vec![json!({"key": "value"})]);
/// ```
pub fn get_data_parts(parts: &[Part]) -> Vec<Value> {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Data { data, .. } => Some(data.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_text_parts_empty() {
        let parts: Vec<Part> = vec![];
        assert_eq!(get_text_parts(&parts), Vec::<String>::new());
    }

    #[test]
    fn get_data_parts_empty() {
        let parts: Vec<Part> = vec![];
        assert_eq!(get_data_parts(&parts), Vec::<Value>::new());
    }

    #[test]
    fn get_text_parts_skips_data_parts() {
        let parts = vec![
            Part::text("hi"),
            Part::Data {
                data: serde_json::json!({"a": 1}),
                metadata: None,
            },
        ];
        assert_eq!(get_text_parts(&parts), vec!["hi".to_string()]);
    }
}
