//! Helpers for building [`Artifact`] values and applying the accumulation
//! rule from §4.3 (index-keyed, `append` semantics).

use crate::types::{Artifact, Part};
use crate::utils::parts::get_text_parts;
use serde_json::Value;
use tracing::warn;

/// Creates a text artifact at the given index.
///
/// # Example
///
/// ```
/// use agentwire::utils::new_text_artifact;
///
/// let artifact = new_text_artifact("Hello, world!", Some(0));
/// assert_eq!(artifact.index, Some(0));
/// ```
pub fn new_text_artifact(text: impl Into<String>, index: Option<u32>) -> Artifact {
    Artifact::text(text, index)
}

/// Creates a structured-data artifact at the given index.
///
/// # Example
///
/// ```
/// use agentwire::utils::new_data_artifact;
/// use serde_json::json;
///
/// let artifact = new_data_artifact(json!({"key": "value"}), Some(0));
/// assert_eq!(artifact.parts.len(), 1);
/// ```
pub fn new_data_artifact(data: Value, index: Option<u32>) -> Artifact {
    Artifact {
        parts: vec![Part::Data {
            data,
            metadata: None,
        }],
        index,
        append: None,
        last_update: None,
    }
}

/// Joins all text parts of an artifact.
///
/// # Example
///
/// ```
/// use agentwire::types::Part;
/// use agentwire::utils::{new_text_artifact, get_artifact_text};
///
/// let artifact = new_text_artifact("hi", Some(0));
/// assert_eq!(get_artifact_text(&artifact), "hi");
/// ```
pub fn get_artifact_text(artifact: &Artifact) -> String {
    get_text_parts(&artifact.parts).join("")
}

/// Applies one incoming artifact snapshot onto a task's existing artifact
/// list per the §4.3 accumulation rule:
///
/// - `index` identifies the artifact slot, not an artifact-level id.
/// - `append = true` with an existing slot concatenates new text parts onto
///   the existing ones (non-text parts are not merged).
/// - `append = false`/absent replaces the slot wholesale.
/// - `append = true` with no existing slot is treated as a fresh artifact
///   (callers should log this at `warn`, matching the reference server's
///   behavior for the analogous legacy `artifact_id` case).
pub fn apply_artifact(artifacts: &mut Vec<Artifact>, incoming: Artifact) {
    let index = incoming.index;
    let existing = index.and_then(|idx| artifacts.iter_mut().find(|a| a.index == Some(idx)));

    match existing {
        Some(existing) if incoming.append == Some(true) => {
            for part in incoming.parts {
                match part {
                    Part::Text { text, metadata } => {
                        if let Some(Part::Text {
                            text: existing_text,
                            ..
                        }) = existing.parts.last_mut()
                        {
                            existing_text.push_str(&text);
                        } else {
                            existing.parts.push(Part::Text { text, metadata });
                        }
                    }
                    other => existing.parts.push(other),
                }
            }
            existing.last_update = incoming.last_update;
        }
        Some(existing) => {
            *existing = incoming;
        }
        None => {
            if incoming.append == Some(true) {
                warn!(
                    index = ?index,
                    "append requested for an artifact index with no existing slot; \
                     treating as a fresh artifact"
                );
            }
            artifacts.push(incoming);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_artifact_replaces_by_default() {
        let mut artifacts = vec![Artifact::text("old", Some(0))];
        apply_artifact(&mut artifacts, Artifact::text("new", Some(0)));
        assert_eq!(artifacts.len(), 1);
        assert_eq!(get_artifact_text(&artifacts[0]), "new");
    }

    #[test]
    fn apply_artifact_appends_text() {
        let mut artifacts = vec![Artifact::text("Hello, ", Some(0))];
        let mut incoming = Artifact::text("world!", Some(0));
        incoming.append = Some(true);
        apply_artifact(&mut artifacts, incoming);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(get_artifact_text(&artifacts[0]), "Hello, world!");
    }

    #[test]
    fn apply_artifact_append_with_no_existing_slot_is_fresh() {
        let mut artifacts: Vec<Artifact> = vec![];
        let mut incoming = Artifact::text("fresh", Some(3));
        incoming.append = Some(true);
        apply_artifact(&mut artifacts, incoming);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].index, Some(3));
    }

    #[test]
    fn apply_artifact_inserts_new_index() {
        let mut artifacts = vec![Artifact::text("first", Some(0))];
        apply_artifact(&mut artifacts, Artifact::text("second", Some(1)));
        assert_eq!(artifacts.len(), 2);
    }
}
