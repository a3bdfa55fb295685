//! Helpers for building and reading [`Message`] values.

use crate::types::{Content, Message, Role};

/// Creates a new agent message carrying a single text [`Content`].
///
/// # Example
///
/// ```
/// use agentwire::utils::new_agent_message;
/// use agentwire::types::Role;
///
/// let message = new_agent_message("Hello, I'm an agent");
/// assert_eq!(message.role, Role::Agent);
/// assert_eq!(message.text(), Some("Hello, I'm an agent"));
/// ```
pub fn new_agent_message(text: impl Into<String>) -> Message {
    Message::new(Role::Agent, Content::text(text))
}

/// Creates a new user message carrying a single text [`Content`].
///
/// # Example
///
/// ```
/// use agentwire::utils::new_user_message;
/// use agentwire::types::Role;
///
/// let message = new_user_message("What's the weather?");
/// assert_eq!(message.role, Role::User);
/// ```
pub fn new_user_message(text: impl Into<String>) -> Message {
    Message::new(Role::User, Content::text(text))
}

/// Returns the message's text content, or an empty string if it carries
/// non-text content (function call/response/error).
///
/// # Example
///
/// ```
/// use agentwire::utils::{new_agent_message, get_message_text};
///
/// let message = new_agent_message("Hello, world!");
/// assert_eq!(get_message_text(&message), "Hello, world!");
/// ```
pub fn get_message_text(message: &Message) -> String {
    message.text().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use uuid::Uuid;

    #[test]
    fn new_agent_message_basic() {
        let message = new_agent_message("Hello");
        assert_eq!(message.role, Role::Agent);
        assert!(Uuid::parse_str(&message.message_id).is_ok());
        assert!(message.conversation_id.is_none());
    }

    #[test]
    fn new_user_message_basic() {
        let message = new_user_message("Hi");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), Some("Hi"));
    }

    #[test]
    fn get_message_text_on_non_text_content_is_empty() {
        use crate::types::Content;
        let message = Message::new(
            Role::Agent,
            Content::Error {
                message: "boom".to_string(),
            },
        );
        assert_eq!(get_message_text(&message), "");
    }
}
