use crate::apis::openai::{ContentPart, Message, MessageContent};
use std::time::{SystemTime, UNIX_EPOCH};

// ============================================================================
// Shared Transformation Helpers
// ============================================================================

/// Flatten structured message content into plain text for providers that
/// only accept a single string.
pub trait ExtractText {
    fn extract_text(&self) -> String;
}

impl ExtractText for MessageContent {
    /// Text parts are joined with single spaces; image parts are skipped.
    fn extract_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl ExtractText for Message {
    fn extract_text(&self) -> String {
        self.content.extract_text()
    }
}

/// Helper to create a current unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Split a `data:` URI into its media type and base64 payload.
///
/// Returns `None` when the input is not a data URI or carries no comma
/// separator, in which case callers fall back to treating the value as a
/// remote URL or omit the image entirely.
pub fn parse_data_url(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.split(';').next().unwrap_or_default().to_string();
    Some((media_type, payload.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::openai::ImageUrl;

    #[test]
    fn test_extract_text_from_plain_string() {
        let content = MessageContent::Text("hello world".to_string());
        assert_eq!(content.extract_text(), "hello world");
    }

    #[test]
    fn test_extract_text_joins_parts_and_skips_images() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "what is".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "https://example.com/cat.png".to_string(),
                    detail: None,
                },
            },
            ContentPart::Text {
                text: "in this image?".to_string(),
            },
        ]);
        assert_eq!(content.extract_text(), "what is in this image?");
    }

    #[test]
    fn test_extract_text_empty_parts() {
        let content = MessageContent::Parts(vec![]);
        assert_eq!(content.extract_text(), "");
    }

    #[test]
    fn test_parse_data_url_with_media_type() {
        let parsed = parse_data_url("data:image/png;base64,QUJD");
        assert_eq!(
            parsed,
            Some(("image/png".to_string(), "QUJD".to_string()))
        );
    }

    #[test]
    fn test_parse_data_url_without_comma() {
        assert_eq!(parse_data_url("data:image/png;base64"), None);
    }

    #[test]
    fn test_parse_data_url_rejects_remote_url() {
        assert_eq!(parse_data_url("https://example.com/a.png"), None);
    }

    #[test]
    fn test_parse_data_url_bare_payload() {
        let parsed = parse_data_url("data:,QUJD");
        assert_eq!(parsed, Some((String::new(), "QUJD".to_string())));
    }
}
