use std::error::Error;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SSE EVENT CONTAINER
// ============================================================================

/// Represents a single Server-Sent Event line with the complete wire format
#[derive(Debug, Clone)]
pub struct SseEvent {
    /// The payload after the "data:" prefix, leading whitespace removed
    pub data: Option<String>,

    /// Optional event type (e.g. "message_start"), for "event:" lines
    pub event: Option<String>,

    /// The complete line as received, prefix included
    pub raw_line: String,
}

impl SseEvent {
    /// Check if this event represents the end of the stream
    pub fn is_done(&self) -> bool {
        self.data.as_deref() == Some("[DONE]")
    }
}

impl FromStr for SseEvent {
    type Err = SseParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = line.strip_prefix("data:") {
            // Qwen emits "data: {...}" but the payload parses fine either way,
            // so tolerate a missing space after the colon.
            let data = rest.trim_start();
            if data.is_empty() {
                return Err(SseParseError {
                    message: "Empty data field is not a valid SSE event".to_string(),
                });
            }
            Ok(SseEvent {
                data: Some(data.to_string()),
                event: None,
                raw_line: line.to_string(),
            })
        } else if let Some(rest) = line.strip_prefix("event:") {
            let event_type = rest.trim_start();
            if event_type.is_empty() {
                return Err(SseParseError {
                    message: "Empty event field is not a valid SSE event".to_string(),
                });
            }
            Ok(SseEvent {
                data: None,
                event: Some(event_type.to_string()),
                raw_line: line.to_string(),
            })
        } else {
            Err(SseParseError {
                message: format!("Line does not start with 'data:' or 'event:': {}", line),
            })
        }
    }
}

#[derive(Debug)]
pub struct SseParseError {
    pub message: String,
}

impl fmt::Display for SseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSE parse error: {}", self.message)
    }
}

impl Error for SseParseError {}

// ============================================================================
// SSE STREAM ITERATOR
// ============================================================================

/// Generic SSE (Server-Sent Events) line iterator over a buffered body.
/// Parses raw lines into [`SseEvent`] objects; lines that are neither `data:`
/// nor `event:` (blank separators, comments) are skipped. The `[DONE]`
/// terminator is yielded like any other data line, not treated as a stop
/// signal; consumers filter it and keep scanning.
pub struct SseStreamIter<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub lines: I,
}

impl<I> SseStreamIter<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self { lines }
    }
}

impl TryFrom<&[u8]> for SseStreamIter<std::vec::IntoIter<String>> {
    type Error = std::str::Utf8Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let s = std::str::from_utf8(bytes)?;
        let lines: Vec<String> = s.lines().map(|line| line.to_string()).collect();
        Ok(SseStreamIter::new(lines.into_iter()))
    }
}

impl<I> Iterator for SseStreamIter<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = SseEvent;

    fn next(&mut self) -> Option<Self::Item> {
        for line in &mut self.lines {
            if let Ok(event) = line.as_ref().parse::<SseEvent>() {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_line_parsing() {
        let event: SseEvent = "data: {\"x\":1}".parse().unwrap();
        assert_eq!(event.data.as_deref(), Some("{\"x\":1}"));
        assert!(event.event.is_none());
        assert_eq!(event.raw_line, "data: {\"x\":1}");

        // No space after the colon is accepted too
        let event: SseEvent = "data:{\"x\":1}".parse().unwrap();
        assert_eq!(event.data.as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn test_event_line_parsing() {
        let event: SseEvent = "event: message_start".parse().unwrap();
        assert_eq!(event.event.as_deref(), Some("message_start"));
        assert!(event.data.is_none());
    }

    #[test]
    fn test_non_sse_lines_are_errors() {
        assert!("".parse::<SseEvent>().is_err());
        assert!("plain text".parse::<SseEvent>().is_err());
        assert!("data:".parse::<SseEvent>().is_err());
    }

    #[test]
    fn test_done_marker_detection() {
        let event: SseEvent = "data: [DONE]".parse().unwrap();
        assert!(event.is_done());
        let event: SseEvent = "data:[DONE]".parse().unwrap();
        assert!(event.is_done());
    }

    #[test]
    fn test_iterator_keeps_scanning_past_done() {
        let body = "data: {\"a\":1}\n\ndata: [DONE]\n\ndata: {\"b\":2}\n";
        let mut iter = SseStreamIter::try_from(body.as_bytes()).unwrap();

        let first = iter.next().unwrap();
        assert_eq!(first.data.as_deref(), Some("{\"a\":1}"));

        let done = iter.next().unwrap();
        assert!(done.is_done());

        // The terminator is a line to filter, not the end of the scan
        let after = iter.next().unwrap();
        assert_eq!(after.data.as_deref(), Some("{\"b\":2}"));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_iterator_skips_noise_lines() {
        let body = ": comment\n\nnot sse\ndata: {\"a\":1}\n";
        let events: Vec<SseEvent> = SseStreamIter::new(body.lines()).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data.as_deref(), Some("{\"a\":1}"));
    }
}
