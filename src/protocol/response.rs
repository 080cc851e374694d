//! Response accumulation and classification.
//!
//! Incoming socket chunks are concatenated into a per-operation buffer.
//! After each chunk the accumulated bytes are checked for the prompt token
//! as a suffix: if present, everything before it is the complete response;
//! if absent, more data is awaited. A prompt split across chunks is detected
//! once its final bytes arrive.
//!
//! # Example
//!
//! ```
//! use vcontrold_client::protocol::ResponseBuffer;
//!
//! let mut buffer = ResponseBuffer::new();
//! assert_eq!(buffer.push(b"42\n"), None);
//! assert_eq!(buffer.push(b"vctrld>"), Some("42\n".to_string()));
//! ```

use bytes::BytesMut;

use super::PROMPT;
use crate::error::{Result, VControlError};

/// Buffer accumulating incoming bytes until the trailing prompt token.
///
/// All data is stored in a single `BytesMut`. The buffer is reused across
/// operations; callers clear it before each dispatch.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
}

impl ResponseBuffer {
    /// Create a new empty response buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(256),
        }
    }

    /// Push a chunk and check whether the response is now complete.
    ///
    /// Returns `Some(response)` when the accumulated bytes end with the
    /// prompt token; the response is everything before the prompt, decoded
    /// lossily, and the buffer is reset for the next operation. Returns
    /// `None` while more data is awaited.
    pub fn push(&mut self, chunk: &[u8]) -> Option<String> {
        self.buffer.extend_from_slice(chunk);

        if !self.buffer.ends_with(PROMPT.as_bytes()) {
            return None;
        }

        let body_len = self.buffer.len() - PROMPT.len();
        let body = self.buffer.split_to(body_len);
        self.buffer.clear();
        Some(String::from_utf8_lossy(&body).into_owned())
    }

    /// Accumulated bytes decoded lossily, for handshake diagnostics.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Whether the accumulated bytes are a strict prefix of the prompt
    /// token. Used during the connect handshake to keep waiting when the
    /// prompt itself arrives fragmented.
    pub fn is_prompt_prefix(&self) -> bool {
        self.buffer.len() < PROMPT.len() && PROMPT.as_bytes().starts_with(&self.buffer)
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard any accumulated bytes.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Classify a settled `get` response.
///
/// A response starting with `ERR:` fails with the command name and the raw
/// response; anything else resolves with the response trimmed of trailing
/// whitespace.
pub fn classify_get(command: &str, response: &str) -> Result<String> {
    if response.starts_with("ERR:") {
        return Err(VControlError::GetFailed {
            command: command.to_string(),
            response: response.to_string(),
        });
    }
    Ok(response.trim_end().to_string())
}

/// Classify a settled `set` response.
///
/// A response starting with `OK` resolves with the response trimmed of
/// trailing whitespace; anything else fails with the full command line that
/// was sent and the raw response. The `OK` / `ERR:` conventions are the
/// daemon's and are deliberately not unified.
pub fn classify_set(command_line: &str, response: &str) -> Result<String> {
    if response.starts_with("OK") {
        return Ok(response.trim_end().to_string());
    }
    Err(VControlError::SetFailed {
        command: command_line.trim_end().to_string(),
        response: response.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_complete_response() {
        let mut buffer = ResponseBuffer::new();
        let settled = buffer.push(b"42\nvctrld>");
        assert_eq!(settled, Some("42\n".to_string()));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_bare_prompt_yields_empty_response() {
        let mut buffer = ResponseBuffer::new();
        assert_eq!(buffer.push(b"vctrld>"), Some(String::new()));
    }

    #[test]
    fn test_fragmented_response() {
        let mut buffer = ResponseBuffer::new();
        assert_eq!(buffer.push(b"OK"), None);
        assert_eq!(buffer.push(b"\nvctrld>"), Some("OK\n".to_string()));
    }

    #[test]
    fn test_prompt_split_across_chunks() {
        let mut buffer = ResponseBuffer::new();
        assert_eq!(buffer.push(b"21.5\nvctr"), None);
        assert_eq!(buffer.push(b"ld>"), Some("21.5\n".to_string()));
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut buffer = ResponseBuffer::new();
        let stream = b"on\nvctrld>";

        let mut settled = None;
        for byte in stream {
            if let Some(response) = buffer.push(&[*byte]) {
                settled = Some(response);
            }
        }

        assert_eq!(settled, Some("on\n".to_string()));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_no_prompt_keeps_waiting() {
        let mut buffer = ResponseBuffer::new();
        assert_eq!(buffer.push(b"partial data without terminator"), None);
        assert_eq!(buffer.len(), 31);
    }

    #[test]
    fn test_buffer_resets_after_settlement() {
        let mut buffer = ResponseBuffer::new();
        assert_eq!(buffer.push(b"first\nvctrld>"), Some("first\n".to_string()));
        assert_eq!(buffer.push(b"second\nvctrld>"), Some("second\n".to_string()));
    }

    #[test]
    fn test_is_prompt_prefix() {
        let mut buffer = ResponseBuffer::new();
        buffer.push(b"vctr");
        assert!(buffer.is_prompt_prefix());

        buffer.clear();
        buffer.push(b"HELLO");
        assert!(!buffer.is_prompt_prefix());
    }

    #[test]
    fn test_classify_get_success_trims() {
        let result = classify_get("getTempA", "21.5\n").unwrap();
        assert_eq!(result, "21.5");
    }

    #[test]
    fn test_classify_get_err_prefix_fails() {
        let err = classify_get("getTempA", "ERR: unknown command\n").unwrap_err();
        match err {
            VControlError::GetFailed { command, response } => {
                assert_eq!(command, "getTempA");
                assert!(response.starts_with("ERR:"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_set_ok_prefix_succeeds() {
        let result = classify_set("setTempA 22\n", "OK\n").unwrap();
        assert_eq!(result, "OK");
    }

    #[test]
    fn test_classify_set_non_ok_fails() {
        let err = classify_set("setTempA 99\n", "ERR: invalid value\n").unwrap_err();
        match err {
            VControlError::SetFailed { command, response } => {
                assert_eq!(command, "setTempA 99");
                assert_eq!(response, "ERR: invalid value\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classification_is_asymmetric() {
        // A get response that is neither OK nor ERR: succeeds.
        assert!(classify_get("getMode", "standby\n").is_ok());
        // The same text fails a set, which demands an OK prefix.
        assert!(classify_set("setMode standby\n", "standby\n").is_err());
    }
}
