//! Console input tokenizer.
//!
//! Each console line carries one message. Only the first token delimited by
//! ASCII whitespace becomes the message name, so a message can never contain
//! whitespace: `hello world` sends `hello`. Multi-word input is not rejected.
//! Bytes that are not valid UTF-8 are replaced, never refused.

use std::io::BufRead;

use crate::error::IpcError;
use crate::messages::MessageName;

/// Extract the message name from one line of console input.
///
/// A blank line yields the empty name, which is still forwarded.
pub fn next_message_name(line: &str) -> MessageName {
    line.split_ascii_whitespace().next().unwrap_or_default().into()
}

/// Read one line and tokenize it.
///
/// Returns `Ok(None)` once the input is closed. Only an I/O failure is an
/// error.
pub fn read_message<R: BufRead>(input: &mut R) -> Result<Option<MessageName>, IpcError> {
    let mut line = Vec::new();
    let read = input.read_until(b'\n', &mut line).map_err(IpcError::Input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(next_message_name(&String::from_utf8_lossy(&line))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_single_token() {
        assert_eq!(next_message_name("ping").as_str(), "ping");
        assert_eq!(next_message_name("ping\n").as_str(), "ping");
    }

    #[test]
    fn test_only_first_token_is_kept() {
        assert_eq!(next_message_name("hello world").as_str(), "hello");
        assert_eq!(next_message_name("  \thello   world\r\n").as_str(), "hello");
    }

    #[test]
    fn test_non_ascii_whitespace_is_kept() {
        assert_eq!(next_message_name("caf\u{a0}e").as_str(), "caf\u{a0}e");
        assert_eq!(next_message_name("a\u{3000}b c").as_str(), "a\u{3000}b");
    }

    #[test]
    fn test_invalid_utf8_line_is_not_an_error() {
        let mut input = Cursor::new(b"ok\n\xff\xfe\nafter\n".to_vec());
        let mut names = Vec::new();
        while let Some(name) = read_message(&mut input).unwrap() {
            names.push(name.into_string());
        }
        assert_eq!(names, vec!["ok", "\u{fffd}\u{fffd}", "after"]);
    }

    #[test]
    fn test_blank_line_is_empty_name() {
        assert!(next_message_name("").is_empty());
        assert!(next_message_name("   \n").is_empty());
    }

    #[test]
    fn test_read_message_until_eof() {
        let mut input = Cursor::new("first\nsecond third\n\nlast");
        let mut names = Vec::new();
        while let Some(name) = read_message(&mut input).unwrap() {
            names.push(name.into_string());
        }
        assert_eq!(names, vec!["first", "second", "", "last"]);
    }
}
