//! Plain-text message formats shown to and parsed from agents.
//!
//! Read format, one message as the model sees it:
//!
//! ```text
//! timestamp: 1742785200
//! id: 2
//! speaker: alice
//! permissions: rt_alice,rt_public
//! content:
//! first line
//! second line
//! ```
//!
//! Write format, what an agent answers with:
//!
//! ```text
//! role: rt_public
//! content:
//! first line
//! ```

use roundtable_meeting::Reply;
use roundtable_model::Message;
use roundtable_schema::SchemaError;
use thiserror::Error;

/// Text that does not follow a message format.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FormatError {
    /// A header line is missing or out of order.
    #[error("line {line}: expected `{expected}:`")]
    MissingHeader {
        /// 1-based line number.
        line: usize,
        /// The header key that should be there.
        expected: &'static str,
    },

    /// A header value could not be parsed.
    #[error("invalid {field}: {value:?}")]
    InvalidField {
        /// Header key.
        field: &'static str,
        /// Offending text.
        value: String,
    },

    /// Nothing after `content:`.
    #[error("empty content")]
    EmptyContent,

    /// The parsed fields do not make a valid message.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Render a message in the read format.
pub fn render_read(message: &Message) -> String {
    let permissions: Vec<&str> = message.permissions().iter().map(String::as_str).collect();
    format!(
        "timestamp: {}\nid: {}\nspeaker: {}\npermissions: {}\ncontent:\n{}",
        message.timestamp(),
        message.id(),
        message.speaker(),
        permissions.join(","),
        message.content()
    )
}

/// Parse the read format. The body after `content:` is kept verbatim.
pub fn parse_read(text: &str) -> Result<Message, FormatError> {
    let mut rest = text;
    let timestamp = header(&mut rest, "timestamp", 1)?;
    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|_| invalid("timestamp", timestamp))?;
    let id = header(&mut rest, "id", 2)?;
    let id = id.parse::<u64>().map_err(|_| invalid("id", id))?;
    let speaker = header(&mut rest, "speaker", 3)?;
    let permissions = header(&mut rest, "permissions", 4)?;
    let permissions = permissions
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let content = body(&mut rest, 5)?;
    Ok(Message::new(timestamp, id, speaker, permissions, content)?)
}

/// Render a reply in the write format.
pub fn render_write(reply: &Reply) -> String {
    format!("role: {}\ncontent:\n{}", reply.role, reply.content)
}

/// Parse the write format. Surrounding whitespace is dropped from the body.
pub fn parse_write(text: &str) -> Result<Reply, FormatError> {
    let mut rest = text.trim_start();
    let role = header(&mut rest, "role", 1)?;
    if role.is_empty() {
        return Err(invalid("role", role));
    }
    let content = body(&mut rest, 2)?;
    let content = content.trim();
    if content.is_empty() {
        return Err(FormatError::EmptyContent);
    }
    Ok(Reply::new(role, content))
}

/// Parse what an agent wrote. Text without a `role:` header is a public
/// reply made of the whole text.
pub fn parse_reply(text: &str) -> Result<Reply, FormatError> {
    let text = text.trim();
    if text.starts_with("role:") {
        return parse_write(text);
    }
    if text.is_empty() {
        return Err(FormatError::EmptyContent);
    }
    Ok(Reply::public(text))
}

fn invalid(field: &'static str, value: &str) -> FormatError {
    FormatError::InvalidField {
        field,
        value: value.to_owned(),
    }
}

/// Consume one `key: value` line and return the trimmed value.
fn header<'a>(rest: &mut &'a str, key: &'static str, line: usize) -> Result<&'a str, FormatError> {
    let current: &'a str = *rest;
    let (head, tail) = current.split_once('\n').unwrap_or((current, ""));
    let value = head
        .strip_prefix(key)
        .and_then(|v| v.strip_prefix(':'))
        .ok_or(FormatError::MissingHeader {
            line,
            expected: key,
        })?;
    *rest = tail;
    Ok(value.trim())
}

/// Consume `content:` and everything after it. Text on the header line
/// itself becomes the first body line.
fn body(rest: &mut &str, line: usize) -> Result<String, FormatError> {
    let current: &str = *rest;
    let (head, tail) = current.split_once('\n').unwrap_or((current, ""));
    let inline = head
        .strip_prefix("content:")
        .ok_or(FormatError::MissingHeader {
            line,
            expected: "content",
        })?
        .trim();
    *rest = "";
    let content = match (inline.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_owned(),
        (false, true) => inline.to_owned(),
        (false, false) => format!("{inline}\n{tail}"),
    };
    if content.is_empty() {
        return Err(FormatError::EmptyContent);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = "timestamp: 1742785200\nid: 2\nspeaker: s1\npermissions: p1\ncontent:\nbody1";

    #[test]
    fn read_single_permission() {
        let m = parse_read(SINGLE).unwrap();
        assert_eq!(m.timestamp(), 1742785200);
        assert_eq!(m.id(), 2);
        assert_eq!(m.speaker(), "s1");
        assert_eq!(m.content(), "body1");
        assert_eq!(render_read(&m), SINGLE);
    }

    #[test]
    fn read_multiline_multipermission() {
        let text = "timestamp: 1742785200\nid: 2\nspeaker: s1\npermissions: p1,p2\ncontent:\nbody1\nbody2";
        let m = parse_read(text).unwrap();
        assert_eq!(m.permissions().len(), 2);
        assert_eq!(m.content(), "body1\nbody2");
        assert_eq!(render_read(&m), text);
    }

    #[test]
    fn read_rejects_shuffled_headers() {
        let text = "id: 2\ntimestamp: 1\nspeaker: s1\npermissions: p1\ncontent:\nx";
        assert!(matches!(
            parse_read(text),
            Err(FormatError::MissingHeader {
                line: 1,
                expected: "timestamp"
            })
        ));
    }

    #[test]
    fn read_rejects_bad_numbers() {
        let text = "timestamp: soon\nid: 2\nspeaker: s1\npermissions: p1\ncontent:\nx";
        assert!(matches!(
            parse_read(text),
            Err(FormatError::InvalidField {
                field: "timestamp",
                ..
            })
        ));
    }

    #[test]
    fn read_without_permissions_fails_validation() {
        let text = "timestamp: 1\nid: 2\nspeaker: s1\npermissions: \ncontent:\nx";
        assert!(matches!(parse_read(text), Err(FormatError::Schema(_))));
    }

    #[test]
    fn write_multiline() {
        let reply = parse_write("role: r1\ncontent:\nbody1\nbody2").unwrap();
        assert_eq!(reply, Reply::new("r1", "body1\nbody2"));
        assert_eq!(render_write(&reply), "role: r1\ncontent:\nbody1\nbody2");
    }

    #[test]
    fn write_inline_content() {
        let reply = parse_write("role: r1\ncontent: short\n").unwrap();
        assert_eq!(reply, Reply::new("r1", "short"));
    }

    #[test]
    fn write_needs_content() {
        assert!(matches!(
            parse_write("role: r1\ncontent:\n  \n"),
            Err(FormatError::EmptyContent)
        ));
        assert!(matches!(
            parse_write("role: r1\nbody"),
            Err(FormatError::MissingHeader {
                expected: "content",
                ..
            })
        ));
    }

    #[test]
    fn reply_without_header_is_public() {
        let reply = parse_reply("  There's always good weather\nsomewhere.\n").unwrap();
        assert_eq!(reply, Reply::public("There's always good weather\nsomewhere."));
        assert!(matches!(parse_reply("\n"), Err(FormatError::EmptyContent)));
    }
}
