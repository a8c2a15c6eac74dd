//! Thread persistence: each appended message becomes a YAML record.

use roundtable_model::{AppendHook, HookError, Message, message_record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Writes every appended message as a one-element YAML list.
///
/// Concatenated records form a valid thread document, so a file written by
/// this sink can be fed back in to continue the meeting. Writes are flushed
/// before the hook returns; a write failure aborts the append.
pub struct YamlSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> YamlSink<W> {
    /// Wrap any writer.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl YamlSink<File> {
    /// Append to the file at `path`, creating it if needed.
    pub fn append_to(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> AppendHook for YamlSink<W> {
    fn on_append(&self, message: &Message) -> Result<(), HookError> {
        let record = message_record(message).map_err(|e| HookError::Other(Box::new(e)))?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| HookError::Failed("sink lock poisoned".into()))?;
        out.write_all(record.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| HookError::Other(Box::new(e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_model::read_thread;

    #[test]
    fn records_concatenate_into_a_thread() {
        let sink = YamlSink::new(Vec::new());
        let a = Message::new(1, 1, "alice", ["rt_public"], "first").unwrap();
        let b = Message::new(2, 2, "bob", ["rt_public", "rt_bob"], "second\nline").unwrap();
        sink.on_append(&a).unwrap();
        sink.on_append(&b).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("- "));
        assert_eq!(read_thread(&text).unwrap().messages(), &[a, b]);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk gone"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_a_hook_error() {
        let sink = YamlSink::new(Broken);
        let m = Message::new(1, 1, "alice", ["rt_public"], "x").unwrap();
        assert!(sink.on_append(&m).is_err());
    }
}
