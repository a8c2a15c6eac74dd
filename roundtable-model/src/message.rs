//! Messages and the threads that order them.

use crate::builtin;
use crate::error::{HookError, ModelError};
use crate::names;
use roundtable_schema::field::empty_seq;
use roundtable_schema::{
    FieldSpec, Fields, Schema, SchemaError, SchemaTable, ToValue, Validator, Value, validate,
};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// One statement in a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    timestamp: i64,
    id: u64,
    content: String,
    speaker: String,
    permissions: BTreeSet<String>,
}

static MESSAGE: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Message",
        "Message definition.",
        vec![
            FieldSpec::new("timestamp", "message timestamp").validate(Validator::at_least(0)),
            FieldSpec::new("id", "message id").validate(Validator::at_least(0)),
            FieldSpec::new("content", "message content").validate(Validator::NON_EMPTY),
            FieldSpec::new("speaker", "message speaker").validate(Validator::NON_EMPTY),
            FieldSpec::new("permissions", "required permissions to read this message")
                .validate(Validator::NON_EMPTY)
                .default_to(empty_seq),
        ],
    )
});

impl Message {
    /// Create a validated message.
    pub fn new<S: Into<String>>(
        timestamp: i64,
        id: u64,
        speaker: impl Into<String>,
        permissions: impl IntoIterator<Item = S>,
        content: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let message = Self {
            timestamp,
            id,
            content: content.into(),
            speaker: speaker.into(),
            permissions: names(permissions),
        };
        validate(&message)?;
        Ok(message)
    }

    /// Epoch seconds at append time.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Id, unique within the thread.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Body text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Name of the authoring speaker.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Permissions any one of which grants read access.
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }
}

impl Schema for Message {
    fn schema() -> &'static SchemaTable {
        &MESSAGE
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "timestamp" => Some(self.timestamp.to_value()),
            "id" => Some(self.id.to_value()),
            "content" => Some(self.content.to_value()),
            "speaker" => Some(self.speaker.to_value()),
            "permissions" => Some(self.permissions.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            timestamp: fields.read("timestamp")?,
            id: fields.read("id")?,
            content: fields.read("content")?,
            speaker: fields.read("speaker")?,
            permissions: fields.read("permissions")?,
        })
    }
}

/// An ordered, immutable list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thread {
    messages: Vec<Message>,
}

static THREAD: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Thread",
        "Chat thread.",
        vec![FieldSpec::new("messages", "list of messages").default_to(empty_seq)],
    )
});

impl Thread {
    /// Wrap messages in order.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Messages matching `pred`, order kept.
    pub fn select(&self, pred: impl Fn(&Message) -> bool) -> Thread {
        Thread::new(self.messages.iter().filter(|m| pred(m)).cloned().collect())
    }

    /// The last `n` messages (all of them when `n` exceeds the length).
    pub fn latest(&self, n: usize) -> Thread {
        let start = self.messages.len().saturating_sub(n);
        Thread::new(self.messages[start..].to_vec())
    }

    /// Messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Take the messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl<'a> IntoIterator for &'a Thread {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Schema for Thread {
    fn schema() -> &'static SchemaTable {
        &THREAD
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "messages" => Some(self.messages.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self::new(fields.read("messages")?))
    }
}

/// Observer invoked with each new message before it enters the main thread.
///
/// Returning an error aborts the append. Closures of the right shape are
/// hooks too.
pub trait AppendHook: Send + Sync {
    /// Inspect or record the message about to be inserted.
    fn on_append(&self, message: &Message) -> Result<(), HookError>;
}

impl<F> AppendHook for F
where
    F: Fn(&Message) -> Result<(), HookError> + Send + Sync,
{
    fn on_append(&self, message: &Message) -> Result<(), HookError> {
        self(message)
    }
}

/// Hook that accepts everything. The main thread starts with this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl AppendHook for NoopHook {
    fn on_append(&self, _message: &Message) -> Result<(), HookError> {
        Ok(())
    }
}

/// Source of epoch seconds for new messages.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp())
}

/// The one mutable thread of a meeting.
///
/// It assigns ids and timestamps itself and notifies exactly one append
/// hook per message, synchronously, before inserting.
#[derive(Clone)]
pub struct MainThread {
    thread: Thread,
    hook: Arc<dyn AppendHook>,
    clock: Clock,
}

static MAIN_THREAD: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "MainThread",
        "Chat main thread.",
        vec![FieldSpec::new("messages", "list of messages").default_to(empty_seq)],
    )
});

impl MainThread {
    /// An empty main thread.
    pub fn new() -> Self {
        Self::from_thread(Thread::default())
    }

    /// Continue an existing thread.
    pub fn from_thread(thread: Thread) -> Self {
        Self {
            thread,
            hook: Arc::new(NoopHook),
            clock: system_clock(),
        }
    }

    /// Replace the append hook.
    pub fn set_append_hook(&mut self, hook: Arc<dyn AppendHook>) {
        self.hook = hook;
    }

    /// Replace the timestamp source.
    pub fn set_clock(&mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) {
        self.clock = Arc::new(clock);
    }

    /// The id the next append will get.
    pub fn next_id(&self) -> u64 {
        self.thread.iter().map(Message::id).max().unwrap_or(0) + 1
    }

    /// Append a message authored by `speaker`.
    ///
    /// The speaker's direct-message permission is always added, so authors
    /// can read their own messages. The hook sees the message first; if it
    /// fails nothing is inserted.
    pub fn append<S: Into<String>>(
        &mut self,
        speaker: &str,
        permissions: impl IntoIterator<Item = S>,
        content: impl Into<String>,
    ) -> Result<&Message, ModelError> {
        let mut permissions = names(permissions);
        permissions.insert(builtin::dm_name(speaker));
        let message = Message::new(
            (self.clock)(),
            self.next_id(),
            speaker,
            permissions,
            content,
        )?;
        self.hook.on_append(&message)?;
        tracing::debug!(id = message.id(), speaker, "message appended");
        self.thread.messages.push(message);
        Ok(&self.thread.messages[self.thread.messages.len() - 1])
    }

    /// Read-only view of the messages.
    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Messages in order.
    pub fn messages(&self) -> &[Message] {
        self.thread.messages()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.thread.len()
    }

    /// Whether there are no messages.
    pub fn is_empty(&self) -> bool {
        self.thread.is_empty()
    }
}

impl Default for MainThread {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MainThread {
    fn eq(&self, other: &Self) -> bool {
        self.thread == other.thread
    }
}

impl fmt::Debug for MainThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainThread")
            .field("messages", &self.thread.messages)
            .finish_non_exhaustive()
    }
}

impl Schema for MainThread {
    fn schema() -> &'static SchemaTable {
        &MAIN_THREAD
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.thread.get(field)
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self::from_thread(Thread::new(fields.read("messages")?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn msg(id: u64, speaker: &str) -> Message {
        Message::new(0, id, speaker, ["p"], format!("m{id}")).unwrap()
    }

    #[test]
    fn message_validators() {
        assert!(Message::new(-1, 1, "a", ["p"], "x").is_err());
        assert!(Message::new(0, 1, "a", ["p"], "").is_err());
        assert!(Message::new(0, 1, "", ["p"], "x").is_err());
        assert!(Message::new(0, 1, "a", Vec::<String>::new(), "x").is_err());
        assert!(Message::new(0, 0, "a", ["p"], "x").is_ok());
    }

    #[test]
    fn select_and_latest_keep_order() {
        let t = Thread::new(vec![msg(1, "a"), msg(2, "b"), msg(3, "a")]);
        let ids = |t: &Thread| t.iter().map(Message::id).collect::<Vec<_>>();
        assert_eq!(ids(&t.select(|m| m.speaker() == "a")), vec![1, 3]);
        assert_eq!(ids(&t.latest(2)), vec![2, 3]);
        assert_eq!(ids(&t.latest(10)), vec![1, 2, 3]);
        assert!(t.latest(0).is_empty());
    }

    #[test]
    fn append_assigns_ids_and_dm_permission() {
        let mut main = MainThread::new();
        main.set_clock(|| 42);
        let m = main.append("alice", ["rt_public"], "hello").unwrap();
        assert_eq!(m.id(), 1);
        assert_eq!(m.timestamp(), 42);
        assert!(m.permissions().contains("rt_alice"));
        assert!(m.permissions().contains("rt_public"));
        main.append("bob", Vec::<String>::new(), "hi").unwrap();
        let ids: Vec<_> = main.messages().iter().map(Message::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn next_id_follows_max_existing() {
        let mut main = MainThread::from_thread(Thread::new(vec![msg(7, "a"), msg(3, "b")]));
        assert_eq!(main.next_id(), 8);
        assert_eq!(main.append("a", ["p"], "x").unwrap().id(), 8);
    }

    #[test]
    fn hook_sees_message_before_insert() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut main = MainThread::new();
        main.set_append_hook(Arc::new(move |m: &Message| -> Result<(), HookError> {
            sink.lock().unwrap().push(m.id());
            Ok(())
        }));
        main.append("a", ["p"], "one").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn hook_failure_leaves_thread_unchanged() {
        let mut main = MainThread::new();
        main.set_append_hook(Arc::new(|_: &Message| -> Result<(), HookError> {
            Err(HookError::Failed("disk full".into()))
        }));
        let err = main.append("a", ["p"], "one").unwrap_err();
        assert!(matches!(err, ModelError::Hook(_)));
        assert!(main.is_empty());
    }

    #[test]
    fn invalid_content_is_rejected_before_hook() {
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let mut main = MainThread::new();
        main.set_append_hook(Arc::new(move |_: &Message| -> Result<(), HookError> {
            *flag.lock().unwrap() = true;
            Ok(())
        }));
        assert!(matches!(
            main.append("a", ["p"], ""),
            Err(ModelError::Schema(_))
        ));
        assert!(!*called.lock().unwrap());
    }
}
