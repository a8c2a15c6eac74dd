//! A main thread persisted through a hook chain into a file on disk.

use roundtable_hooks::{HookChain, TracingHook, YamlSink};
use roundtable_model::{ConfigDocument, HookError, Message, ModelError, read_thread};
use std::sync::Arc;

const CONFIG: &str = "speakers:\n- name: alice\n  desc: consultant\n- name: bob\n  desc: critic\n";

#[test]
fn thread_file_reloads_into_the_same_messages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thread.yml");

    let mut config = ConfigDocument::new(CONFIG, "").into_config().unwrap();
    config.setup().unwrap();
    let chain = HookChain::new()
        .with(TracingHook::new())
        .with(YamlSink::append_to(&path).unwrap());
    config.main_thread_mut().set_append_hook(Arc::new(chain));

    config.post("alice", "rt_public", "opening").unwrap();
    config.post("bob", "rt_public", "reply\nover two lines").unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let thread = read_thread(&text).unwrap();
    assert_eq!(thread.messages(), config.main_thread().messages());

    let resumed = ConfigDocument::new(CONFIG, text).into_config().unwrap();
    assert_eq!(resumed.main_thread().next_id(), 3);
}

#[test]
fn failing_hook_keeps_file_and_thread_in_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thread.yml");

    let mut config = ConfigDocument::new(CONFIG, "").into_config().unwrap();
    config.setup().unwrap();
    let chain = HookChain::new()
        .with(|m: &Message| -> Result<(), HookError> {
            if m.content().contains("forbidden") {
                return Err(HookError::Failed("rejected".into()));
            }
            Ok(())
        })
        .with(YamlSink::append_to(&path).unwrap());
    config.main_thread_mut().set_append_hook(Arc::new(chain));

    config.post("alice", "rt_public", "fine").unwrap();
    let err = config.post("bob", "rt_public", "forbidden words").unwrap_err();
    assert!(matches!(err, ModelError::Hook(_)));

    assert_eq!(config.main_thread().len(), 1);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(read_thread(&text).unwrap().len(), 1);
}
