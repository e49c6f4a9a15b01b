//! Integration tests for action dispatch
//!
//! Tests cover:
//! - Drop, queue and run behaviour per lifecycle state
//! - Reposting calls made off the owner thread
//! - Re-entrant actions
//! - A dedicated owner thread

use crate::integration::test_utils::{session, Call, Harness, MockBrowser, MockRecord, MockRemote};
use framehost::config::RunnerConfig;
use framehost::{FrameHost, FrameId, Lifecycle, OwnerThread, RemoteFrame, TaskRunner};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

fn custom(name: &'static str) -> framehost::frame::FrameAction {
    Box::new(move |remote: &dyn RemoteFrame| remote.send_command(name))
}

#[test]
fn test_dispatch_on_unbound_frame_is_dropped() {
    let harness = Harness::new();
    let frame = harness.main_frame();

    frame.dispatch(custom("Ping"));
    frame.undo();

    assert_eq!(frame.pending_actions(), 0);
    frame.bind(harness.record(1, 1)).unwrap();
    frame.attach().unwrap();
    assert!(harness.remote.calls().is_empty());
}

#[test]
fn test_dispatch_on_attached_frame_runs_immediately() {
    let harness = Harness::new();
    let frame = harness.attached_main_frame();

    frame.dispatch(custom("Ping"));

    assert_eq!(harness.remote.calls(), vec![Call::command("Ping")]);
    assert_eq!(frame.pending_actions(), 0);
}

#[test]
fn test_discarded_actions_are_released_on_detach() {
    let harness = Harness::new();
    let frame = harness.main_frame();
    frame.bind(harness.record(1, 1)).unwrap();

    let token = Arc::new(());
    let captured = Arc::clone(&token);
    frame.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
        let _keep = &captured;
        remote.send_command("Never");
    }));
    assert_eq!(Arc::strong_count(&token), 2);

    frame.detach().unwrap();
    assert_eq!(Arc::strong_count(&token), 1);
    assert!(harness.remote.calls().is_empty());
}

#[test]
fn test_foreign_thread_calls_are_reposted_in_order() {
    let mut harness = Harness::new();
    let frame = harness.attached_main_frame();

    let worker = Arc::clone(&frame);
    thread::spawn(move || {
        worker.undo();
        worker.redo();
        worker.dispatch(Box::new(|remote: &dyn RemoteFrame| remote.send_command("Custom")));
        worker.cut();
    })
    .join()
    .unwrap();

    // Nothing runs until the owner thread pumps its tasks.
    assert!(harness.remote.calls().is_empty());
    assert_eq!(harness.run_until_idle(), 4);
    assert_eq!(
        harness.remote.calls(),
        vec![
            Call::command("Undo"),
            Call::command("Redo"),
            Call::command("Custom"),
            Call::command("Cut"),
        ]
    );
}

#[test]
fn test_reposted_call_sees_state_at_execution_time() {
    let mut harness = Harness::new();
    let frame = harness.main_frame();

    let worker = Arc::clone(&frame);
    thread::spawn(move || worker.copy()).join().unwrap();

    // Bound by the time the reposted call runs, so it queues instead of dropping.
    frame.bind(harness.record(1, 1)).unwrap();
    harness.run_until_idle();
    assert_eq!(frame.pending_actions(), 1);

    frame.attach().unwrap();
    assert_eq!(harness.remote.calls(), vec![Call::command("Copy")]);
}

#[test]
fn test_reposted_call_dropped_after_detach() {
    let mut harness = Harness::new();
    let frame = harness.attached_main_frame();

    let worker = Arc::clone(&frame);
    thread::spawn(move || worker.paste()).join().unwrap();
    frame.detach().unwrap();

    assert_eq!(harness.run_until_idle(), 1);
    assert!(harness.remote.calls().is_empty());
}

#[test]
fn test_foreign_call_without_owner_loop_is_dropped() {
    let browser = Arc::new(MockBrowser::default());
    let (runner, pump) = TaskRunner::current_thread();
    let frame = FrameHost::new(session(&browser), runner, true, FrameId::INVALID);
    drop(pump);

    let worker = Arc::clone(&frame);
    thread::spawn(move || {
        worker.undo();
        worker.maybe_send_did_stop_loading();
    })
    .join()
    .unwrap();

    assert_eq!(frame.lifecycle(), Lifecycle::Unbound);
}

#[test]
fn test_reentrant_action_can_query_frame() {
    let harness = Harness::new();
    let frame = harness.main_frame();
    frame.bind(harness.record(1, 1)).unwrap();

    let (tx, rx) = mpsc::channel();
    let observed = Arc::clone(&frame);
    frame.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
        tx.send((observed.lifecycle(), observed.pending_actions()))
            .unwrap();
        // Dispatching from inside an action runs straight through.
        observed.select_all();
        remote.send_command("Outer");
    }));
    frame.attach().unwrap();

    assert_eq!(rx.recv().unwrap(), (Lifecycle::Attached, 0));
    assert_eq!(
        harness.remote.calls(),
        vec![Call::command("SelectAll"), Call::command("Outer")]
    );
}

#[test]
fn test_dispatch_while_draining_stays_behind_queue() {
    let harness = Harness::new();
    let frame = harness.main_frame();
    frame.bind(harness.record(1, 1)).unwrap();

    let inner = Arc::clone(&frame);
    frame.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
        remote.send_command("First");
        inner.dispatch(custom("Nested"));
    }));
    frame.dispatch(custom("Second"));

    frame.attach().unwrap();

    assert_eq!(frame.pending_actions(), 0);
    assert_eq!(
        harness.remote.calls(),
        vec![
            Call::command("First"),
            Call::command("Second"),
            Call::command("Nested"),
        ]
    );
}

#[test]
fn test_owner_thread_drives_frame() {
    let owner = OwnerThread::spawn(&RunnerConfig::default()).unwrap();
    let browser = Arc::new(MockBrowser::default());
    let remote = MockRemote::new();
    let record = MockRecord::new(1, 1, None, Some(remote.clone()));
    let frame = FrameHost::new(session(&browser), owner.runner(), true, FrameId::INVALID);

    let (tx, rx) = mpsc::channel();
    let setup = Arc::clone(&frame);
    assert!(owner.runner().post(move || {
        let result = setup.bind(record).and_then(|_| setup.attach());
        tx.send(result).unwrap();
    }));
    rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();

    frame.copy();
    frame.execute_javascript("run()", "https://example.com/app.js", 3);

    // Shutdown drains everything posted before it.
    owner.shutdown();
    assert_eq!(
        remote.calls(),
        vec![
            Call::command("Copy"),
            Call::JavaScript {
                code: "run()".to_string(),
                script_url: "https://example.com/app.js".to_string(),
                start_line: 3,
            },
        ]
    );
    assert_eq!(frame.lifecycle(), Lifecycle::Attached);
}
