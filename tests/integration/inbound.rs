//! Integration tests for renderer-originated events
//!
//! Tests cover:
//! - Inbound process messages
//! - Draggable region updates
//! - Load completion

use crate::integration::test_utils::{Harness, MockClient, MockDragHandler, ReceivedMessage};
use framehost::browser::{DraggableRegion, Rect};
use framehost::{FrameId, ProcessId};
use serde_json::json;
use std::sync::Arc;

fn harness_with_client() -> (Harness, Arc<MockClient>, Arc<MockDragHandler>) {
    let harness = Harness::new();
    let drag_handler = Arc::new(MockDragHandler::default());
    let client = Arc::new(MockClient {
        drag_handler: Some(Arc::clone(&drag_handler)),
        ..MockClient::default()
    });
    harness.browser.set_client(Arc::clone(&client));
    (harness, client, drag_handler)
}

#[test]
fn test_receive_message_delivers_read_only_view() {
    let (harness, client, _) = harness_with_client();
    let frame = harness.attached_main_frame();

    frame.receive_message("pong", vec![json!({ "ok": true })]);

    assert_eq!(
        *client.messages.lock(),
        vec![ReceivedMessage {
            frame_id: FrameId::MAIN,
            source: ProcessId::Renderer,
            name: "pong".to_string(),
            arguments: Some(vec![json!({ "ok": true })]),
            read_only: true,
        }]
    );
}

#[test]
fn test_receive_message_without_client_is_ignored() {
    let harness = Harness::new();
    let frame = harness.attached_main_frame();

    frame.receive_message("pong", vec![]);

    assert!(harness.browser.client.lock().is_none());
}

#[test]
fn test_receive_message_after_detach_is_ignored() {
    let (harness, client, _) = harness_with_client();
    let frame = harness.attached_main_frame();
    frame.detach().unwrap();

    frame.receive_message("late", vec![json!(1)]);

    assert!(client.messages.lock().is_empty());
}

#[test]
fn test_draggable_regions_forwarded_to_handler() {
    let (harness, _client, drag_handler) = harness_with_client();
    let (frame, record) = harness.attached_child_frame(2);
    let regions = vec![
        DraggableRegion {
            bounds: Rect::new(0, 0, 200, 30),
            draggable: true,
        },
        DraggableRegion {
            bounds: Rect::new(150, 0, 50, 30),
            draggable: false,
        },
    ];

    frame.update_draggable_regions(Some(regions.clone()));
    frame.update_draggable_regions(None);

    assert_eq!(
        *drag_handler.updates.lock(),
        vec![(record.frame_id(), regions), (record.frame_id(), Vec::new())]
    );
}

#[test]
fn test_draggable_regions_without_handler_are_ignored() {
    let harness = Harness::new();
    harness.browser.set_client(Arc::new(MockClient::default()));
    let frame = harness.attached_main_frame();

    frame.update_draggable_regions(Some(vec![DraggableRegion {
        bounds: Rect::new(0, 0, 10, 10),
        draggable: true,
    }]));
}

#[test]
fn test_did_finish_load_reported_to_browser() {
    let harness = Harness::new();
    let (frame, record) = harness.attached_child_frame(2);

    frame.did_finish_frame_load("https://example.com/done", 200);

    assert_eq!(
        *harness.browser.finished_loads.lock(),
        vec![(record.frame_id(), "https://example.com/done".to_string(), 200)]
    );
}
