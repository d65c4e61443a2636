//! End-to-end transfers between stores.

use std::sync::Arc;
use taskmaster_codec::encode_snapshot;
use taskmaster_core::{ChangeKind, EntityStore, Priority, Theme, Todo};
use taskmaster_sync::{
    Frame, InvalidCodePolicy, MockCamera, MockFrameDecoder, ScanEvent, ScanSession, SyncConfig,
    SyncController, SyncError, SyncState, VisualCodeChannel,
};
use taskmaster_testkit::TestStore;
use tempfile::tempdir;

fn controller_for(store: &Arc<EntityStore>, decoder: MockFrameDecoder) -> SyncController {
    SyncController::new(Arc::clone(store), Arc::new(decoder), SyncConfig::default())
}

#[test]
fn file_round_trip_between_devices() {
    let dir = tempdir().unwrap();
    let source = TestStore::with_sample_data();
    source.store().set_theme(Theme::Dark);
    let source_sync = controller_for(source.store(), MockFrameDecoder::new());

    let path = source_sync.export_to_file(dir.path()).unwrap().unwrap();
    assert_eq!(source_sync.state(), SyncState::Idle);

    let target = TestStore::new();
    let target_sync = controller_for(target.store(), MockFrameDecoder::new());
    let counts = target_sync.import_file_path(&path).unwrap().unwrap();

    assert_eq!(counts, source.store().counts());
    assert_eq!(
        target.store().snapshot().to_document(),
        source.store().snapshot().to_document()
    );
    assert_eq!(target.store().theme(), Theme::Light);
}

#[test]
fn malformed_file_leaves_store_unchanged() {
    let target = TestStore::with_sample_data();
    let before = target.store().snapshot();
    let sync = controller_for(target.store(), MockFrameDecoder::new());

    let err = sync.import_file_bytes(br#"{"todos": "nope"}"#).unwrap_err();
    assert!(matches!(err, SyncError::ImportParse(_)));
    assert_eq!(target.store().snapshot(), before);
    assert_eq!(
        sync.state(),
        SyncState::Error("Failed to import data. Please check your file.".into())
    );
}

#[test]
fn buy_milk_code_round_trip() {
    let source = Arc::new(EntityStore::in_memory());
    source.mutate_todos(|todos| {
        let mut todo = Todo::new("buy milk", Priority::Low);
        todo.id = 1;
        todos.push(todo);
    });
    let code = controller_for(&source, MockFrameDecoder::new())
        .generate_code()
        .unwrap()
        .unwrap();

    let target = Arc::new(EntityStore::in_memory());
    controller_for(&target, MockFrameDecoder::new())
        .import_code(&code)
        .unwrap();

    assert_eq!(target.snapshot().todos, source.snapshot().todos);
    let json = serde_json::to_string(&target.snapshot().todos[0]).unwrap();
    assert!(!json.contains("dueDate"));
    assert!(!json.contains("projectId"));
}

#[test]
fn colliding_stored_ids_still_transfer() {
    let todos = br#"[
        {"id":1710000000000,"title":"buy milk","completed":false,"priority":"low"},
        {"id":1710000000000,"title":"call mom","completed":true,"priority":"high"}
    ]"#;
    let source = TestStore::with_stored([("todos", todos.to_vec())]);
    let stored = source.store().list::<Todo>();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id, stored[1].id);

    let code = controller_for(source.store(), MockFrameDecoder::new())
        .generate_code()
        .unwrap()
        .unwrap();
    let target = TestStore::new();
    controller_for(target.store(), MockFrameDecoder::new())
        .import_code(&code)
        .unwrap();

    assert_eq!(target.store().list::<Todo>(), stored);
}

#[test]
fn out_of_range_ids_are_not_imported() {
    let target = TestStore::new();
    let sync = controller_for(target.store(), MockFrameDecoder::new());

    let file = br#"{"todos":[{"id":9223372036854775807,"title":"x","completed":false,"priority":"low"}]}"#;
    let err = sync.import_file_bytes(file).unwrap_err();
    assert!(matches!(err, SyncError::ImportParse(_)));
    assert!(target.store().list::<Todo>().is_empty());
}

#[test]
fn third_frame_replaces_store_exactly_once() {
    let source = TestStore::with_sample_data();
    let code = encode_snapshot(&source.store().snapshot()).unwrap();

    let target = Arc::new(EntityStore::in_memory());
    let events = target.subscribe();
    let decoder = MockFrameDecoder::scripted([None, Some("garbage"), Some(code.as_str())]);
    let sync = controller_for(&target, decoder);

    let camera = MockCamera::new();
    let monitor = camera.monitor();
    assert!(sync.begin_scan(Box::new(camera)).unwrap());

    let frame = Frame::blank(4, 4);
    assert!(matches!(sync.process_frame(&frame), ScanEvent::NoCode));
    assert!(matches!(sync.process_frame(&frame), ScanEvent::Rejected(_)));
    assert_eq!(sync.state(), SyncState::Scanning);
    assert_eq!(
        sync.last_scan_error().as_deref(),
        Some("Invalid QR code. Please try again.")
    );
    assert!(matches!(sync.process_frame(&frame), ScanEvent::Detected(_)));

    let replacements = events
        .try_iter()
        .filter(|e| e.kind == ChangeKind::Replaced)
        .count();
    assert_eq!(replacements, 1);
    assert!(!monitor.is_active());
    assert_eq!(monitor.release_count(), 1);
    assert_eq!(sync.state(), SyncState::Idle);
    assert_eq!(target.counts(), source.store().counts());

    assert!(matches!(sync.process_frame(&frame), ScanEvent::Inactive));
}

#[test]
fn end_scan_without_session_is_noop() {
    let store = Arc::new(EntityStore::in_memory());
    let sync = controller_for(&store, MockFrameDecoder::new());
    sync.cancel_scan();
    assert_eq!(sync.state(), SyncState::Idle);

    let channel = VisualCodeChannel::new(Arc::new(MockFrameDecoder::new()));
    let camera = MockCamera::new();
    let monitor = camera.monitor();
    let mut session: ScanSession = channel.begin_scan(Box::new(camera)).unwrap();
    session.end_scan();
    session.end_scan();
    assert_eq!(monitor.release_count(), 1);
}

#[test]
fn camera_failure_is_recoverable() {
    let store = Arc::new(EntityStore::in_memory());
    let sync = controller_for(&store, MockFrameDecoder::new());

    let err = sync
        .begin_scan(Box::new(MockCamera::denied("permission denied")))
        .unwrap_err();
    assert!(matches!(err, SyncError::CameraAccess(_)));
    assert_eq!(
        sync.state(),
        SyncState::Error("Camera access failed. Please check permissions and try again.".into())
    );

    assert!(sync.dismiss_error());
    assert!(sync.begin_scan(Box::new(MockCamera::new())).unwrap());
    sync.cancel_scan();
    assert_eq!(sync.state(), SyncState::Idle);
}

#[test]
fn abort_policy_reports_error() {
    let store = Arc::new(EntityStore::in_memory());
    let sync = SyncController::new(
        Arc::clone(&store),
        Arc::new(MockFrameDecoder::new()),
        SyncConfig::default().with_invalid_code_policy(InvalidCodePolicy::Abort),
    );
    sync.begin_scan(Box::new(MockCamera::new())).unwrap();
    assert!(matches!(
        sync.process_frame(&Frame::with_payload("%%%")),
        ScanEvent::Rejected(_)
    ));
    assert!(matches!(sync.state(), SyncState::Error(_)));
    assert!(!sync.is_scanning());
}
