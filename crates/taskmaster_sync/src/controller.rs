//! Sync controller: the state machine behind the sync dialog.

use crate::channel::{FileChannel, ScanEvent, ScanSession, TextChannel, VisualCodeChannel};
use crate::config::{InvalidCodePolicy, SyncConfig};
use crate::device::{Camera, Clipboard, CodeRenderer, Frame, FrameDecoder, VisualCode};
use crate::error::{SyncError, SyncResult};
use crate::state::{ImportSource, SyncState, SyncStats};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskmaster_core::{EntityStore, SnapshotCounts, TransferDocument};
use tracing::{debug, info, warn};

/// Orchestrates the transfer channels against one store.
///
/// Only one transport operation runs at a time. A request made while
/// another is running is ignored: it returns `Ok(None)` (or `false`) and
/// leaves the state untouched. Failures move the controller to
/// [`SyncState::Error`] with a user-facing message; no failure changes the
/// store.
pub struct SyncController {
    store: Arc<EntityStore>,
    config: SyncConfig,
    files: FileChannel,
    text: TextChannel,
    visual: VisualCodeChannel,
    state: RwLock<SyncState>,
    session: Mutex<Option<ScanSession>>,
    last_scan_error: RwLock<Option<String>>,
    stats: RwLock<SyncStats>,
}

impl SyncController {
    /// Creates a controller for `store`, scanning frames with `decoder`.
    pub fn new(store: Arc<EntityStore>, decoder: Arc<dyn FrameDecoder>, config: SyncConfig) -> Self {
        Self {
            store,
            files: FileChannel::from_config(&config),
            text: TextChannel::new(),
            visual: VisualCodeChannel::new(decoder),
            config,
            state: RwLock::new(SyncState::Idle),
            session: Mutex::new(None),
            last_scan_error: RwLock::new(None),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SyncState {
        self.state.read().clone()
    }

    /// Returns activity counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the store being synced.
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Message for the most recent invalid code seen in the running scan.
    pub fn last_scan_error(&self) -> Option<String> {
        self.last_scan_error.read().clone()
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Writes a backup file into `dir`.
    ///
    /// The controller returns to `Idle` whether or not the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn export_to_file(&self, dir: &Path) -> SyncResult<Option<PathBuf>> {
        if !self.try_begin(SyncState::Exporting, SyncState::can_start) {
            return Ok(None);
        }

        let result = self
            .files
            .export_to_file(&self.store.snapshot(), dir);
        self.set_state(SyncState::Idle);

        match result {
            Ok(path) => {
                self.stats.write().exports += 1;
                Ok(Some(path))
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.stats.write().last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Writes a backup file into the configured export directory.
    ///
    /// # Errors
    ///
    /// See [`export_to_file`](Self::export_to_file).
    pub fn export(&self) -> SyncResult<Option<PathBuf>> {
        let dir = self.config.export_dir.clone();
        self.export_to_file(&dir)
    }

    // ========================================================================
    // Codes
    // ========================================================================

    /// Encodes the current snapshot and shows it as `CodeReady`.
    ///
    /// # Errors
    ///
    /// Returns `Codec` if encoding fails; the controller moves to `Error`.
    pub fn generate_code(&self) -> SyncResult<Option<String>> {
        if !self.try_begin(SyncState::GeneratingCode, SyncState::can_start) {
            return Ok(None);
        }

        match self.text.generate_code(&self.store.snapshot()) {
            Ok(code) => {
                self.stats.write().codes_generated += 1;
                self.set_state(SyncState::CodeReady(code.clone()));
                Ok(Some(code))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Hides the generated code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` while an operation is running.
    pub fn close_code(&self) -> SyncResult<()> {
        let mut state = self.state.write();
        match &*state {
            SyncState::CodeReady(_) => {
                *state = SyncState::Idle;
                Ok(())
            }
            SyncState::Idle => Ok(()),
            other => Err(SyncError::InvalidStateTransition {
                from: other.to_string(),
                to: SyncState::Idle.to_string(),
            }),
        }
    }

    /// Copies the generated code to the clipboard. Returns false when no
    /// code is on display or the clipboard refused it.
    pub fn copy_code(&self, clipboard: &dyn Clipboard) -> bool {
        match self.state() {
            SyncState::CodeReady(code) => self.text.copy_to_clipboard(&code, clipboard),
            _ => false,
        }
    }

    /// Renders the generated code as a visual code. Returns `None` when no
    /// code is on display.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the renderer refuses the code. The code stays on
    /// display.
    pub fn render_code(&self, renderer: &dyn CodeRenderer) -> SyncResult<Option<VisualCode>> {
        match self.state() {
            SyncState::CodeReady(code) => self.visual.render(&code, renderer).map(Some),
            _ => Ok(None),
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// Imports backup file contents.
    ///
    /// Returns the new store counts on success.
    ///
    /// # Errors
    ///
    /// Returns `ImportParse` if the bytes are not a valid document; the
    /// store is unchanged and the controller moves to `Error`.
    pub fn import_file_bytes(&self, bytes: &[u8]) -> SyncResult<Option<SnapshotCounts>> {
        self.run_import(ImportSource::File, SyncState::can_start, || {
            self.files.import_from_bytes(bytes)
        })
    }

    /// Imports a backup file.
    ///
    /// # Errors
    ///
    /// Returns `ImportRead` or `ImportParse`; see
    /// [`import_file_bytes`](Self::import_file_bytes).
    pub fn import_file_path(&self, path: &Path) -> SyncResult<Option<SnapshotCounts>> {
        self.run_import(ImportSource::File, SyncState::can_start, || {
            self.files.import_from_path(path)
        })
    }

    /// Imports a pasted sync code. Accepted while idle or while a generated
    /// code is on display.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the code is invalid; the store is unchanged and
    /// the controller moves to `Error`.
    pub fn import_code(&self, code: &str) -> SyncResult<Option<SnapshotCounts>> {
        self.run_import(ImportSource::Code, SyncState::can_accept_paste, || {
            self.text.accept_pasted(code)
        })
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    /// Starts a camera scan. Returns false if another operation is running.
    ///
    /// # Errors
    ///
    /// Returns `CameraAccess` if the camera cannot be started; the
    /// controller moves to `Error`.
    pub fn begin_scan(&self, camera: Box<dyn Camera>) -> SyncResult<bool> {
        if !self.try_begin(SyncState::Scanning, SyncState::can_start) {
            return Ok(false);
        }
        *self.last_scan_error.write() = None;

        match self.visual.begin_scan(camera) {
            Ok(session) => {
                *self.session.lock() = Some(session);
                Ok(true)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Feeds one camera frame to the running scan.
    ///
    /// A valid code replaces the store's collections and ends the scan.
    /// An invalid code is handled per the configured
    /// [`InvalidCodePolicy`].
    pub fn process_frame(&self, frame: &Frame) -> ScanEvent {
        let mut slot = self.session.lock();
        let Some(session) = slot.as_mut() else {
            return ScanEvent::Inactive;
        };

        let event = session.process_frame(frame);
        match &event {
            ScanEvent::Detected(document) => {
                *slot = None;
                drop(slot);
                self.apply(document.clone());
                self.set_state(SyncState::Idle);
            }
            ScanEvent::Rejected(err) => {
                let message = err.user_message().to_string();
                {
                    let mut stats = self.stats.write();
                    stats.rejected_codes += 1;
                    stats.last_error = Some(err.to_string());
                }
                match self.config.invalid_code_policy {
                    InvalidCodePolicy::KeepScanning => {
                        *self.last_scan_error.write() = Some(message);
                    }
                    InvalidCodePolicy::Abort => {
                        *slot = None;
                        drop(slot);
                        self.set_state(SyncState::Error(message));
                    }
                }
            }
            ScanEvent::NoCode | ScanEvent::Inactive => {}
        }
        event
    }

    /// Stops the camera and returns to `Idle`. Safe to call at any time.
    pub fn cancel_scan(&self) {
        let session = self.session.lock().take();
        if let Some(mut session) = session {
            session.end_scan();
        }

        let mut state = self.state.write();
        if *state == SyncState::Scanning {
            *state = SyncState::Idle;
            debug!("scan cancelled");
        }
    }

    /// Returns true while a camera session is open.
    pub fn is_scanning(&self) -> bool {
        self.session.lock().as_ref().is_some_and(ScanSession::is_active)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Clears an error. Returns false if there was none.
    pub fn dismiss_error(&self) -> bool {
        let mut state = self.state.write();
        if matches!(*state, SyncState::Error(_)) {
            *state = SyncState::Idle;
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Moves to `next` if `allowed` accepts the current state.
    fn try_begin(&self, next: SyncState, allowed: fn(&SyncState) -> bool) -> bool {
        let mut state = self.state.write();
        if !allowed(&state) {
            debug!(current = state.name(), requested = next.name(), "ignoring request while busy");
            self.stats.write().ignored_requests += 1;
            return false;
        }
        debug!(from = state.name(), to = next.name(), "sync state");
        *state = next;
        true
    }

    fn set_state(&self, next: SyncState) {
        let mut state = self.state.write();
        debug!(from = state.name(), to = next.name(), "sync state");
        *state = next;
    }

    /// Records a failure, moves to `Error` and hands the error back.
    fn fail(&self, err: SyncError) -> SyncError {
        warn!(error = %err, "sync operation failed");
        self.stats.write().last_error = Some(err.to_string());
        self.set_state(SyncState::Error(err.user_message().to_string()));
        err
    }

    fn run_import(
        &self,
        source: ImportSource,
        allowed: fn(&SyncState) -> bool,
        parse: impl FnOnce() -> SyncResult<TransferDocument>,
    ) -> SyncResult<Option<SnapshotCounts>> {
        if !self.try_begin(SyncState::Importing(source), allowed) {
            return Ok(None);
        }

        match parse() {
            Ok(document) => {
                self.apply(document);
                self.set_state(SyncState::Idle);
                Ok(Some(self.store.counts()))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn apply(&self, document: TransferDocument) {
        self.store.replace_collections(document);
        self.stats.write().imports += 1;
        info!("imported document");
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{MemoryClipboard, MockCamera, MockFrameDecoder, TextRenderer};
    use taskmaster_core::{Priority, Todo};

    fn controller() -> SyncController {
        let store = Arc::new(EntityStore::in_memory());
        SyncController::new(store, Arc::new(MockFrameDecoder::new()), SyncConfig::default())
    }

    #[test]
    fn generate_copy_close() {
        let controller = controller();
        controller
            .store()
            .add(Todo::new("buy milk", Priority::Low))
            .unwrap();

        let code = controller.generate_code().unwrap().unwrap();
        assert_eq!(controller.state(), SyncState::CodeReady(code.clone()));

        let clipboard = MemoryClipboard::new();
        assert!(controller.copy_code(&clipboard));
        assert_eq!(clipboard.contents(), Some(code.clone()));
        let visual = controller.render_code(&TextRenderer::new()).unwrap().unwrap();
        assert_eq!(visual.payload, code);

        controller.close_code().unwrap();
        assert_eq!(controller.state(), SyncState::Idle);
        assert!(!controller.copy_code(&clipboard));
    }

    #[test]
    fn paste_is_accepted_while_code_is_shown() {
        let controller = controller();
        let source = EntityStore::in_memory();
        source.load_sample_data();
        let code = TextChannel::new().generate_code(&source.snapshot()).unwrap();

        controller.generate_code().unwrap();
        let counts = controller.import_code(&code).unwrap().unwrap();
        assert_eq!(counts.projects, 3);
        assert_eq!(controller.state(), SyncState::Idle);
    }

    #[test]
    fn invalid_code_moves_to_error_and_keeps_store() {
        let controller = controller();
        controller.store().load_sample_data();
        let before = controller.store().snapshot();

        let err = controller.import_code("definitely not base64!").unwrap_err();
        assert!(matches!(err, SyncError::Decode { .. }));
        assert_eq!(
            controller.state(),
            SyncState::Error("Invalid sync code. Please check and try again.".into())
        );
        assert_eq!(controller.store().snapshot(), before);

        assert!(controller.generate_code().unwrap().is_none());
        assert!(controller.dismiss_error());
        assert!(!controller.dismiss_error());
        assert_eq!(controller.state(), SyncState::Idle);
    }

    #[test]
    fn requests_are_ignored_while_scanning() {
        let controller = controller();
        assert!(controller.begin_scan(Box::new(MockCamera::new())).unwrap());

        assert!(!controller.begin_scan(Box::new(MockCamera::new())).unwrap());
        assert!(controller.generate_code().unwrap().is_none());
        assert!(controller.import_file_bytes(b"{}").unwrap().is_none());
        assert!(controller.close_code().is_err());
        assert_eq!(controller.state(), SyncState::Scanning);
        assert_eq!(controller.stats().ignored_requests, 3);

        controller.cancel_scan();
        controller.cancel_scan();
        assert_eq!(controller.state(), SyncState::Idle);
    }

    #[test]
    fn abort_policy_ends_scan_on_invalid_code() {
        let store = Arc::new(EntityStore::in_memory());
        let controller = SyncController::new(
            store,
            Arc::new(MockFrameDecoder::new()),
            SyncConfig::default().with_invalid_code_policy(InvalidCodePolicy::Abort),
        );
        let camera = MockCamera::new();
        let monitor = camera.monitor();
        controller.begin_scan(Box::new(camera)).unwrap();

        let event = controller.process_frame(&Frame::with_payload("not a sync code"));
        assert!(matches!(event, ScanEvent::Rejected(_)));
        assert!(!monitor.is_active());
        assert_eq!(
            controller.state(),
            SyncState::Error("Invalid QR code. Please try again.".into())
        );
        assert!(matches!(
            controller.process_frame(&Frame::blank(2, 2)),
            ScanEvent::Inactive
        ));
    }

    #[test]
    fn dropping_controller_releases_camera() {
        let controller = controller();
        let camera = MockCamera::new();
        let monitor = camera.monitor();
        controller.begin_scan(Box::new(camera)).unwrap();
        assert!(controller.is_scanning());
        drop(controller);
        assert!(!monitor.is_active());
    }
}
