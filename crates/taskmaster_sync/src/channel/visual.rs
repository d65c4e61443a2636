//! Visual codes: rendering and camera scanning.

use crate::device::{Camera, CodeRenderer, Frame, FrameDecoder, VisualCode};
use crate::error::{ChannelKind, SyncError, SyncResult};
use std::fmt;
use std::sync::Arc;
use taskmaster_codec::decode;
use taskmaster_core::TransferDocument;
use tracing::{debug, info, warn};

/// Renders codes and opens scan sessions.
#[derive(Clone)]
pub struct VisualCodeChannel {
    decoder: Arc<dyn FrameDecoder>,
}

impl VisualCodeChannel {
    /// Creates a channel that reads frames with `decoder`.
    pub fn new(decoder: Arc<dyn FrameDecoder>) -> Self {
        Self { decoder }
    }

    /// Renders a sync code as a visual code.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the renderer refuses the text.
    pub fn render(&self, code: &str, renderer: &dyn CodeRenderer) -> SyncResult<VisualCode> {
        renderer.render_text_as_visual_code(code)
    }

    /// Starts the camera and returns a session that owns it.
    ///
    /// # Errors
    ///
    /// Returns `CameraAccess` if the camera cannot be started.
    pub fn begin_scan(&self, mut camera: Box<dyn Camera>) -> SyncResult<ScanSession> {
        camera.acquire()?;
        info!("scan session started");
        Ok(ScanSession {
            camera,
            decoder: Arc::clone(&self.decoder),
            active: true,
            last_rejected: None,
        })
    }
}

impl fmt::Debug for VisualCodeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualCodeChannel").finish_non_exhaustive()
    }
}

/// Outcome of examining one frame.
#[derive(Debug)]
pub enum ScanEvent {
    /// Nothing new in this frame. Also returned when the frame repeats the
    /// invalid code just reported.
    NoCode,
    /// A valid code was found. The session has ended and the camera is off.
    Detected(TransferDocument),
    /// A code was found but did not decode. Scanning may continue.
    Rejected(SyncError),
    /// The session has already ended; the frame was ignored.
    Inactive,
}

/// A live camera scan.
///
/// The camera is released when a valid code is found, on
/// [`end_scan`](Self::end_scan), or when the session is dropped, whichever
/// comes first.
pub struct ScanSession {
    camera: Box<dyn Camera>,
    decoder: Arc<dyn FrameDecoder>,
    active: bool,
    last_rejected: Option<String>,
}

impl ScanSession {
    /// Returns true until the session ends.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Examines one frame.
    pub fn process_frame(&mut self, frame: &Frame) -> ScanEvent {
        if !self.active {
            return ScanEvent::Inactive;
        }

        let Some(text) = self
            .decoder
            .scan_frame_for_text(frame)
            .filter(|text| !text.trim().is_empty())
        else {
            return ScanEvent::NoCode;
        };

        match decode(&text) {
            Ok(document) => {
                debug!(len = text.len(), "valid code in frame");
                self.end_scan();
                ScanEvent::Detected(document)
            }
            Err(source) => {
                if self.last_rejected.as_deref() == Some(text.as_str()) {
                    return ScanEvent::NoCode;
                }
                warn!(error = %source, "invalid code in frame");
                self.last_rejected = Some(text);
                ScanEvent::Rejected(SyncError::decode(ChannelKind::VisualCode, source))
            }
        }
    }

    /// Stops the camera. Calling it again does nothing.
    pub fn end_scan(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.camera.release();
        info!("scan session ended");
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.end_scan();
    }
}

impl fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSession")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
