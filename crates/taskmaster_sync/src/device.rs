//! Hardware and platform collaborators.
//!
//! The camera, the visual-code decoder and encoder, and the clipboard are
//! provided by the host platform. They are injected through these traits;
//! the mock implementations below drive the tests and the command line.

use crate::error::{SyncError, SyncResult};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// One captured camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel data, format decided by the camera.
    pub data: Bytes,
}

impl Frame {
    /// Creates a frame.
    pub fn new(width: u32, height: u32, data: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// Creates an all-zero frame with no code in view.
    pub fn blank(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self::new(width, height, vec![0u8; len])
    }

    /// Creates a frame whose data is a text payload, as understood by
    /// [`MockFrameDecoder`].
    pub fn with_payload(text: &str) -> Self {
        let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
        Self::new(len, 1, Bytes::copy_from_slice(text.as_bytes()))
    }
}

/// A rendered visual code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualCode {
    /// The text the code carries.
    pub payload: String,
    /// Encoded image.
    pub image: Bytes,
    /// Media type of `image`.
    pub media_type: String,
}

/// A camera that can be switched on and off.
pub trait Camera: Send {
    /// Starts the camera.
    ///
    /// # Errors
    ///
    /// Returns `CameraAccess` when the device is missing or permission is
    /// denied.
    fn acquire(&mut self) -> SyncResult<()>;

    /// Stops the camera. Must be safe to call when already stopped.
    fn release(&mut self);

    /// Returns true while the camera is running.
    fn is_active(&self) -> bool;
}

/// Finds visual-code text in a frame.
pub trait FrameDecoder: Send + Sync {
    /// Returns the text of the first code found, if any.
    fn scan_frame_for_text(&self, frame: &Frame) -> Option<String>;
}

/// Turns text into a visual code.
pub trait CodeRenderer: Send + Sync {
    /// Renders `text` as a scannable image.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the text does not fit in a code.
    fn render_text_as_visual_code(&self, text: &str) -> SyncResult<VisualCode>;
}

/// System clipboard.
pub trait Clipboard: Send + Sync {
    /// Replaces the clipboard contents.
    ///
    /// # Errors
    ///
    /// Returns `Clipboard` if the platform refuses the write.
    fn set_text(&self, text: &str) -> SyncResult<()>;
}

// ============================================================================
// Mock implementations
// ============================================================================

#[derive(Debug, Default)]
struct CameraState {
    active: AtomicBool,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// A camera for tests.
///
/// Keep a [`CameraMonitor`] to observe the camera after it has been moved
/// into a scan session.
#[derive(Debug, Default)]
pub struct MockCamera {
    state: Arc<CameraState>,
    denial: Option<String>,
}

impl MockCamera {
    /// Creates a camera that starts successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a camera that refuses to start with `message`.
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            state: Arc::default(),
            denial: Some(message.into()),
        }
    }

    /// Returns a handle that observes this camera.
    pub fn monitor(&self) -> CameraMonitor {
        CameraMonitor {
            state: Arc::clone(&self.state),
        }
    }
}

impl Camera for MockCamera {
    fn acquire(&mut self) -> SyncResult<()> {
        if let Some(message) = &self.denial {
            return Err(SyncError::camera_access(message.clone()));
        }
        self.state.active.store(true, Ordering::SeqCst);
        self.state.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) {
        if self.state.active.swap(false, Ordering::SeqCst) {
            self.state.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }
}

/// Read-only view of a [`MockCamera`].
#[derive(Debug, Clone)]
pub struct CameraMonitor {
    state: Arc<CameraState>,
}

impl CameraMonitor {
    /// Returns true while the camera is running.
    pub fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Number of successful starts.
    pub fn acquire_count(&self) -> usize {
        self.state.acquired.load(Ordering::SeqCst)
    }

    /// Number of stops of a running camera.
    pub fn release_count(&self) -> usize {
        self.state.released.load(Ordering::SeqCst)
    }
}

/// A frame decoder for tests.
///
/// Scripted results are returned first, one per frame. After the script
/// runs out, a frame's data is read as the code text itself (see
/// [`Frame::with_payload`]); blank or non-UTF-8 frames carry no code.
#[derive(Debug, Default)]
pub struct MockFrameDecoder {
    script: Mutex<VecDeque<Option<String>>>,
    calls: AtomicUsize,
}

impl MockFrameDecoder {
    /// Creates a decoder that reads frame payloads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that replays `results` before reading payloads.
    pub fn scripted<I, S>(results: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(results.into_iter().map(|r| r.map(Into::into)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of frames examined.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameDecoder for MockFrameDecoder {
    fn scan_frame_for_text(&self, frame: &Frame) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(scripted) = self.script.lock().pop_front() {
            return scripted;
        }
        std::str::from_utf8(&frame.data)
            .ok()
            .map(|text| text.trim_matches(char::from(0)).trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// A clipboard held in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard that rejects every write.
    pub fn unavailable() -> Self {
        Self {
            contents: Mutex::new(None),
            unavailable: true,
        }
    }

    /// Returns the current contents.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> SyncResult<()> {
        if self.unavailable {
            return Err(SyncError::Clipboard("clipboard unavailable".into()));
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// Renders a "visual code" as its own text, for terminals and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    max_len: Option<usize>,
}

impl TextRenderer {
    /// Creates a renderer without a capacity limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer that rejects text longer than `max_len` bytes,
    /// like a real code with finite capacity.
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
        }
    }
}

impl CodeRenderer for TextRenderer {
    fn render_text_as_visual_code(&self, text: &str) -> SyncResult<VisualCode> {
        if let Some(max_len) = self.max_len {
            if text.len() > max_len {
                return Err(SyncError::Render(format!(
                    "{} bytes exceed code capacity of {max_len}",
                    text.len()
                )));
            }
        }
        Ok(VisualCode {
            payload: text.to_string(),
            image: Bytes::copy_from_slice(text.as_bytes()),
            media_type: "text/plain".into(),
        })
    }
}
