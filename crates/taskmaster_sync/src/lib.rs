//! # Taskmaster Sync
//!
//! Moves a complete Taskmaster snapshot between devices.
//!
//! This crate provides:
//! - Three transfer channels: backup files, copy-and-paste text codes and
//!   camera-scanned visual codes
//! - Traits for the platform collaborators (camera, frame decoder, code
//!   renderer, clipboard) with mock implementations
//! - [`SyncController`], the state machine that runs one transfer at a time
//!
//! ## Architecture
//!
//! ```text
//! outbound: EntityStore::snapshot -> codec -> file | clipboard | visual code
//! inbound:  file | pasted text | camera frame -> codec -> replace_collections
//! ```
//!
//! Replication is single-writer and last-snapshot-wins: an import replaces
//! all four collections in one step. The display theme stays on the device.
//!
//! ## Key Invariants
//!
//! - Nothing reaches the store before it has been fully validated
//! - A camera acquired for a scan is always released: on detection, on
//!   cancel, or when the session or controller is dropped
//! - Requests made while another transfer runs are ignored
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use taskmaster_core::EntityStore;
//! use taskmaster_sync::{MockFrameDecoder, SyncConfig, SyncController, SyncState};
//!
//! let phone = Arc::new(EntityStore::in_memory());
//! phone.load_sample_data();
//! let phone_sync = SyncController::new(
//!     Arc::clone(&phone),
//!     Arc::new(MockFrameDecoder::new()),
//!     SyncConfig::default(),
//! );
//! let code = phone_sync.generate_code().unwrap().unwrap();
//!
//! let laptop = Arc::new(EntityStore::in_memory());
//! let laptop_sync = SyncController::new(
//!     Arc::clone(&laptop),
//!     Arc::new(MockFrameDecoder::new()),
//!     SyncConfig::default(),
//! );
//! laptop_sync.import_code(&code).unwrap();
//!
//! assert_eq!(laptop_sync.state(), SyncState::Idle);
//! assert_eq!(laptop.counts(), phone.counts());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod config;
mod controller;
mod device;
mod error;
mod state;

pub use channel::{FileChannel, ScanEvent, ScanSession, TextChannel, VisualCodeChannel};
pub use config::{InvalidCodePolicy, SyncConfig, DEFAULT_FILE_PREFIX};
pub use controller::SyncController;
pub use device::{
    Camera, CameraMonitor, Clipboard, CodeRenderer, Frame, FrameDecoder, MemoryClipboard,
    MockCamera, MockFrameDecoder, TextRenderer, VisualCode,
};
pub use error::{ChannelKind, SyncError, SyncResult};
pub use state::{ImportSource, SyncState, SyncStats};

/// Sync crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
