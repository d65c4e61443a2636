//! Transfer channels.
//!
//! Each channel moves a [`TransferDocument`](taskmaster_core::TransferDocument)
//! through one medium and knows nothing about the store; applying a
//! decoded document is the controller's job.

mod file;
mod text;
mod visual;

pub use file::FileChannel;
pub use text::TextChannel;
pub use visual::{ScanEvent, ScanSession, VisualCodeChannel};
