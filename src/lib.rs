//! Glyphcam - Terminal Camera Studio
//!
//! A TUI application that renders a live camera stream as ASCII, ANSI, or
//! edge art, with snapshot and animated GIF capture.

pub mod config;
pub mod export;
pub mod filter;
pub mod input;
pub mod metrics;
pub mod rasterize;
pub mod render;
pub mod session;
pub mod source;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use filter::FilterKind;
pub use render::RenderMode;
pub use session::{Command, Session};
pub use source::{DeviceInfo, FrameSource, FrameStream, SourceError};
