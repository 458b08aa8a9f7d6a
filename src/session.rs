//! Session state and event handling.
//!
//! Single source of truth for the live session. All mutation happens inside
//! `handle_event`/`handle_command` on the loop thread; capture and export
//! work is requested over channels and comes back as [`SessionEvent`]s.

use std::mem;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use image::RgbaImage;
use log::debug;

use crate::config::Config;
use crate::export::SnapshotJob;
use crate::filter::FilterKind;
use crate::metrics::FrameMetrics;
use crate::rasterize;
use crate::render::{self, RenderMode};
use crate::source::{DeviceInfo, SourceError};
use crate::worker::{CaptureRequest, ExportRequest, SessionEvent};

/// Rows reserved for the header and footer around the art.
pub const CHROME_ROWS: u16 = 4;

/// How long an async-completion status stays on screen.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Discrete commands dispatched by the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Snapshot,
    ToggleRecording,
    CycleMode,
    CycleFilter,
    SwitchDevice,
    ToggleHelp,
    Quit,
}

/// Live session state, owned by the event loop.
pub struct Session {
    pub mode: RenderMode,
    pub filter: FilterKind,
    width: u16,
    height: u16,

    current_frame: Option<RgbaImage>,
    /// Cached render of the current frame at the current settings.
    pub rendered: Option<String>,

    pub recording: bool,
    rec_frames: Vec<RgbaImage>,
    pub rec_start: Option<Instant>,

    pub devices: Vec<DeviceInfo>,
    pub current_device: usize,

    pub status: String,
    pub status_is_error: bool,
    status_deadline: Option<Instant>,

    pub last_error: Option<SourceError>,
    pub show_help: bool,
    pub should_quit: bool,

    pub metrics: FrameMetrics,

    capture_tx: Sender<CaptureRequest>,
    export_tx: Sender<ExportRequest>,
}

impl Session {
    pub fn new(
        config: &Config,
        devices: Vec<DeviceInfo>,
        capture_tx: Sender<CaptureRequest>,
        export_tx: Sender<ExportRequest>,
    ) -> Self {
        Self {
            mode: config.render.default_mode,
            filter: config.render.default_filter,
            width: 0,
            height: 0,
            current_frame: None,
            rendered: None,
            recording: false,
            rec_frames: Vec::new(),
            rec_start: None,
            devices,
            current_device: 0,
            status: String::new(),
            status_is_error: false,
            status_deadline: None,
            last_error: None,
            show_help: false,
            should_quit: false,
            metrics: FrameMetrics::new(),
            capture_tx,
            export_tx,
        }
    }

    /// Kick off the first stream-open cycle.
    pub fn start(&mut self) {
        self.set_status("Opening camera...");
        let _ = self.capture_tx.send(CaptureRequest::Open { device_id: None });
    }

    /// Viewport dimensions in character cells.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.refresh_view();
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Art rows available after the header/footer margin, at least 1.
    fn view_rows(&self) -> u32 {
        self.height.saturating_sub(CHROME_ROWS).max(1) as u32
    }

    /// Number of frames captured so far in the active recording.
    pub fn recorded_frames(&self) -> usize {
        self.rec_frames.len()
    }

    /// Handle one event posted by a worker.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::StreamReady { device_id } => {
                // The explicit retry path succeeded; drop the error screen.
                self.last_error = None;
                let label = device_id
                    .as_deref()
                    .and_then(|id| self.device_label(id))
                    .map(|label| format!("Camera ready ({label})"))
                    .unwrap_or_else(|| "Camera ready".to_string());
                self.set_status(label);
                let _ = self.capture_tx.send(CaptureRequest::ReadFrame);
            }
            SessionEvent::Frame(frame) => {
                self.metrics.record_frame(Instant::now());
                self.process_frame(frame);
                // The pull loop is self-perpetuating: every delivered frame
                // immediately requests the next one.
                let _ = self.capture_tx.send(CaptureRequest::ReadFrame);
            }
            SessionEvent::SourceFailed(err) => {
                debug!("source failed: {err}");
                self.last_error = Some(err);
            }
            SessionEvent::Status(text) => self.set_transient_status(text, false),
            SessionEvent::StatusError(text) => self.set_transient_status(text, true),
        }
    }

    /// Handle one command from the display surface.
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Snapshot => self.snapshot(),
            Command::ToggleRecording => self.toggle_recording(),
            Command::CycleMode => {
                self.mode = self.mode.next();
                self.refresh_view();
            }
            Command::CycleFilter => {
                self.filter = self.filter.next();
                self.refresh_view();
            }
            Command::SwitchDevice => self.switch_device(),
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::Quit => {
                self.should_quit = true;
                let _ = self.capture_tx.send(CaptureRequest::Close);
            }
        }
    }

    /// Clear an expired transient status.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.status_deadline {
            if now >= deadline {
                self.status.clear();
                self.status_is_error = false;
                self.status_deadline = None;
            }
        }
    }

    fn device_label(&self, id: &str) -> Option<String> {
        self.devices
            .iter()
            .find(|dev| dev.id == id)
            .map(|dev| dev.label.clone())
    }

    /// Sticky status: stays until replaced.
    fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
        self.status_is_error = false;
        self.status_deadline = None;
    }

    /// Transient status from a completed async operation; expires after
    /// [`STATUS_TTL`] unless replaced first.
    fn set_transient_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = text.into();
        self.status_is_error = is_error;
        self.status_deadline = Some(Instant::now() + STATUS_TTL);
    }

    /// Store a delivered frame, refresh the cached view, and append the
    /// processed frame to the recording buffer when recording.
    fn process_frame(&mut self, frame: RgbaImage) {
        let (mode, filter) = (self.mode, self.filter);
        let (width, rows) = (self.width as u32, self.view_rows());

        {
            // The filter pass runs once and feeds both the display render
            // and the recording render.
            let filtered = filter.apply(&frame);
            self.rendered = Some(render::render_view(
                filtered.as_ref(),
                width,
                rows,
                mode,
                true,
            ));
            if self.recording {
                let processed = if mode.is_text() {
                    let text =
                        render::render_view(filtered.as_ref(), width, rows, mode, false);
                    rasterize::text_to_image(&text)
                } else {
                    filtered.into_owned()
                };
                self.rec_frames.push(processed);
            }
        }
        self.current_frame = Some(frame);
    }

    /// Re-render the cached view after a mode, filter, or viewport change.
    fn refresh_view(&mut self) {
        let (mode, filter) = (self.mode, self.filter);
        let (width, rows) = (self.width as u32, self.view_rows());
        if let Some(frame) = &self.current_frame {
            let filtered = filter.apply(frame);
            self.rendered = Some(render::render_view(
                filtered.as_ref(),
                width,
                rows,
                mode,
                true,
            ));
        }
    }

    fn snapshot(&mut self) {
        let Some(frame) = self.current_frame.clone() else {
            self.set_transient_status("No frame to capture yet", false);
            return;
        };
        let job = SnapshotJob {
            frame,
            mode: self.mode,
            filter: self.filter,
            width: self.width as u32,
            height: self.view_rows(),
        };
        let _ = self.export_tx.send(ExportRequest::Snapshot(job));
    }

    fn toggle_recording(&mut self) {
        self.recording = !self.recording;
        if self.recording {
            self.rec_frames = Vec::new();
            self.rec_start = Some(Instant::now());
            self.set_status("Recording...");
        } else {
            self.rec_start = None;
            let frames = mem::take(&mut self.rec_frames);
            if frames.is_empty() {
                // Nothing captured; drop the recording status silently.
                self.set_status("");
            } else {
                self.set_status(format!("Encoding {} frames...", frames.len()));
                let _ = self.export_tx.send(ExportRequest::Clip { frames });
            }
        }
    }

    fn switch_device(&mut self) {
        if self.devices.len() > 1 {
            self.current_device = (self.current_device + 1) % self.devices.len();
            let device = self.devices[self.current_device].clone();
            self.set_status(format!("Switching to {}", device.label));
            let _ = self.capture_tx.send(CaptureRequest::Open {
                device_id: Some(device.id),
            });
        } else {
            self.set_status("No other video devices");
        }
    }
}
