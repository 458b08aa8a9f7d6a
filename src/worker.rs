//! Background worker threads.
//!
//! Two dedicated workers keep the event loop non-blocking: the capture
//! worker owns the open frame stream and serves read requests; the export
//! worker encodes snapshots and clips. Both post completion events back on a
//! single channel drained by the main loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::RgbaImage;
use log::{debug, warn};

use crate::export::{self, SnapshotJob};
use crate::source::{FrameSource, FrameStream, SourceError};

/// Requests served by the capture worker.
#[derive(Debug)]
pub enum CaptureRequest {
    /// Open a stream, replacing (and closing) any previous one.
    Open { device_id: Option<String> },
    /// Read one frame from the open stream.
    ReadFrame,
    /// Release the stream without shutting the worker down.
    Close,
    /// Shutdown signal.
    Shutdown,
}

/// Requests served by the export worker.
pub enum ExportRequest {
    Snapshot(SnapshotJob),
    Clip { frames: Vec<RgbaImage> },
    /// Shutdown signal.
    Shutdown,
}

/// Events posted back to the session loop by the workers.
#[derive(Debug)]
pub enum SessionEvent {
    /// A stream is open and delivering; carries the requested device id.
    StreamReady { device_id: Option<String> },
    /// One frame was read.
    Frame(RgbaImage),
    /// Enumeration/open/read failure; surfaced as the full-screen error.
    SourceFailed(SourceError),
    /// A completed operation reports a short human-readable status.
    Status(String),
    /// A failed operation reports a status shown in the error style.
    StatusError(String),
}

/// Handle to the worker threads and their channels.
pub struct WorkerHandle {
    pub capture_tx: Sender<CaptureRequest>,
    pub export_tx: Sender<ExportRequest>,
    pub events_rx: Receiver<SessionEvent>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Shut down both workers and wait for them to finish.
    pub fn shutdown(self) {
        let _ = self.capture_tx.send(CaptureRequest::Shutdown);
        let _ = self.export_tx.send(ExportRequest::Shutdown);
        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

/// Spawn the capture and export workers.
///
/// `export_dir` overrides the default pictures-directory target when set.
pub fn spawn_workers(
    source: Arc<dyn FrameSource>,
    export_dir: Option<PathBuf>,
) -> WorkerHandle {
    let (capture_tx, capture_rx) = unbounded::<CaptureRequest>();
    let (export_tx, export_rx) = unbounded::<ExportRequest>();
    let (events_tx, events_rx) = unbounded::<SessionEvent>();

    let mut threads = Vec::new();

    let tx = events_tx.clone();
    threads.push(
        thread::Builder::new()
            .name("capture-worker".to_string())
            .spawn(move || capture_loop(source, capture_rx, tx))
            .expect("failed to spawn capture worker"),
    );

    threads.push(
        thread::Builder::new()
            .name("export-worker".to_string())
            .spawn(move || export_loop(export_rx, events_tx, export_dir))
            .expect("failed to spawn export worker"),
    );

    WorkerHandle {
        capture_tx,
        export_tx,
        events_rx,
        threads,
    }
}

fn capture_loop(
    source: Arc<dyn FrameSource>,
    rx: Receiver<CaptureRequest>,
    tx: Sender<SessionEvent>,
) {
    let mut stream: Option<Box<dyn FrameStream>> = None;

    while let Ok(request) = rx.recv() {
        match request {
            CaptureRequest::Open { device_id } => {
                if let Some(mut old) = stream.take() {
                    old.close();
                }
                match source.open(device_id.as_deref()) {
                    Ok(new_stream) => {
                        stream = Some(new_stream);
                        let _ = tx.send(SessionEvent::StreamReady { device_id });
                    }
                    Err(err) => {
                        warn!("failed to open stream: {err}");
                        let _ = tx.send(SessionEvent::SourceFailed(err));
                    }
                }
            }
            CaptureRequest::ReadFrame => match stream.as_mut() {
                Some(active) => match active.read_frame() {
                    Ok(frame) => {
                        let _ = tx.send(SessionEvent::Frame(frame));
                    }
                    Err(err) => {
                        warn!("frame read failed: {err}");
                        let _ = tx.send(SessionEvent::SourceFailed(err));
                    }
                },
                // Reads that race a close are dropped, not errors.
                None => debug!("read request with no open stream"),
            },
            CaptureRequest::Close => {
                if let Some(mut old) = stream.take() {
                    old.close();
                }
            }
            CaptureRequest::Shutdown => break,
        }
    }

    if let Some(mut old) = stream.take() {
        old.close();
    }
    debug!("capture worker stopped");
}

fn export_loop(
    rx: Receiver<ExportRequest>,
    tx: Sender<SessionEvent>,
    export_dir: Option<PathBuf>,
) {
    while let Ok(request) = rx.recv() {
        match request {
            ExportRequest::Snapshot(job) => {
                let event = export::output_dir(export_dir.as_deref())
                    .and_then(|dir| export::save_snapshot(&job, &dir))
                    .map(|name| SessionEvent::Status(format!("Saved {name}")))
                    .unwrap_or_else(|err| {
                        warn!("snapshot failed: {err}");
                        SessionEvent::StatusError(format!("Snapshot failed: {err}"))
                    });
                let _ = tx.send(event);
            }
            ExportRequest::Clip { frames } => {
                let result = export::output_dir(export_dir.as_deref())
                    .and_then(|dir| export::save_clip(&frames, &dir));
                match result {
                    // Empty recordings signal nothing.
                    Ok(None) => {}
                    Ok(Some(name)) => {
                        let _ = tx.send(SessionEvent::Status(format!("Saved clip {name}")));
                    }
                    Err(err) => {
                        warn!("clip export failed: {err}");
                        let _ =
                            tx.send(SessionEvent::StatusError(format!("Clip failed: {err}")));
                    }
                }
            }
            ExportRequest::Shutdown => break,
        }
    }
    debug!("export worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;
    use std::time::Duration;

    fn test_workers(dir: Option<PathBuf>) -> WorkerHandle {
        let source = Arc::new(SyntheticSource::new(32, 24, Duration::ZERO));
        spawn_workers(source, dir)
    }

    #[test]
    fn test_spawn_and_shutdown() {
        test_workers(None).shutdown();
    }

    #[test]
    fn test_open_then_read_round_trip() {
        let workers = test_workers(None);

        workers
            .capture_tx
            .send(CaptureRequest::Open { device_id: None })
            .unwrap();
        let ready = workers
            .events_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert!(matches!(ready, SessionEvent::StreamReady { .. }));

        workers.capture_tx.send(CaptureRequest::ReadFrame).unwrap();
        let event = workers
            .events_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        match event {
            SessionEvent::Frame(frame) => assert_eq!(frame.dimensions(), (32, 24)),
            other => panic!("unexpected event: {other:?}"),
        }

        workers.shutdown();
    }

    #[test]
    fn test_open_unknown_device_posts_failure() {
        let workers = test_workers(None);

        workers
            .capture_tx
            .send(CaptureRequest::Open {
                device_id: Some("bogus".to_string()),
            })
            .unwrap();
        let event = workers
            .events_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert!(matches!(event, SessionEvent::SourceFailed(_)));

        workers.shutdown();
    }

    #[test]
    fn test_empty_clip_posts_no_event() {
        let dir = tempfile::tempdir().unwrap();
        let workers = test_workers(Some(dir.path().to_path_buf()));

        workers
            .export_tx
            .send(ExportRequest::Clip { frames: Vec::new() })
            .unwrap();
        assert!(workers
            .events_rx
            .recv_timeout(Duration::from_millis(300))
            .is_err());

        workers.shutdown();
    }

    #[test]
    fn test_clip_posts_saved_status() {
        let dir = tempfile::tempdir().unwrap();
        let workers = test_workers(Some(dir.path().to_path_buf()));

        let frames = vec![RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]))];
        workers.export_tx.send(ExportRequest::Clip { frames }).unwrap();

        let event = workers
            .events_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        match event {
            SessionEvent::Status(text) => assert!(text.contains("clip")),
            other => panic!("unexpected event: {other:?}"),
        }

        workers.shutdown();
    }
}
