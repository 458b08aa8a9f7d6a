//! Camera frame-rate tracking for the status line.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling frame-interval statistics over the last few seconds of capture.
pub struct FrameMetrics {
    last_frame: Option<Instant>,
    intervals: VecDeque<Duration>,
    pub fps: f32,
}

impl FrameMetrics {
    const MAX_SAMPLES: usize = 30;

    pub fn new() -> Self {
        Self {
            last_frame: None,
            intervals: VecDeque::with_capacity(Self::MAX_SAMPLES),
            fps: 0.0,
        }
    }

    /// Record the arrival of one camera frame.
    pub fn record_frame(&mut self, now: Instant) {
        if let Some(prev) = self.last_frame {
            self.intervals.push_back(now - prev);
            if self.intervals.len() > Self::MAX_SAMPLES {
                self.intervals.pop_front();
            }
        }
        self.last_frame = Some(now);
        self.update_fps();
    }

    fn update_fps(&mut self) {
        if self.intervals.is_empty() {
            return;
        }
        let total: Duration = self.intervals.iter().sum();
        let avg_ms = total.as_secs_f32() * 1000.0 / self.intervals.len() as f32;
        if avg_ms > 0.0 {
            self.fps = 1000.0 / avg_ms;
        }
    }

    pub fn fps_int(&self) -> u32 {
        self.fps.round() as u32
    }
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_fps_is_zero() {
        let metrics = FrameMetrics::new();
        assert_eq!(metrics.fps_int(), 0);
    }

    #[test]
    fn test_steady_intervals_give_expected_fps() {
        let mut metrics = FrameMetrics::new();
        let start = Instant::now();
        for i in 0..30u32 {
            metrics.record_frame(start + Duration::from_millis(33 * i as u64));
        }
        assert!(metrics.fps > 25.0 && metrics.fps < 35.0);
    }

    #[test]
    fn test_single_frame_keeps_fps_zero() {
        let mut metrics = FrameMetrics::new();
        metrics.record_frame(Instant::now());
        assert_eq!(metrics.fps_int(), 0);
    }
}
