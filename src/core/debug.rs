//! Frame statistics

use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent frame times.
#[derive(Debug)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    total_frames: u64,
}

impl FrameStats {
    const WINDOW: usize = 120;

    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(Self::WINDOW),
            max_samples: Self::WINDOW,
            total_frames: 0,
        }
    }

    /// Record a frame with the given delta time.
    pub fn record(&mut self, delta: Duration) {
        self.total_frames += 1;
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
    }

    /// Frames per second over the window.
    pub fn fps(&self) -> f32 {
        let total = self.window_total();
        if total > 0.0 {
            self.frame_times.len() as f32 / total
        } else {
            0.0
        }
    }

    /// Mean frame time over the window, in milliseconds.
    pub fn average_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.window_total() / self.frame_times.len() as f32 * 1000.0
    }

    /// Longest frame in the window, in milliseconds.
    pub fn worst_ms(&self) -> f32 {
        self.frame_times
            .iter()
            .max()
            .map_or(0.0, |d| d.as_secs_f32() * 1000.0)
    }

    /// Frames recorded since startup.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> String {
        format!(
            "frame {}: {:.1} fps, {:.2}ms avg, {:.2}ms worst",
            self.total_frames,
            self.fps(),
            self.average_ms(),
            self.worst_ms()
        )
    }

    fn window_total(&self) -> f32 {
        self.frame_times.iter().map(Duration::as_secs_f32).sum()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
