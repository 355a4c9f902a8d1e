//! Throttled frame sampling for camera-style sources.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::raster::RasterImage;

/// Camera direction requested from the host's capture API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub frame_rate: u32,
    pub throttle_ms: u64,
    /// Which camera the host should open. Carried for the host; sampling ignores it.
    pub facing_mode: FacingMode,
    pub flip_horizontal: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            max_width: 500,
            max_height: 500,
            frame_rate: 30,
            throttle_ms: 200,
            facing_mode: FacingMode::Environment,
            flip_horizontal: false,
        }
    }
}

impl CameraConfig {
    /// Displayed size: the requested size clamped to the maxima.
    pub fn display_size(&self) -> (u32, u32) {
        (
            self.width.min(self.max_width),
            self.height.min(self.max_height),
        )
    }

    pub fn throttle(&self) -> FrameThrottle {
        FrameThrottle::new(Duration::from_millis(self.throttle_ms))
    }
}

/// Trailing-edge throttle: a frame is taken at the end of each window, never at its start.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    interval: Duration,
    window_start: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a frame should be taken at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return false;
        };
        if now.saturating_duration_since(start) >= self.interval {
            self.window_start = None;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.window_start = None;
    }
}

pub trait FrameSource {
    /// Latest frame, `None` while the source has nothing to show.
    fn current_frame(&mut self) -> Option<RasterImage>;
}

pub struct FrameSampler<S> {
    source: S,
    throttle: FrameThrottle,
    flip_horizontal: bool,
}

impl<S: FrameSource> FrameSampler<S> {
    pub fn new(source: S, config: &CameraConfig) -> Self {
        Self {
            source,
            throttle: config.throttle(),
            flip_horizontal: config.flip_horizontal,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Pulls a frame if the throttle allows one at `now`.
    pub fn sample(&mut self, now: Instant) -> Option<RasterImage> {
        if !self.throttle.poll(now) {
            return None;
        }
        let frame = self.source.current_frame()?;
        if self.flip_horizontal {
            Some(frame.flip_horizontal())
        } else {
            Some(frame)
        }
    }
}
