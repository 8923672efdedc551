use std::time::{Duration, Instant};

/// Frame timing snapshot taken at [`FrameTimer::begin_frame`].
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame began, in seconds.
    pub dt: f32,

    /// Seconds since the timer was created. Drives time-keyed animation.
    pub seconds: f32,

    /// Monotonic timestamp taken at the start of the frame.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// How the remainder of a frame budget is spent.
///
/// OS sleep only has millisecond granularity, so the whole milliseconds are
/// slept and the sub-millisecond tail is busy-waited.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacePlan {
    /// Coarse part, handed to `thread::sleep`.
    pub sleep: Duration,
    /// Residual below one millisecond, spent polling the clock.
    pub spin: Duration,
}

impl PacePlan {
    /// Plans the wait for a frame that has been running for `elapsed`.
    ///
    /// Returns `None` when pacing is disabled (`target_fps <= 0`) or the frame
    /// already used its whole budget.
    pub fn for_frame(elapsed: Duration, target_fps: i32) -> Option<Self> {
        if target_fps <= 0 {
            return None;
        }

        let budget = Duration::from_secs_f64(1.0 / f64::from(target_fps));
        let remaining = budget.checked_sub(elapsed)?;
        if remaining.is_zero() {
            return None;
        }

        let sleep = Duration::from_millis(remaining.as_millis() as u64);
        Some(Self {
            sleep,
            spin: remaining - sleep,
        })
    }

    #[inline]
    pub fn total(self) -> Duration {
        self.sleep + self.spin
    }
}

/// Frame timer producing `FrameTime` snapshots and pacing the loop.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    epoch: Instant,
    last_begin: Instant,
    frame_start: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameTimer {
    /// Creates a timer with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn new() -> Self {
        Self::with_clamps(
            Duration::from_micros(100), // 0.0001s
            Duration::from_millis(250), // 0.25s
        )
    }

    /// Creates a timer with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            epoch: now,
            last_begin: now,
            frame_start: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta-time baseline.
    ///
    /// Useful when resuming from a long pause so the next frame does not see
    /// the whole pause as its delta.
    pub fn reset(&mut self) {
        self.last_begin = Instant::now();
    }

    /// Records the frame start timestamp and returns the frame's `FrameTime`.
    pub fn begin_frame(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last_begin)
            .clamp(self.dt_min, self.dt_max);

        self.last_begin = now;
        self.frame_start = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            seconds: now.saturating_duration_since(self.epoch).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    /// Wall-clock time since the last `begin_frame`.
    #[inline]
    pub fn frame_elapsed(&self) -> Duration {
        self.frame_start.elapsed()
    }

    /// Number of frames begun so far.
    #[inline]
    pub fn frames_begun(&self) -> u64 {
        self.frame_index
    }

    /// Blocks until `1 / target_fps` has passed since `begin_frame`.
    ///
    /// `target_fps <= 0` means uncapped and returns immediately. Returns the
    /// time spent waiting.
    pub fn end_frame_and_pace(&mut self, target_fps: i32) -> Duration {
        let Some(plan) = PacePlan::for_frame(self.frame_elapsed(), target_fps) else {
            return Duration::ZERO;
        };

        let wait_start = Instant::now();
        let deadline = wait_start + plan.total();

        if !plan.sleep.is_zero() {
            std::thread::sleep(plan.sleep);
        }

        // Sleep may overshoot; the spin then exits immediately.
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }

        wait_start.elapsed()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
