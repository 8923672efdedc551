use std::time::Instant;

/// Logs the wall-clock duration of a scope when dropped.
///
/// ```rust,ignore
/// {
///     let _t = ScopedTimer::new("vignette rebuild");
///     // work
/// } // -> "vignette rebuild: 1.234 ms"
/// ```
#[derive(Debug)]
pub struct ScopedTimer {
    label: &'static str,
    level: log::Level,
    start: Instant,
}

impl ScopedTimer {
    /// Starts a timer that reports at debug level.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            level: log::Level::Debug,
            start: Instant::now(),
        }
    }

    /// Reports at `level` instead. Useful for scopes that run every frame.
    pub fn at_level(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }

    /// Milliseconds since construction.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::log!(self.level, "{}: {:.3} ms", self.label, self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let t = ScopedTimer::new("test").at_level(log::Level::Trace);
        let a = t.elapsed_ms();
        let b = t.elapsed_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
