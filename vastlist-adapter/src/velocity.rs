use alloc::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityConfig {
    /// Number of samples kept.
    pub window: usize,
    /// Without a new sample for this long, velocity drops to zero.
    pub idle_reset_ms: u64,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window: 8,
            idle_reset_ms: 100,
        }
    }
}

impl VelocityConfig {
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_idle_reset_ms(mut self, idle_reset_ms: u64) -> Self {
        self.idle_reset_ms = idle_reset_ms;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sample {
    ms: u64,
    position: u64,
}

/// Smoothed scroll velocity from timestamped positions.
///
/// Keeps a rolling window of samples. The velocity is a weighted average of the velocities
/// between consecutive samples, with weights growing linearly towards the most recent pair.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    config: VelocityConfig,
    samples: VecDeque<Sample>,
    velocity: f64,
}

impl VelocityTracker {
    pub fn new(config: VelocityConfig) -> Self {
        Self {
            config,
            samples: VecDeque::with_capacity(config.window.max(2)),
            velocity: 0.0,
        }
    }

    pub fn config(&self) -> VelocityConfig {
        self.config
    }

    /// Signed velocity in units per second. Positive means scrolling forward.
    ///
    /// This is the value as of the last `record` or `tick`; it does not decay on its own. Use
    /// [`Self::velocity_at`] to read it without ticking.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Velocity as seen at `now_ms`: zero once `idle_reset_ms` passed since the last sample.
    pub fn velocity_at(&self, now_ms: u64) -> f64 {
        if self.is_idle(now_ms) { 0.0 } else { self.velocity }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Records a position. Samples older than `idle_reset_ms` are discarded first.
    pub fn record(&mut self, now_ms: u64, position: u64) {
        if self.is_idle(now_ms) {
            self.samples.clear();
        }
        match self.samples.back_mut() {
            // Time stands still: keep the latest position only.
            Some(last) if last.ms >= now_ms => last.position = position,
            _ => self.samples.push_back(Sample {
                ms: now_ms,
                position,
            }),
        }
        while self.samples.len() > self.config.window.max(2) {
            self.samples.pop_front();
        }
        self.velocity = self.weighted_velocity();
    }

    /// Drops to zero once no sample arrived for `idle_reset_ms`. Returns `true` when the
    /// velocity changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.velocity == 0.0 || !self.is_idle(now_ms) {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.velocity = 0.0;
    }

    fn is_idle(&self, now_ms: u64) -> bool {
        self.samples
            .back()
            .is_some_and(|last| now_ms.saturating_sub(last.ms) > self.config.idle_reset_ms)
    }

    fn weighted_velocity(&self) -> f64 {
        let mut weighted = 0.0;
        let mut weights = 0.0;
        let mut prev: Option<Sample> = None;
        let mut weight = 0.0;
        for &sample in &self.samples {
            if let Some(p) = prev {
                let dt = (sample.ms - p.ms) as f64;
                let dp = sample.position as f64 - p.position as f64;
                weight += 1.0;
                weighted += weight * dp * 1_000.0 / dt;
                weights += weight;
            }
            prev = Some(sample);
        }
        if weights == 0.0 {
            0.0
        } else {
            weighted / weights
        }
    }
}
