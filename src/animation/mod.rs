mod animatable;
mod timing;

pub use animatable::Animatable;
pub use timing::TimingFunction;

/// Configuration for how a property should animate when it changes
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of the animation in milliseconds
    pub duration_ms: u64,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in milliseconds
    pub delay_ms: u64,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: u64, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0,
        }
    }

    /// Exponential ease-out transition, used by all toast geometry
    pub fn expo_out(duration_ms: u64) -> Self {
        Self::new(duration_ms, TimingFunction::EXPO_OUT)
    }

    /// Set the delay before the animation starts
    pub fn delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Total time from start until the value settles
    pub fn total_ms(&self) -> u64 {
        self.delay_ms + self.duration_ms
    }

    /// Eased progress `elapsed_ms` after the transition started
    pub fn progress_at(&self, elapsed_ms: u64) -> f32 {
        if elapsed_ms <= self.delay_ms {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        let t = (elapsed_ms - self.delay_ms) as f32 / self.duration_ms as f32;
        self.timing.evaluate(t.min(1.0))
    }
}
