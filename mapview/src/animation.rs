//! Description of how a camera update is applied over time.

use std::time::Duration;

/// Duration of an [`Animation`] created without an explicit one.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Easing curve applied to the animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cubic acceleration from zero speed.
    EaseIn,
    /// Cubic deceleration to zero speed.
    EaseOut,
    /// Cubic acceleration until halfway, deceleration after.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Input outside of the range is clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Transition used to reach a camera update target.
///
/// Passing no animation to
/// [`MapController::notify_camera_update`](crate::MapController::notify_camera_update) applies
/// the update instantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    duration: Duration,
    easing: Easing,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ANIMATION_DURATION,
            easing: Easing::default(),
        }
    }
}

impl Animation {
    /// Starts building an animation from the defaults: 300 ms, ease in-out.
    pub fn builder() -> AnimationBuilder {
        AnimationBuilder {
            animation: Self::default(),
        }
    }

    /// Total duration of the transition.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Easing curve.
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Eased progress after `elapsed` time, in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let total = self.duration.as_secs_f64();
        if total <= f64::EPSILON {
            return 1.0;
        }

        self.easing.apply(elapsed.as_secs_f64() / total)
    }
}

/// Builder for [`Animation`].
#[derive(Debug, Clone, Copy)]
pub struct AnimationBuilder {
    animation: Animation,
}

impl AnimationBuilder {
    /// Sets the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.animation.duration = duration;
        self
    }

    /// Sets the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.animation.easing = easing;
        self
    }

    /// Creates the animation.
    pub fn build(self) -> Animation {
        self.animation
    }
}
