use web_time::Instant;

use super::CameraState;
use crate::animation::Animation;

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: CameraState,
    to: CameraState,
    animation: Animation,
    started_at: Instant,
}

impl Transition {
    fn state_at(&self, now: Instant) -> (CameraState, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.animation.duration() {
            return (self.to, true);
        }

        let t = self.animation.progress(elapsed);
        (self.from.interpolate(&self.to, t), false)
    }
}

/// Drives at most one animated camera transition at a time.
///
/// Providers embed the animator and call [`CameraAnimator::advance`] once per frame. Starting a
/// new transition while one is in flight cancels the old one: the new transition starts from
/// the state displayed at that moment and only the new target is ever reached.
#[derive(Debug, Default)]
pub struct CameraAnimator {
    transition: Option<Transition>,
}

impl CameraAnimator {
    /// Creates an idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a transition to `to`, replacing any transition in flight.
    ///
    /// `displayed` is the state currently on screen. It is ignored if another transition is in
    /// flight, in that case the interpolated state of that transition at `now` is used instead.
    /// Returns the state that should be displayed at `now`.
    pub fn start(
        &mut self,
        displayed: CameraState,
        to: CameraState,
        animation: Animation,
        now: Instant,
    ) -> CameraState {
        let from = match self.transition.take() {
            Some(previous) => {
                log::trace!(
                    "Camera transition to {:?} superseded by transition to {to:?}",
                    previous.to
                );
                previous.state_at(now).0
            }
            None => displayed,
        };

        if animation.duration().is_zero() {
            return to;
        }

        self.transition = Some(Transition {
            from,
            to,
            animation,
            started_at: now,
        });

        from
    }

    /// Cancels the transition in flight, returning the state it had reached at `now`.
    pub fn cancel(&mut self, now: Instant) -> Option<CameraState> {
        self.transition
            .take()
            .map(|transition| transition.state_at(now).0)
    }

    /// Returns true if a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Target of the transition in flight.
    pub fn target(&self) -> Option<CameraState> {
        self.transition.map(|transition| transition.to)
    }

    /// Advances the transition to `now`.
    ///
    /// Returns the state to display, or `None` if nothing is animating. The transition is
    /// finished (and the animator becomes idle) once the returned state equals the target.
    pub fn advance(&mut self, now: Instant) -> Option<CameraState> {
        let transition = self.transition?;
        let (state, finished) = transition.state_at(now);
        if finished {
            self.transition = None;
        }

        Some(state)
    }
}
