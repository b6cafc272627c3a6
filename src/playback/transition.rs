use tracing::debug;

use crate::dsp::automation::CLOCK_EPSILON;

/*
Playback Transitions
====================

                  play                      fade-in deadline
    Stopped ───────────────→ FadingIn ──────────────────────→ Playing
    Paused  ───────────────→    ↑  │                            │
       ↑                        │  │ pause                pause │
       │    fade-out deadline   │  ↓                            ↓
       └──────────────────── FadingOut ←────────────────────────┘
                                │
                                └── play (ramps back up from the held gain)

Any state → Stopped when the active track is deleted or playback fails.

Deadlines are audio-clock seconds. The gain ramps themselves live in the
gain node's timeline; this struct only tracks when each ramp is done.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Stopped,
    FadingIn,
    Playing,
    FadingOut,
    Paused,
}

impl TransitionState {
    /// True while audio is (or is becoming) audible.
    pub fn is_playing(self) -> bool {
        matches!(self, TransitionState::FadingIn | TransitionState::Playing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    FadeInComplete,
    FadeOutComplete,
}

#[derive(Debug, Default)]
pub struct Transition {
    state: TransitionState,
    deadline: Option<f64>,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Audio-clock time at which the running fade completes.
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn begin_fade_in(&mut self, until: f64) {
        self.enter(TransitionState::FadingIn, Some(until));
    }

    pub fn begin_fade_out(&mut self, until: f64) {
        self.enter(TransitionState::FadingOut, Some(until));
    }

    /// Drop any pending deadline and rest in `Stopped`.
    pub fn stop(&mut self) {
        self.enter(TransitionState::Stopped, None);
    }

    /// Complete the running fade if its deadline has passed.
    pub fn poll(&mut self, now: f64) -> Option<TransitionEvent> {
        let deadline = self.deadline?;
        if now + CLOCK_EPSILON < deadline {
            return None;
        }

        match self.state {
            TransitionState::FadingIn => {
                self.enter(TransitionState::Playing, None);
                Some(TransitionEvent::FadeInComplete)
            }
            TransitionState::FadingOut => {
                self.enter(TransitionState::Paused, None);
                Some(TransitionEvent::FadeOutComplete)
            }
            _ => {
                self.deadline = None;
                None
            }
        }
    }

    fn enter(&mut self, state: TransitionState, deadline: Option<f64>) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "transition");
        }
        self.state = state;
        self.deadline = deadline;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_in_completes_at_deadline() {
        let mut t = Transition::new();
        t.begin_fade_in(0.8);
        assert_eq!(t.poll(0.5), None);
        assert_eq!(t.state(), TransitionState::FadingIn);
        assert_eq!(t.poll(0.8), Some(TransitionEvent::FadeInComplete));
        assert_eq!(t.state(), TransitionState::Playing);
        assert_eq!(t.poll(10.0), None);
    }

    #[test]
    fn fade_out_lands_in_paused() {
        let mut t = Transition::new();
        t.begin_fade_out(1.5);
        assert_eq!(t.poll(2.0), Some(TransitionEvent::FadeOutComplete));
        assert_eq!(t.state(), TransitionState::Paused);
        assert!(!t.state().is_playing());
    }

    #[test]
    fn stop_cancels_the_deadline() {
        let mut t = Transition::new();
        t.begin_fade_out(0.5);
        t.stop();
        assert_eq!(t.deadline(), None);
        assert_eq!(t.poll(1.0), None);
        assert_eq!(t.state(), TransitionState::Stopped);
    }

    #[test]
    fn new_fade_replaces_the_old_deadline() {
        let mut t = Transition::new();
        t.begin_fade_out(0.5);
        t.begin_fade_in(1.2);
        assert_eq!(t.poll(0.6), None);
        assert_eq!(t.state(), TransitionState::FadingIn);
    }
}
