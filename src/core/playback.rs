// Click-to-play gating for the autoplay-restricted audio element.
//
// A click starts one play attempt at a time. A rejected attempt reopens the
// gate so the next click can retry; a resolved one closes it for good.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Pending,
    Playing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackGate {
    state: PlaybackState,
}

impl PlaybackGate {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns true if a play attempt should be made now, and marks it pending.
    pub fn begin_attempt(&mut self) -> bool {
        if self.state == PlaybackState::Idle {
            self.state = PlaybackState::Pending;
            true
        } else {
            false
        }
    }

    /// Record the outcome of the pending attempt. Returns true exactly once,
    /// on the transition into `Playing`.
    pub fn finish_attempt(&mut self, started: bool) -> bool {
        if self.state != PlaybackState::Pending {
            return false;
        }
        self.state = if started {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        };
        started
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}
