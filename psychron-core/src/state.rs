//! Refresh-mode and lifecycle state
//!
//! The refresh mode is a configuration value the controller consults on
//! every update. The lifecycle is the actual state machine: explicit,
//! finite, and deterministic.

/// Panel refresh mode
///
/// Selected once via the controller's `update_mode` and consulted on
/// every update until changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    /// Complete redraw with the GC waveform - slower, clears ghosting
    Full,
    /// Redraw of changed segments with the DU waveform - faster
    #[default]
    Partial,
}

impl RefreshMode {
    /// Check if this mode forces a complete redraw
    pub fn is_full(&self) -> bool {
        matches!(self, RefreshMode::Full)
    }
}

/// Controller lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Power-on state, before the reset handshake has run
    #[default]
    Uninitialized,
    /// Panel idle, accepting commands
    Ready,
    /// Panel mid-refresh, busy line asserted
    Busy,
}

/// Lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseEvent {
    /// Reset handshake and init sequence completed
    InitComplete,
    /// A refresh transaction started
    RefreshStarted,
    /// The refresh transaction ended, successfully or with a reported
    /// timeout - either way the panel accepts commands again
    RefreshFinished,
}

impl Phase {
    /// Check if the controller accepts refresh operations
    pub fn is_ready(&self) -> bool {
        matches!(self, Phase::Ready)
    }

    /// Process an event and return the next phase
    ///
    /// Timeouts are reported as errors by the controller but never latch
    /// a fault phase: the caller decides whether to retry or abandon.
    pub fn transition(self, event: PhaseEvent) -> Self {
        use Phase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Uninitialized, InitComplete) => Ready,
            (Ready, RefreshStarted) => Busy,
            (Busy, RefreshFinished) => Ready,

            // Default: stay in current phase
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_to_ready() {
        let phase = Phase::Uninitialized;
        assert_eq!(phase.transition(PhaseEvent::InitComplete), Phase::Ready);
    }

    #[test]
    fn test_refresh_cycle() {
        let phase = Phase::Ready
            .transition(PhaseEvent::RefreshStarted)
            .transition(PhaseEvent::RefreshFinished);
        assert_eq!(phase, Phase::Ready);
    }

    #[test]
    fn test_timeout_does_not_latch() {
        // A refresh that times out still finishes; the phase must come
        // back to Ready so the caller can retry
        let phase = Phase::Busy.transition(PhaseEvent::RefreshFinished);
        assert!(phase.is_ready());
    }

    #[test]
    fn test_unexpected_events_are_ignored() {
        assert_eq!(
            Phase::Uninitialized.transition(PhaseEvent::RefreshFinished),
            Phase::Uninitialized
        );
        assert_eq!(
            Phase::Ready.transition(PhaseEvent::InitComplete),
            Phase::Ready
        );
    }

    #[test]
    fn test_default_mode_is_partial() {
        assert_eq!(RefreshMode::default(), RefreshMode::Partial);
        assert!(!RefreshMode::default().is_full());
        assert!(RefreshMode::Full.is_full());
    }
}
