//! Rejection feedback played when alternate fire lacks energy.
//!
//! A small state machine advanced once per tick. While it is running the
//! emitter does not reject again, so a continuous press-and-hold produces
//! exactly one rejection no matter how long it lasts.

use gemfire_core::constants::{FEEDBACK_BLINKS, FEEDBACK_BLINK_SECS, TIMER_EPSILON};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum FeedbackState {
    #[default]
    Idle,
    /// Blinking the energy gauge. `half_cycles` counts completed toggles.
    Playing { half_cycles: u32, elapsed_secs: f64 },
    /// Finished playing while alternate fire is still held.
    Latched,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RejectFeedback {
    state: FeedbackState,
}

impl RejectFeedback {
    pub fn state(&self) -> FeedbackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != FeedbackState::Idle
    }

    /// Start the routine. Returns false if it is already running.
    pub fn trigger(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = FeedbackState::Playing {
            half_cycles: 0,
            elapsed_secs: 0.0,
        };
        true
    }

    /// Advance by `dt`. Returns the gauge visibility when it toggles.
    pub fn advance(&mut self, dt: f64, alt_held: bool) -> Option<bool> {
        match self.state {
            FeedbackState::Idle => None,
            FeedbackState::Latched => {
                if !alt_held {
                    self.state = FeedbackState::Idle;
                }
                None
            }
            FeedbackState::Playing {
                mut half_cycles,
                mut elapsed_secs,
            } => {
                let total = FEEDBACK_BLINKS * 2;
                let mut toggled = None;
                elapsed_secs += dt;
                while half_cycles < total && elapsed_secs + TIMER_EPSILON >= FEEDBACK_BLINK_SECS {
                    elapsed_secs -= FEEDBACK_BLINK_SECS;
                    half_cycles += 1;
                    // Hidden on odd toggles, shown on even ones; ends shown.
                    toggled = Some(half_cycles % 2 == 0);
                }

                self.state = if half_cycles < total {
                    FeedbackState::Playing {
                        half_cycles,
                        elapsed_secs,
                    }
                } else if alt_held {
                    FeedbackState::Latched
                } else {
                    FeedbackState::Idle
                };
                toggled
            }
        }
    }
}
