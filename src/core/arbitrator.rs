//! Unsaved-changes arbitration.
//!
//! Every action that would move the user away from a dirty row (another
//! row, another tab, leaving edit mode, another game) asks the arbitrator
//! first. The call does not return until the user has decided, and, for a
//! save, until the save has either gone through or failed.
//!
//! ```text
//! Idle -> PromptOpen -> Resolving(save)    -> Idle            (proceed)
//!                    |                     -> PromptOpen+err  (ask again)
//!                    -> Resolving(discard) -> Idle            (proceed)
//!                    -> Cancelled                             (stay)
//! ```

use super::backend::StatsBackend;
use super::grid::DirtyRowHandle;
use crate::errors::{AppError, AppResult};
use crate::models::prompt::{Decision, PromptReason, UnsavedChangesPrompt};

#[derive(Debug, Clone, PartialEq)]
pub enum ArbiterState {
    Idle,
    PromptOpen {
        prompt: UnsavedChangesPrompt,
        error: Option<String>,
    },
    Resolving(Decision),
    Cancelled,
}

/// Outcome for the caller that asked to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Proceed,
    Stay,
}

/// Whoever answers the prompt (a terminal question, a scripted test...).
/// `error` carries the failure of the previous save attempt, if any.
pub trait DecisionResolver {
    fn decide(&mut self, prompt: &UnsavedChangesPrompt, error: Option<&str>) -> Decision;
}

impl<F> DecisionResolver for F
where
    F: FnMut(&UnsavedChangesPrompt, Option<&str>) -> Decision,
{
    fn decide(&mut self, prompt: &UnsavedChangesPrompt, error: Option<&str>) -> Decision {
        self(prompt, error)
    }
}

#[derive(Debug)]
pub struct Arbitrator {
    state: ArbiterState,
}

impl Default for Arbitrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Arbitrator {
    pub fn new() -> Self {
        Self {
            state: ArbiterState::Idle,
        }
    }

    pub fn state(&self) -> &ArbiterState {
        &self.state
    }

    /// No prompt open. A cancelled prompt counts as settled.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ArbiterState::Idle | ArbiterState::Cancelled)
    }

    /// Let the transition through right away when `handle` is clean;
    /// otherwise open a prompt for its dirty row.
    pub fn guard(
        &mut self,
        reason: PromptReason,
        handle: &mut dyn DirtyRowHandle,
        backend: &mut dyn StatsBackend,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        let Some(info) = handle.dirty_row_info() else {
            return Ok(Transition::Proceed);
        };
        let prompt = UnsavedChangesPrompt {
            reason,
            subject_label: info.subject_label,
            tab_context: info.tab,
        };
        self.request_decision(prompt, handle, backend, resolver)
    }

    /// Open `prompt` and hold the caller until it is resolved.
    pub fn request_decision(
        &mut self,
        prompt: UnsavedChangesPrompt,
        handle: &mut dyn DirtyRowHandle,
        backend: &mut dyn StatsBackend,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        if !self.is_idle() {
            return Err(AppError::PromptBusy);
        }
        self.state = ArbiterState::PromptOpen {
            prompt: prompt.clone(),
            error: None,
        };
        let mut error: Option<String> = None;

        loop {
            let decision = resolver.decide(&prompt, error.as_deref());
            match decision {
                Decision::Cancel => {
                    self.state = ArbiterState::Cancelled;
                    return Ok(Transition::Stay);
                }
                Decision::Discard => {
                    self.state = ArbiterState::Resolving(Decision::Discard);
                    handle.discard_dirty_row();
                    self.state = ArbiterState::Idle;
                    return Ok(Transition::Proceed);
                }
                Decision::Save => {
                    self.state = ArbiterState::Resolving(Decision::Save);
                    match handle.save_dirty_row(backend) {
                        Ok(_) => {
                            self.state = ArbiterState::Idle;
                            return Ok(Transition::Proceed);
                        }
                        Err(e) => {
                            let msg = e.to_string();
                            self.state = ArbiterState::PromptOpen {
                                prompt: prompt.clone(),
                                error: Some(msg.clone()),
                            };
                            error = Some(msg);
                        }
                    }
                }
            }
        }
    }
}
