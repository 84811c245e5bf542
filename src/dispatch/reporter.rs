//! Reporter - where action outcomes go
//!
//! The dispatcher calls exactly one of `on_result` / `on_error` per action.
//! Adapters: `Callbacks` for a pair of closures, `Recorder` for collecting
//! outcomes (HTTP handlers, CLI, tests).

use serde::Serialize;
use std::sync::Mutex;

use super::{Action, ActionError};
use crate::core::TxHash;

pub trait Reporter {
    fn on_result(&self, action: Action, tx_hash: &TxHash);
    fn on_error(&self, action: Action, error: &ActionError);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn on_result(&self, action: Action, tx_hash: &TxHash) {
        (**self).on_result(action, tx_hash)
    }

    fn on_error(&self, action: Action, error: &ActionError) {
        (**self).on_error(action, error)
    }
}

/// Result and error closures.
pub struct Callbacks<F, G> {
    on_result: F,
    on_error: G,
}

impl<F, G> Callbacks<F, G>
where
    F: Fn(Action, &TxHash),
    G: Fn(Action, &ActionError),
{
    pub fn new(on_result: F, on_error: G) -> Self {
        Self { on_result, on_error }
    }
}

impl<F, G> Reporter for Callbacks<F, G>
where
    F: Fn(Action, &TxHash),
    G: Fn(Action, &ActionError),
{
    fn on_result(&self, action: Action, tx_hash: &TxHash) {
        (self.on_result)(action, tx_hash)
    }

    fn on_error(&self, action: Action, error: &ActionError) {
        (self.on_error)(action, error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    Submitted { action: Action, tx_hash: TxHash },
    Failed {
        action: Action,
        #[serde(serialize_with = "error_string")]
        error: ActionError,
    },
}

fn error_string<S: serde::Serializer>(error: &ActionError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl Outcome {
    pub fn action(&self) -> Action {
        match self {
            Outcome::Submitted { action, .. } | Outcome::Failed { action, .. } => *action,
        }
    }

    pub fn tx_hash(&self) -> Option<&TxHash> {
        match self {
            Outcome::Submitted { tx_hash, .. } => Some(tx_hash),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Outcome::Failed { error, .. } => Some(error),
            Outcome::Submitted { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    outcomes: Mutex<Vec<Outcome>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.lock().ok().and_then(|o| o.last().cloned())
    }

    pub fn take(&self) -> Vec<Outcome> {
        self.outcomes.lock().map(|mut o| std::mem::take(&mut *o)).unwrap_or_default()
    }

    fn push(&self, outcome: Outcome) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push(outcome);
        }
    }
}

impl Reporter for Recorder {
    fn on_result(&self, action: Action, tx_hash: &TxHash) {
        self.push(Outcome::Submitted { action, tx_hash: tx_hash.clone() });
    }

    fn on_error(&self, action: Action, error: &ActionError) {
        self.push(Outcome::Failed { action, error: error.clone() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_callbacks_route() {
        let seen = RefCell::new(Vec::new());
        let callbacks = Callbacks::new(
            |action, hash: &TxHash| seen.borrow_mut().push(format!("{}:{}", action, hash)),
            |action, err: &ActionError| seen.borrow_mut().push(format!("{}!{}", action, err.kind())),
        );
        callbacks.on_result(Action::Mint, &TxHash("ab".into()));
        callbacks.on_error(Action::Burn, &ActionError::Disconnected);
        assert_eq!(*seen.borrow(), vec!["mint:ab", "burn!disconnected"]);
    }

    #[test]
    fn test_recorder_take() {
        let recorder = Recorder::new();
        recorder.on_error(Action::Withdraw, &ActionError::Disconnected);
        assert_eq!(recorder.last().and_then(|o| o.error().cloned()), Some(ActionError::Disconnected));
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.outcomes().is_empty());
    }

    #[test]
    fn test_outcome_json() {
        let outcome = Outcome::Submitted { action: Action::Deposit, tx_hash: TxHash("cd".into()) };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"outcome": "submitted", "action": "deposit", "tx_hash": "cd"})
        );
    }
}
