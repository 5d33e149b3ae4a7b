//! Converter state and its pure transition function
//!
//! The presentation layer owns one [`ConversionState`] and replaces it with
//! `reduce(state, event)` on every event. Input events (amount, currencies,
//! swap) change the fields a conversion is computed from; request events
//! carry the lifecycle of delayed conversions, identified by increasing ids.

use crate::conversion::{ConversionRequest, ConversionResult};
use crate::currency::Currency;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which completion wins when several conversions are in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RacePolicy {
    /// Only the most recently started request may land
    #[default]
    LatestRequest,
    /// Every completion lands; the last one to finish wins
    LastFinished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConversionEvent {
    AmountChanged(String),
    SourceChanged(Currency),
    TargetChanged(Currency),
    /// Exchange source and target, reusing the displayed result as the new amount
    Swapped,
    RequestStarted { id: u64 },
    Completed { id: u64, result: ConversionResult },
    Failed { id: u64, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionState {
    /// Amount text as typed
    pub amount: String,
    pub from: Currency,
    pub to: Currency,
    pub result: Option<ConversionResult>,
    /// Message of the last failed conversion, cleared by the next success
    pub error: Option<String>,
    pub loading: bool,
    /// Id of the most recently started request, 0 before the first one
    pub latest_request: u64,
    pub race_policy: RacePolicy,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self::new(RacePolicy::default())
    }
}

impl ConversionState {
    /// Initial state: 1 USD to EUR, nothing converted yet
    pub fn new(race_policy: RacePolicy) -> Self {
        Self {
            amount: "1".to_string(),
            from: Currency::USD,
            to: Currency::EUR,
            result: None,
            error: None,
            loading: false,
            latest_request: 0,
            race_policy,
        }
    }

    /// Request for the current inputs; fails on malformed amount text
    pub fn request(&self) -> Result<ConversionRequest> {
        ConversionRequest::parse(&self.amount, self.from, self.to)
    }

    /// Id the next started request should carry
    pub fn next_request_id(&self) -> u64 {
        self.latest_request + 1
    }

    /// Whether a completion of request `id` would be applied
    pub fn accepts(&self, id: u64) -> bool {
        match self.race_policy {
            RacePolicy::LatestRequest => id == self.latest_request,
            RacePolicy::LastFinished => true,
        }
    }

    /// Whether the conversion inputs differ from `other`
    pub fn inputs_changed(&self, other: &ConversionState) -> bool {
        self.amount != other.amount || self.from != other.from || self.to != other.to
    }
}

/// Apply one event
pub fn reduce(state: ConversionState, event: ConversionEvent) -> ConversionState {
    match event {
        ConversionEvent::AmountChanged(amount) => ConversionState { amount, ..state },
        ConversionEvent::SourceChanged(from) => ConversionState { from, ..state },
        ConversionEvent::TargetChanged(to) => ConversionState { to, ..state },
        ConversionEvent::Swapped => {
            // the mirror is only shown when it describes the swapped inputs
            let reused = state.result.as_ref().map(|result| {
                let mirrors_inputs =
                    result.request.from == state.from && result.request.to == state.to;
                (
                    result.converted_display(),
                    mirrors_inputs.then(|| result.swapped()),
                )
            });
            match reused {
                Some((amount, result)) => ConversionState {
                    amount,
                    from: state.to,
                    to: state.from,
                    result,
                    ..state
                },
                None => ConversionState {
                    from: state.to,
                    to: state.from,
                    ..state
                },
            }
        }
        ConversionEvent::RequestStarted { id } => ConversionState {
            latest_request: state.latest_request.max(id),
            loading: true,
            ..state
        },
        ConversionEvent::Completed { id, result } => {
            if !state.accepts(id) {
                return state;
            }
            ConversionState {
                result: Some(result),
                error: None,
                loading: false,
                ..state
            }
        }
        ConversionEvent::Failed { id, message } => {
            if !state.accepts(id) {
                return state;
            }
            ConversionState {
                error: Some(message),
                loading: false,
                ..state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::convert;
    use crate::fx::{RateResolver, RateTable};

    fn convert_state(state: &ConversionState) -> ConversionResult {
        let resolver = RateResolver::new(RateTable::reference());
        convert(&resolver, &state.request().unwrap()).unwrap()
    }

    fn run(state: ConversionState, id: u64) -> ConversionState {
        let result = convert_state(&state);
        let state = reduce(state, ConversionEvent::RequestStarted { id });
        reduce(state, ConversionEvent::Completed { id, result })
    }

    #[test]
    fn test_initial_state() {
        let state = ConversionState::default();
        assert_eq!(state.amount, "1");
        assert_eq!(state.from, Currency::USD);
        assert_eq!(state.to, Currency::EUR);
        assert!(state.result.is_none());
        assert!(!state.loading);
        assert_eq!(state.next_request_id(), 1);
    }

    #[test]
    fn test_input_events() {
        let state = ConversionState::default();
        let next = reduce(state.clone(), ConversionEvent::AmountChanged("100".into()));
        let next = reduce(next, ConversionEvent::SourceChanged(Currency::EUR));
        let next = reduce(next, ConversionEvent::TargetChanged(Currency::USD));

        assert_eq!(next.amount, "100");
        assert_eq!(next.from, Currency::EUR);
        assert_eq!(next.to, Currency::USD);
        assert!(next.inputs_changed(&state));
        assert!(!next.inputs_changed(&next.clone()));
    }

    #[test]
    fn test_request_lifecycle() {
        let state = reduce(ConversionState::default(), ConversionEvent::RequestStarted { id: 1 });
        assert!(state.loading);
        assert_eq!(state.latest_request, 1);

        let state = run(state, 1);
        assert!(!state.loading);
        assert_eq!(state.result.unwrap().converted_display(), "0.85");
    }

    #[test]
    fn test_swap_reuses_result() {
        let state = ConversionState {
            amount: "100".into(),
            from: Currency::EUR,
            to: Currency::USD,
            ..ConversionState::default()
        };
        let state = run(state, 1);
        let swapped = reduce(state, ConversionEvent::Swapped);

        assert_eq!(swapped.from, Currency::USD);
        assert_eq!(swapped.to, Currency::EUR);
        assert_eq!(swapped.amount, "118.00");
        assert_eq!(swapped.result.unwrap().converted_display(), "100.00");
    }

    #[test]
    fn test_swap_after_currency_change_drops_mirror() {
        let state = ConversionState {
            amount: "100".into(),
            from: Currency::EUR,
            to: Currency::USD,
            ..ConversionState::default()
        };
        let state = run(state, 1);
        let state = reduce(state, ConversionEvent::TargetChanged(Currency::GBP));
        let swapped = reduce(state, ConversionEvent::Swapped);

        assert_eq!(swapped.from, Currency::GBP);
        assert_eq!(swapped.to, Currency::EUR);
        assert_eq!(swapped.amount, "118.00");
        assert!(swapped.result.is_none());
    }

    #[test]
    fn test_swap_without_result() {
        let state = reduce(ConversionState::default(), ConversionEvent::Swapped);
        assert_eq!(state.from, Currency::EUR);
        assert_eq!(state.to, Currency::USD);
        assert_eq!(state.amount, "1");
        assert!(state.result.is_none());
    }

    #[test]
    fn test_stale_completion_is_fenced() {
        let state = ConversionState::default();
        let stale = convert_state(&state);
        let state = reduce(state, ConversionEvent::RequestStarted { id: 1 });
        let state = reduce(state, ConversionEvent::AmountChanged("2".into()));
        let fresh = convert_state(&state);
        let state = reduce(state, ConversionEvent::RequestStarted { id: 2 });

        // request 2 finishes first, then the stale request 1 lands
        let state = reduce(state, ConversionEvent::Completed { id: 2, result: fresh });
        let state = reduce(state, ConversionEvent::Completed { id: 1, result: stale });

        assert_eq!(state.result.unwrap().converted_display(), "1.70");
    }

    #[test]
    fn test_last_finished_race() {
        let state = ConversionState::new(RacePolicy::LastFinished);
        let stale = convert_state(&state);
        let state = reduce(state, ConversionEvent::RequestStarted { id: 1 });
        let state = reduce(state, ConversionEvent::AmountChanged("2".into()));
        let fresh = convert_state(&state);
        let state = reduce(state, ConversionEvent::RequestStarted { id: 2 });

        let state = reduce(state, ConversionEvent::Completed { id: 2, result: fresh });
        let state = reduce(state, ConversionEvent::Completed { id: 1, result: stale });

        // the older request finished last and overwrote the newer result
        assert_eq!(state.amount, "2");
        assert_eq!(state.result.unwrap().converted_display(), "0.85");
    }

    #[test]
    fn test_failure_keeps_result() {
        let state = run(ConversionState::default(), 1);
        let state = reduce(state, ConversionEvent::RequestStarted { id: 2 });
        let state = reduce(
            state,
            ConversionEvent::Failed {
                id: 2,
                message: "No rate available for USD-GBP".into(),
            },
        );

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("No rate available for USD-GBP"));
        assert_eq!(state.result.unwrap().converted_display(), "0.85");
    }

    #[test]
    fn test_invalid_amount_has_no_request() {
        let state = reduce(
            ConversionState::default(),
            ConversionEvent::AmountChanged("abc".into()),
        );
        assert!(state.request().is_err());
    }
}
