//! Post-payment confirmation reducer.
//!
//! On return from the payment provider the confirmation page issues exactly
//! one ticket-generation request for the confirmation id carried in the
//! route. The id is consumed once: repeated `ConfirmPayment` actions for
//! the same page instance (re-renders, double mounts) do not produce a
//! second request.
//!
//! Success and failure are surfaced distinctly in state: the displayed
//! outcome reflects what actually happened to ticket generation, not static
//! success copy.

use crate::actions::ConfirmationAction;
use crate::environment::StorefrontEnvironment;
use crate::providers::{SessionStore, TicketingApi};
use crate::state::{ConfirmationOutcome, ConfirmationState};
use prontoticket_core::effect::Effect;
use prontoticket_core::reducer::Reducer;
use prontoticket_core::{SmallVec, smallvec};

/// Post-payment confirmation reducer.
#[derive(Debug, Clone)]
pub struct ConfirmationReducer<A, S> {
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(A, S)>,
}

impl<A, S> ConfirmationReducer<A, S> {
    /// Create a new confirmation reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A, S> Default for ConfirmationReducer<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> Reducer for ConfirmationReducer<A, S>
where
    A: TicketingApi + Clone + 'static,
    S: SessionStore + Clone + 'static,
{
    type State = ConfirmationState;
    type Action = ConfirmationAction;
    type Environment = StorefrontEnvironment<A, S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ConfirmationAction::ConfirmPayment { confirmation } => {
                if state.outcome != ConfirmationOutcome::NotStarted {
                    // The id has already been consumed by this instance.
                    tracing::warn!(%confirmation, "Duplicate confirmation ignored");
                    return smallvec![Effect::None];
                }

                state.confirmation = Some(confirmation.clone());
                state.outcome = ConfirmationOutcome::Pending;

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.generate_tickets(&confirmation).await {
                        Ok(count) => Some(ConfirmationAction::TicketsGenerated { count }),
                        Err(error) => Some(ConfirmationAction::TicketGenerationFailed {
                            error: error.to_string(),
                        }),
                    }
                })]
            },

            ConfirmationAction::PaymentCancelled => {
                if state.outcome != ConfirmationOutcome::NotStarted {
                    return smallvec![Effect::None];
                }
                state.outcome = ConfirmationOutcome::Cancelled;
                smallvec![Effect::None]
            },

            ConfirmationAction::TicketsGenerated { count } => {
                if state.outcome != ConfirmationOutcome::Pending {
                    return smallvec![Effect::None];
                }
                tracing::info!(count, "Tickets generated");
                state.outcome = ConfirmationOutcome::Generated { count };
                smallvec![Effect::None]
            },

            ConfirmationAction::TicketGenerationFailed { error } => {
                if state.outcome != ConfirmationOutcome::Pending {
                    return smallvec![Effect::None];
                }
                tracing::warn!(%error, "Ticket generation failed");
                state.outcome = ConfirmationOutcome::Failed { message: error };
                smallvec![Effect::None]
            },
        }
    }
}
