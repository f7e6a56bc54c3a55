//! Checkout reducer.
//!
//! Implements the single-event purchase state machine:
//!
//! ```text
//! Loading ──CheckoutLoaded──▶ Ready ──SubmitPurchase──▶ Submitting
//!    │                         ▲                            │
//!    │CheckoutLoadFailed       │PurchaseFailed              │PaymentLinkReady
//!    ▼                         │(form preserved)            ▼
//!  Failed                      └────────────────────── Redirected
//! ```
//!
//! `Loading` resolves through one *joined* fetch: the event and its ticket
//! types are requested concurrently inside a single future that feeds back
//! one `CheckoutLoaded` action, so `Ready` can never hold half the data.
//!
//! `SubmitPurchase` is only accepted in `Ready`. The phase flips to
//! `Submitting` in the same reducer step that emits the request effect, and
//! reducer steps are serialized by the store, so exactly one payment-link
//! request is in flight per checkout instance.

use crate::actions::CheckoutAction;
use crate::environment::StorefrontEnvironment;
use crate::providers::{SessionStore, TicketingApi};
use crate::state::{CheckoutPhase, CheckoutState};
use prontoticket_core::effect::Effect;
use prontoticket_core::reducer::Reducer;
use prontoticket_core::{SmallVec, smallvec};

/// Checkout reducer.
#[derive(Debug, Clone)]
pub struct CheckoutReducer<A, S> {
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(A, S)>,
}

impl<A, S> CheckoutReducer<A, S> {
    /// Create a new checkout reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A, S> Default for CheckoutReducer<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> Reducer for CheckoutReducer<A, S>
where
    A: TicketingApi + Clone + 'static,
    S: SessionStore + Clone + 'static,
{
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = StorefrontEnvironment<A, S>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // OpenCheckout: reset and load event data + session prefill
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::OpenCheckout { event_id } => {
                *state = CheckoutState::new(event_id);

                let api = env.api.clone();
                let load = Effect::future(async move {
                    // Both fetches race inside one future; the reducer only
                    // ever observes their joint completion.
                    let (event, ticket_types) = tokio::join!(
                        api.get_event(event_id),
                        api.list_ticket_types(event_id)
                    );
                    match (event, ticket_types) {
                        (Ok(event), Ok(ticket_types)) => Some(CheckoutAction::CheckoutLoaded {
                            event,
                            ticket_types,
                        }),
                        (Err(error), _) | (_, Err(error)) => {
                            Some(CheckoutAction::CheckoutLoadFailed {
                                error: error.to_string(),
                            })
                        },
                    }
                });

                let sessions = env.sessions.clone();
                let prefill = Effect::future(async move {
                    match sessions.load_user().await {
                        Ok(user) => Some(CheckoutAction::SessionLoaded { user }),
                        Err(error) => {
                            // A broken session store degrades to guest
                            // checkout rather than blocking the purchase.
                            tracing::warn!(%error, "Session read failed, continuing as guest");
                            Some(CheckoutAction::SessionLoaded { user: None })
                        },
                    }
                });

                smallvec![load, prefill]
            },

            CheckoutAction::CheckoutLoaded {
                event,
                ticket_types,
            } => {
                if state.phase != CheckoutPhase::Loading {
                    tracing::warn!("Discarding checkout data for a non-loading checkout");
                    return smallvec![Effect::None];
                }
                state.event = Some(event);
                state.ticket_types = ticket_types;
                state.phase = CheckoutPhase::Ready;
                smallvec![Effect::None]
            },

            CheckoutAction::CheckoutLoadFailed { error } => {
                if state.phase != CheckoutPhase::Loading {
                    return smallvec![Effect::None];
                }
                tracing::warn!(%error, "Checkout data fetch failed");
                state.phase = CheckoutPhase::Failed { message: error };
                smallvec![Effect::None]
            },

            CheckoutAction::SessionLoaded { user } => {
                if let Some(user) = user {
                    state.buyer = user.buyer_details();
                    state.known_user_id = Some(user.id);
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Form edits, only meaningful in Ready
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::QuantityChanged {
                ticket_type_id,
                quantity,
            } => {
                if state.phase != CheckoutPhase::Ready {
                    return smallvec![Effect::None];
                }
                if !state.ticket_types.iter().any(|t| t.id == ticket_type_id) {
                    tracing::warn!(%ticket_type_id, "Quantity change for unknown ticket type");
                    return smallvec![Effect::None];
                }
                if quantity == 0 {
                    state.selected.remove(&ticket_type_id);
                } else {
                    state.selected.insert(ticket_type_id, quantity);
                }
                smallvec![Effect::None]
            },

            CheckoutAction::PromoCodeChanged { code } => {
                if state.phase == CheckoutPhase::Ready {
                    state.promo_code = code;
                }
                smallvec![Effect::None]
            },

            CheckoutAction::BuyerDetailsChanged { details } => {
                if state.phase != CheckoutPhase::Ready {
                    return smallvec![Effect::None];
                }
                if state.known_user_id.is_some() {
                    // Prefilled profile is locked; the form is not shown to
                    // signed-in users.
                    tracing::warn!("Ignoring buyer edit for a signed-in checkout");
                    return smallvec![Effect::None];
                }
                state.buyer = details;
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // SubmitPurchase: one in-flight payment-link request
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::SubmitPurchase => {
                if state.phase != CheckoutPhase::Ready {
                    tracing::warn!(phase = ?state.phase, "Submit ignored outside Ready");
                    return smallvec![Effect::None];
                }

                state.error = None;
                state.phase = CheckoutPhase::Submitting;

                let request = state.payment_request();
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.create_payment_link(&request).await {
                        Ok(target) => Some(CheckoutAction::PaymentLinkReady {
                            url: target.into_url(),
                        }),
                        Err(error) => Some(CheckoutAction::PurchaseFailed {
                            message: error.to_string(),
                        }),
                    }
                })]
            },

            CheckoutAction::PaymentLinkReady { url } => {
                if state.phase != CheckoutPhase::Submitting {
                    return smallvec![Effect::None];
                }
                state.phase = CheckoutPhase::Redirected { url };
                smallvec![Effect::None]
            },

            CheckoutAction::PurchaseFailed { message } => {
                if state.phase != CheckoutPhase::Submitting {
                    return smallvec![Effect::None];
                }
                tracing::warn!(%message, "Payment link request failed");
                // Quantities and form fields are preserved; only the phase
                // and the surfaced message change.
                state.phase = CheckoutPhase::Ready;
                state.error = Some(message);
                smallvec![Effect::None]
            },
        }
    }
}
