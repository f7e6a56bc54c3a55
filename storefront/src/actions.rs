//! Storefront actions.
//!
//! Actions are the only way to communicate with the storefront state
//! machines. Each flow has its own action enum mixing **commands** (user
//! intent: load, search, submit) and **events** (results of completed
//! effects: loaded, failed, link ready).
//!
//! Failure events carry rendered message strings rather than error values
//! so actions stay `Clone + Serialize` for broadcasting and replay.

use crate::providers::StoredUser;
use prontoticket_backend::{BuyerDetails, ConfirmationId, Event, EventId, TicketType, TicketTypeId};
use serde::{Deserialize, Serialize};

/// Event catalog action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogAction {
    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch all events from the backend.
    LoadCatalog,

    /// The search term changed; resets to page 1.
    SearchChanged {
        /// New search term.
        term: String,
    },

    /// The user navigated to a page; clamped to the valid range.
    PageChanged {
        /// Requested page, 1-based.
        page: usize,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════
    /// The catalog fetch completed.
    CatalogLoaded {
        /// Events in backend order.
        events: Vec<Event>,
    },

    /// The catalog fetch failed; the previously displayed list stays.
    CatalogLoadFailed {
        /// Failure description.
        error: String,
    },
}

/// Checkout action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CheckoutAction {
    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════
    /// Open a checkout for one event.
    ///
    /// Resets the state and issues the joined event/ticket-type fetch plus
    /// the session-store read.
    OpenCheckout {
        /// Event to purchase tickets for.
        event_id: EventId,
    },

    /// The user changed a ticket-type quantity.
    ///
    /// Quantity 0 removes the selection. Unknown ticket-type ids are
    /// ignored.
    QuantityChanged {
        /// Ticket type whose quantity changed.
        ticket_type_id: TicketTypeId,
        /// New quantity.
        quantity: u32,
    },

    /// The user edited the promo-code input.
    PromoCodeChanged {
        /// Promo code text, passed through verbatim.
        code: String,
    },

    /// The user edited the buyer-details form.
    ///
    /// Ignored when a session user is known: the prefilled profile is
    /// locked.
    BuyerDetailsChanged {
        /// New form contents.
        details: BuyerDetails,
    },

    /// The buy action: request a payment redirect link.
    ///
    /// Accepted only in `Ready`; while a request is in flight the action
    /// is a no-op, keeping exactly one request in flight per checkout.
    SubmitPurchase,

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════
    /// Both the event and its ticket types finished loading.
    ///
    /// A single joined event, so `Ready` can never hold half the data.
    CheckoutLoaded {
        /// The event being purchased.
        event: Event,
        /// Its ticket types.
        ticket_types: Vec<TicketType>,
    },

    /// The event or ticket-type fetch failed.
    CheckoutLoadFailed {
        /// Failure description.
        error: String,
    },

    /// The session store was read.
    SessionLoaded {
        /// The signed-in user, if a session exists.
        user: Option<StoredUser>,
    },

    /// The backend produced a payment redirect link.
    PaymentLinkReady {
        /// URL to navigate the browser to.
        url: String,
    },

    /// The payment-link request failed.
    ///
    /// Returns the checkout to `Ready` with the form preserved.
    PurchaseFailed {
        /// Message surfaced to the user.
        message: String,
    },
}

/// Post-payment confirmation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfirmationAction {
    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════
    /// The provider redirected back with a confirmation id; trigger ticket
    /// generation.
    ///
    /// Consumed exactly once per page instance: repeats are ignored.
    ConfirmPayment {
        /// Confirmation id from the redirect URL.
        confirmation: ConfirmationId,
    },

    /// The provider redirected back without completing payment.
    PaymentCancelled,

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════
    /// Ticket generation succeeded.
    TicketsGenerated {
        /// Number of generated tickets.
        count: usize,
    },

    /// Ticket generation failed.
    TicketGenerationFailed {
        /// Failure description.
        error: String,
    },
}
