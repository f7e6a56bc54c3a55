//! Storefront state types.
//!
//! One state struct per screen flow. All types are `Clone` to support the
//! functional architecture pattern; none of them perform I/O.

use prontoticket_backend::{
    BuyerDetails, ConfirmationId, Event, EventId, Money, PaymentRequest, TicketOrder, TicketType,
    TicketTypeId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════

/// Event catalog state.
///
/// Holds the full fetched event list; visibility filtering (end date,
/// search term) and pagination are computed views over it. Backend ordering
/// is preserved throughout; the catalog imposes no sort of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    /// All events as returned by the backend.
    pub events: Vec<Event>,

    /// Free-text search term; empty matches everything.
    pub search_term: String,

    /// Current page, 1-based.
    pub page: usize,
}

impl CatalogState {
    /// Create an empty catalog on page 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            search_term: String::new(),
            page: 1,
        }
    }

    /// Events that have not yet ended and match the current search term.
    #[must_use]
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&Event> {
        visible_events(&self.events, now, &self.search_term)
    }

    /// Number of pages for the current visible set.
    #[must_use]
    pub fn page_count(&self, now: DateTime<Utc>, page_size: usize) -> usize {
        page_count(self.visible(now).len(), page_size)
    }

    /// The slice of visible events on the current page.
    #[must_use]
    pub fn current_page(&self, now: DateTime<Utc>, page_size: usize) -> Vec<&Event> {
        let visible = self.visible(now);
        let page = clamp_page(self.page, visible.len(), page_size);
        page_slice(&visible, page_size, page).to_vec()
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter events to those still running at `now` and matching `search_term`.
///
/// The term matches case-insensitively as a substring of the event name,
/// address, or short description; an empty term matches every event.
/// Ordering of the input is preserved.
#[must_use]
pub fn visible_events<'a>(
    events: &'a [Event],
    now: DateTime<Utc>,
    search_term: &str,
) -> Vec<&'a Event> {
    let needle = search_term.to_lowercase();
    events
        .iter()
        .filter(|event| !event.has_ended(now))
        .filter(|event| {
            needle.is_empty()
                || event.name.to_lowercase().contains(&needle)
                || event.address.to_lowercase().contains(&needle)
                || event.short_description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Partition events into upcoming and past relative to their start time.
///
/// Used by profile-style views ("events attended"). Returns
/// `(upcoming, past)`.
#[must_use]
pub fn upcoming_and_past(events: &[Event], now: DateTime<Utc>) -> (Vec<&Event>, Vec<&Event>) {
    events.iter().partition(|event| !event.has_started(now))
}

/// Number of pages needed for `total` items.
///
/// An empty list still has one (empty) page, so page numbers always have a
/// valid range to clamp into.
#[must_use]
pub const fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = if page_size == 0 { 1 } else { page_size };
    let pages = total.div_ceil(page_size);
    if pages == 0 { 1 } else { pages }
}

/// Clamp a 1-based page number into `[1, page_count(total, page_size)]`.
#[must_use]
pub const fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    let max = page_count(total, page_size);
    if page == 0 {
        1
    } else if page > max {
        max
    } else {
        page
    }
}

/// The slice of `items` on 1-based page `page`.
///
/// The page number is clamped into range first, so the result is the last
/// page for an overlarge page number rather than an empty slice.
#[must_use]
pub fn page_slice<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let page_size = page_size.max(1);
    let page = clamp_page(page, items.len(), page_size);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    if start >= items.len() {
        &[]
    } else {
        &items[start..end]
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Checkout
// ═══════════════════════════════════════════════════════════════════════

/// Phase of the checkout state machine.
///
/// Linear flow: `Loading → Ready → Submitting → Redirected`. A submission
/// failure returns to `Ready` with [`CheckoutState::error`] set and the
/// form preserved; a load failure ends in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutPhase {
    /// Event and ticket types being fetched; buyer prefill in flight.
    Loading,

    /// Data loaded; the user is adjusting quantities and details.
    Ready,

    /// Exactly one payment-link request is in flight.
    Submitting,

    /// Payment link obtained; the shell navigates to `url`.
    Redirected {
        /// Payment provider URL to navigate to.
        url: String,
    },

    /// The checkout could not load its data.
    Failed {
        /// Failure description.
        message: String,
    },
}

/// Single-event checkout state.
///
/// One instance per checkout page; the selection map and form fields are
/// transient and die with the instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Event being purchased.
    pub event_id: EventId,

    /// Loaded event, present from `Ready` onwards.
    pub event: Option<Event>,

    /// Loaded ticket types, present from `Ready` onwards.
    pub ticket_types: Vec<TicketType>,

    /// Requested quantity per ticket type; entries are always > 0.
    pub selected: BTreeMap<TicketTypeId, u32>,

    /// Promotional code input, passed through verbatim to the backend.
    pub promo_code: String,

    /// Buyer contact details (form input, or session prefill).
    pub buyer: BuyerDetails,

    /// Signed-in user id from the session store; when present, buyer
    /// details are locked to the prefilled profile.
    pub known_user_id: Option<UserId>,

    /// Current phase of the state machine.
    pub phase: CheckoutPhase,

    /// Message from the most recent failed submission.
    pub error: Option<String>,
}

impl CheckoutState {
    /// Create a fresh checkout for one event, in `Loading`.
    #[must_use]
    pub const fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            event: None,
            ticket_types: Vec::new(),
            selected: BTreeMap::new(),
            promo_code: String::new(),
            buyer: BuyerDetails {
                email: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                phone_number: String::new(),
            },
            known_user_id: None,
            phase: CheckoutPhase::Loading,
            error: None,
        }
    }

    /// Running total: `sum(quantity × unit price)` over selected types.
    ///
    /// Saturates at the maximum representable amount on overflow.
    #[must_use]
    pub fn total(&self) -> Money {
        self.ticket_types
            .iter()
            .filter_map(|ticket_type| {
                self.selected
                    .get(&ticket_type.id)
                    .map(|quantity| ticket_type.price.checked_mul(*quantity))
            })
            .try_fold(Money::from_cents(0), |acc, line| {
                line.and_then(|line| acc.checked_add(line))
            })
            .unwrap_or(Money::MAX)
    }

    /// Purchase lines for the payment request.
    ///
    /// Zero-quantity selections are excluded; ordering follows the loaded
    /// ticket-type list.
    #[must_use]
    pub fn purchases(&self) -> Vec<TicketOrder> {
        self.ticket_types
            .iter()
            .filter_map(|ticket_type| {
                let quantity = *self.selected.get(&ticket_type.id)?;
                (quantity > 0).then_some(TicketOrder {
                    ticket_type_id: ticket_type.id,
                    quantity,
                })
            })
            .collect()
    }

    /// Build the write-once payment request payload.
    ///
    /// An empty promo-code input is omitted from the payload entirely.
    #[must_use]
    pub fn payment_request(&self) -> PaymentRequest {
        let promo_code = self.promo_code.trim();
        PaymentRequest {
            user_id: self.known_user_id,
            event_id: self.event_id,
            buyer: self.buyer.clone(),
            purchases: self.purchases(),
            promo_code: (!promo_code.is_empty()).then(|| promo_code.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Post-payment confirmation
// ═══════════════════════════════════════════════════════════════════════

/// Return route from the payment provider.
///
/// The provider redirects back to `/success-payment/{confirmation}` after a
/// completed payment, or to `/failed-payment` after a cancelled or declined
/// one. Only a completed return triggers ticket generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentReturn {
    /// Payment completed; the path carried a confirmation id.
    Completed(ConfirmationId),

    /// Payment cancelled or declined by the provider.
    Cancelled,
}

impl PaymentReturn {
    /// Parse a payment-provider return path.
    ///
    /// Returns `None` for paths that are not payment returns.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        if path == "/failed-payment" {
            return Some(Self::Cancelled);
        }
        let confirmation = path.strip_prefix("/success-payment/")?;
        if confirmation.is_empty() || confirmation.contains('/') {
            return None;
        }
        Some(Self::Completed(ConfirmationId::new(confirmation)))
    }
}

/// Outcome of the post-payment confirmation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationOutcome {
    /// No confirmation processed yet.
    NotStarted,

    /// Ticket generation request in flight.
    Pending,

    /// Tickets generated.
    Generated {
        /// Number of generated tickets.
        count: usize,
    },

    /// Ticket generation failed; the user should contact support.
    Failed {
        /// Failure description.
        message: String,
    },

    /// The payment itself was cancelled; no generation attempted.
    Cancelled,
}

/// Post-payment confirmation state.
///
/// Consumes a confirmation id exactly once: repeat confirmations for the
/// same page instance are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationState {
    /// The confirmation id being processed, once seen.
    pub confirmation: Option<ConfirmationId>,

    /// Where the flow currently stands.
    pub outcome: ConfirmationOutcome,
}

impl ConfirmationState {
    /// Create a fresh confirmation state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            confirmation: None,
            outcome: ConfirmationOutcome::NotStarted,
        }
    }
}

impl Default for ConfirmationState {
    fn default() -> Self {
        Self::new()
    }
}
