//! Provider traits for the storefront's external collaborators.
//!
//! The storefront core talks to two external systems: the backend REST API
//! and the persisted session store. Both are abstracted behind traits and
//! injected via [`crate::environment::StorefrontEnvironment`], so reducers
//! and their tests run at memory speed against the mocks in
//! [`crate::mocks`].

use crate::error::Result;
use prontoticket_backend::{
    BuyerDetails, ConfirmationId, Event, EventId, PaymentRequest, RedirectTarget, TicketType,
    UserId,
};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// HTTP-backed production providers
pub mod http;

/// Session store backed by a local JSON file
pub mod session;

pub use http::HttpTicketingApi;
pub use session::FileSessionStore;

/// Backend ticketing API.
///
/// Covers the five endpoints the storefront core consumes. No retries, no
/// timeouts: failure handling belongs to the calling state machine.
pub trait TicketingApi: Send + Sync {
    /// Fetch all events.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// malformed body.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Fetch a single event.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// malformed body.
    fn get_event(&self, id: EventId) -> impl Future<Output = Result<Event>> + Send;

    /// Fetch the ticket types for an event.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// malformed body.
    fn list_ticket_types(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<TicketType>>> + Send;

    /// Request a payment redirect link.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// response containing no redirect URL.
    fn create_payment_link(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<RedirectTarget>> + Send;

    /// Trigger ticket generation for a completed payment.
    ///
    /// Returns the number of generated tickets.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// malformed body.
    fn generate_tickets(
        &self,
        confirmation: &ConfirmationId,
    ) -> impl Future<Output = Result<usize>> + Send;
}

/// Persisted session store.
///
/// The analogue of the browser's local storage: key `user` holds a
/// JSON-encoded profile, key `token` an opaque bearer string. The
/// storefront core only ever reads; sign-in and sign-out flows own the
/// writes.
pub trait SessionStore: Send + Sync {
    /// Load the signed-in user's profile, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read or the profile entry is
    /// corrupt. A missing entry is `Ok(None)`, not an error.
    fn load_user(&self) -> impl Future<Output = Result<Option<StoredUser>>> + Send;

    /// Load the bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn load_token(&self) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Signed-in user profile as persisted by the session store.
///
/// All contact fields are optional on the wire; only the id is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredUser {
    /// User identifier.
    pub id: UserId,

    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl StoredUser {
    /// Buyer details prefilled from this profile.
    ///
    /// Missing fields become empty strings, matching what the checkout form
    /// would otherwise hold.
    #[must_use]
    pub fn buyer_details(&self) -> BuyerDetails {
        BuyerDetails {
            email: self.email.clone().unwrap_or_default(),
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            phone_number: self.phone_number.clone().unwrap_or_default(),
        }
    }
}
