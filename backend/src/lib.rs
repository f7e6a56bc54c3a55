//! # ProntoTicket Backend Client
//!
//! Typed client for the ProntoTicket backend REST API.
//!
//! The backend owns events, ticket types, payments, and ticket generation.
//! This crate covers the endpoints the storefront core consumes and defines
//! the wire data model, with validation at the network boundary: malformed
//! responses (negative prices, missing redirect links, unexpected casing)
//! are rejected before they can enter application state.
//!
//! ## Example
//!
//! ```no_run
//! use prontoticket_backend::BackendClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads PRONTOTICKET_API_URL, falling back to the local backend
//!     let client = BackendClient::from_env();
//!
//!     let events = client.list_events().await?;
//!     println!("{} events on sale", events.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::BackendClient;
pub use error::BackendError;
pub use types::{
    BuyerDetails, ConfirmationId, Event, EventId, Money, PaymentRequest, ProducerId,
    RedirectTarget, TicketOrder, TicketType, TicketTypeId, UserId,
};
