//! # ProntoTicket Storefront
//!
//! Catalog, checkout, and confirmation state machines for the ProntoTicket
//! storefront.
//!
//! Each screen flow is implemented as a reducer over explicit state:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! - **Catalog**: fetches all events once, then filters (not-yet-ended,
//!   free-text search over name/address/short description) and paginates
//!   entirely client-side.
//! - **Checkout**: a linear state machine
//!   `Loading → Ready → Submitting → Redirected`, with submission failures
//!   returning to `Ready` with the form preserved. Exactly one payment-link
//!   request is in flight at a time.
//! - **Confirmation**: consumes the payment provider's confirmation id
//!   exactly once to trigger ticket generation, and surfaces success and
//!   failure distinctly.
//!
//! External collaborators (the backend REST API, the persisted session
//! store) are injected through the provider traits in [`providers`]; mock
//! implementations live in [`mocks`].

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod providers;
pub mod reducers;
pub mod state;

// Re-export main types for convenience
pub use actions::{CatalogAction, CheckoutAction, ConfirmationAction};
pub use config::CatalogConfig;
pub use environment::StorefrontEnvironment;
pub use error::{Result, StorefrontError};
pub use state::{
    CatalogState, CheckoutPhase, CheckoutState, ConfirmationOutcome, ConfirmationState,
    PaymentReturn,
};
