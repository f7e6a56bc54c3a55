//! Backend API client implementation

use crate::error::BackendError;
use crate::types::{
    ConfirmationId, Event, EventId, GenerateTicketsRequest, PaymentRequest, RedirectTarget,
    TicketType,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default backend base URL (the local development backend)
const DEFAULT_BASE_URL: &str = "http://localhost:5110/api";

/// Environment variable overriding the backend base URL
const BASE_URL_ENV: &str = "PRONTOTICKET_API_URL";

/// ProntoTicket backend API client
///
/// A thin typed wrapper over `reqwest` covering the endpoints the
/// storefront core consumes. No retries, no timeouts: failure handling is
/// the caller's state machine's responsibility.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new client against the given base URL
    ///
    /// A trailing slash on the base URL is tolerated.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a client from the `PRONTOTICKET_API_URL` environment variable
    ///
    /// Falls back to the local development backend when unset.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Fetch all events
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// unparseable bodies.
    pub async fn list_events(&self) -> Result<Vec<Event>, BackendError> {
        self.get_json("/events").await
    }

    /// Fetch a single event by id
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// unparseable bodies.
    pub async fn get_event(&self, id: EventId) -> Result<Event, BackendError> {
        self.get_json(&format!("/events/{id}")).await
    }

    /// Fetch the ticket types belonging to an event
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// unparseable bodies.
    pub async fn list_ticket_types(
        &self,
        event_id: EventId,
    ) -> Result<Vec<TicketType>, BackendError> {
        self.get_json(&format!("/tickettypes/event/{event_id}")).await
    }

    /// Request a payment redirect link for a purchase
    ///
    /// The response body is read as text and parsed into a
    /// [`RedirectTarget`]: either a bare URL or a JSON `stripeLink` object.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses (the body
    /// carries the backend's error message), or a body with no redirect URL.
    pub async fn create_payment_link(
        &self,
        request: &PaymentRequest,
    ) -> Result<RedirectTarget, BackendError> {
        let response = self
            .client
            .post(format!("{}/payments/link", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        RedirectTarget::parse(&body)
    }

    /// Trigger ticket generation for a completed payment
    ///
    /// Returns the number of generated tickets; the storefront consumes
    /// nothing else of the response shape.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// unparseable bodies.
    pub async fn generate_tickets(
        &self,
        confirmation: &ConfirmationId,
    ) -> Result<usize, BackendError> {
        let request = GenerateTicketsRequest {
            confirmation: confirmation.clone(),
        };

        let response = self
            .client
            .post(format!("{}/tickets/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let tickets: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        Ok(tickets.len())
    }

    /// GET a path and deserialize the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = BackendClient::new("http://localhost:5110/api/");
        assert_eq!(client.base_url, "http://localhost:5110/api");
    }

    #[test]
    fn test_client_keeps_custom_base_url() {
        let client = BackendClient::new("https://api.prontoticket.example/api");
        assert_eq!(client.base_url, "https://api.prontoticket.example/api");
    }
}
