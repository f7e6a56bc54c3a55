//! HTTP-backed production implementation of [`TicketingApi`].

use crate::error::Result;
use crate::providers::TicketingApi;
use prontoticket_backend::{
    BackendClient, ConfirmationId, Event, EventId, PaymentRequest, RedirectTarget, TicketType,
};
use std::future::Future;

/// [`TicketingApi`] implementation over the real backend REST API.
#[derive(Clone)]
pub struct HttpTicketingApi {
    client: BackendClient,
}

impl HttpTicketingApi {
    /// Wrap an existing backend client.
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Build from the `PRONTOTICKET_API_URL` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BackendClient::from_env())
    }
}

impl TicketingApi for HttpTicketingApi {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send {
        async move { Ok(self.client.list_events().await?) }
    }

    fn get_event(&self, id: EventId) -> impl Future<Output = Result<Event>> + Send {
        async move { Ok(self.client.get_event(id).await?) }
    }

    fn list_ticket_types(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<TicketType>>> + Send {
        async move { Ok(self.client.list_ticket_types(event_id).await?) }
    }

    fn create_payment_link(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<RedirectTarget>> + Send {
        async move { Ok(self.client.create_payment_link(request).await?) }
    }

    fn generate_tickets(
        &self,
        confirmation: &ConfirmationId,
    ) -> impl Future<Output = Result<usize>> + Send {
        async move { Ok(self.client.generate_tickets(confirmation).await?) }
    }
}
