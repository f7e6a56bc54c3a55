//! Wire data model for the ProntoTicket backend API.
//!
//! The backend serializes with PascalCase field names (`Id`, `Name`,
//! `StartDateTimeUtc`, ...). All types here carry explicit serde renames so
//! a shape mismatch is a deserialization error instead of a silently-empty
//! field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a ticket type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketTypeId(Uuid);

impl TicketTypeId {
    /// Creates a new random `TicketTypeId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketTypeId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketTypeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a producer (the organizing entity behind an event)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducerId(Uuid);

impl ProducerId {
    /// Creates a new random `ProducerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ProducerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProducerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a signed-in user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque confirmation/transaction identifier from the payment provider
///
/// Returned via the post-payment redirect URL and consumed exactly once to
/// request ticket generation. Unlike the other identifiers this is not a
/// UUID: its format is owned by the payment provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationId(String);

impl ConfirmationId {
    /// Wrap a confirmation id extracted from the redirect URL
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw confirmation string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Monetary amount in cents
///
/// Stored as cents internally; the backend's wire format is a decimal
/// dollar amount, handled by the serde implementations below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(u64);

impl Money {
    /// Largest representable amount
    pub const MAX: Self = Self(u64::MAX);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (dollars * 100 > `u64::MAX`).
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_dollars(dollars: u64) -> Self {
        match dollars.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_dollars overflow"),
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checked addition
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Checked multiplication by a quantity
    #[must_use]
    pub const fn checked_mul(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// True for a zero amount
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    #[allow(clippy::cast_precision_loss)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        if !dollars.is_finite() || dollars < 0.0 {
            return Err(serde::de::Error::custom(
                "price must be a finite, non-negative number",
            ));
        }
        let cents = (dollars * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(serde::de::Error::custom("price out of range"));
        }
        Ok(Self(cents as u64))
    }
}

// ============================================================================
// Catalog entities
// ============================================================================

/// A ticketed occurrence with capacity, schedule, and location
///
/// Read-only in the storefront core; created and edited by the admin flows
/// the backend owns. The backend guarantees `EndDateTimeUtc` is after
/// `StartDateTimeUtc`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// Event identifier
    pub id: EventId,

    /// Display name
    pub name: String,

    /// Long description
    pub description: String,

    /// Short description shown on catalog cards
    #[serde(default)]
    pub short_description: String,

    /// Total capacity across all ticket types
    pub capacity: u32,

    /// Start of the event (UTC)
    #[serde(rename = "StartDateTimeUtc")]
    pub starts_at: DateTime<Utc>,

    /// End of the event (UTC)
    #[serde(rename = "EndDateTimeUtc")]
    pub ends_at: DateTime<Utc>,

    /// Venue address; older backend payloads call this field `Location`
    #[serde(alias = "Location")]
    pub address: String,

    /// Cover image URL
    #[serde(default)]
    pub image_url: String,

    /// Owning producer
    pub producer_id: ProducerId,

    /// Free-form tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Event {
    /// True once the event's end time has passed
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.ends_at <= now
    }

    /// True once the event has started
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now
    }
}

/// A priced admission category for one event (e.g. "VIP", "General")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketType {
    /// Ticket type identifier
    pub id: TicketTypeId,

    /// Owning event
    pub event_id: EventId,

    /// Display label; the backend calls this field `Type`
    #[serde(rename = "Type")]
    pub label: String,

    /// Unit price
    pub price: Money,

    /// Total tickets available for this type
    pub total_tickets: u32,
}

// ============================================================================
// Payment payloads
// ============================================================================

/// Buyer contact details submitted with a purchase
///
/// Prefilled from the session store when a user is signed in, otherwise
/// collected from the checkout form. Never persisted beyond the single
/// payment request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuyerDetails {
    /// Contact email
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Phone number
    pub phone_number: String,
}

/// One line of a purchase: a ticket type and a positive quantity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketOrder {
    /// Ticket type being purchased
    pub ticket_type_id: TicketTypeId,

    /// Requested quantity (always > 0 on the wire)
    pub quantity: u32,
}

/// Write-once payload for `POST /payments/link`
///
/// Zero-quantity selections are excluded before this payload is built; the
/// known user id and the promo code are omitted from the JSON entirely when
/// absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentRequest {
    /// Signed-in user id, when a session exists
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<UserId>,

    /// Event being purchased
    pub event_id: EventId,

    /// Buyer contact details
    #[serde(flatten)]
    pub buyer: BuyerDetails,

    /// Purchased ticket types and quantities
    pub purchases: Vec<TicketOrder>,

    /// Optional promotional code, interpreted entirely by the backend
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub promo_code: Option<String>,
}

/// Request body for `POST /tickets/generate`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateTicketsRequest {
    /// Confirmation id from the payment provider's redirect
    pub confirmation: ConfirmationId,
}

// ============================================================================
// Payment-link response
// ============================================================================

/// Redirect target parsed from the payment-link response body
///
/// The backend answers `POST /payments/link` in one of two shapes: the bare
/// redirect URL as plain text, or a JSON object with a `stripeLink` field.
/// Anything else is a malformed response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTarget {
    url: String,
}

impl RedirectTarget {
    /// Parse a payment-link response body into a redirect target
    ///
    /// # Errors
    ///
    /// Returns [`crate::BackendError::MalformedResponse`] when the body is
    /// neither a bare URL nor a JSON object with a string `stripeLink`.
    pub fn parse(body: &str) -> Result<Self, crate::BackendError> {
        if body.starts_with("http") {
            return Ok(Self {
                url: body.to_string(),
            });
        }

        #[derive(Deserialize)]
        struct Linked {
            #[serde(rename = "stripeLink")]
            stripe_link: String,
        }

        match serde_json::from_str::<Linked>(body) {
            Ok(linked) => Ok(Self {
                url: linked.stripe_link,
            }),
            Err(_) => Err(crate::BackendError::MalformedResponse(
                "payment-link response contained no redirect URL".to_string(),
            )),
        }
    }

    /// The URL the browser should be navigated to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Consume the target, yielding the URL
    #[must_use]
    pub fn into_url(self) -> String {
        self.url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::BackendError;

    fn sample_event_json() -> &'static str {
        r#"{
            "Id": "7f8d2d0a-4d3e-4b2f-9a63-0d6f2f5f2a11",
            "Name": "Harbour Jazz Night",
            "Description": "An evening of live jazz by the water.",
            "ShortDescription": "Live jazz by the water",
            "Capacity": 350,
            "StartDateTimeUtc": "2025-06-01T19:00:00Z",
            "EndDateTimeUtc": "2025-06-01T23:00:00Z",
            "Address": "Pier 4, Harbourfront",
            "ImageUrl": "https://img.example/jazz.jpg",
            "ProducerId": "3d0c6b1e-9f0a-45f2-8a4e-2a7f9b1c0d22",
            "Tags": ["music", "jazz"]
        }"#
    }

    #[test]
    fn test_event_deserializes_pascal_case() {
        let event: Event = serde_json::from_str(sample_event_json()).unwrap();
        assert_eq!(event.name, "Harbour Jazz Night");
        assert_eq!(event.capacity, 350);
        assert_eq!(event.address, "Pier 4, Harbourfront");
        assert!(event.tags.contains("jazz"));
    }

    #[test]
    fn test_event_accepts_legacy_location_field() {
        let json = r#"{
            "Id": "7f8d2d0a-4d3e-4b2f-9a63-0d6f2f5f2a11",
            "Name": "Harbour Jazz Night",
            "Description": "desc",
            "Capacity": 10,
            "StartDateTimeUtc": "2025-06-01T19:00:00Z",
            "EndDateTimeUtc": "2025-06-01T23:00:00Z",
            "Location": "Pier 4",
            "ProducerId": "3d0c6b1e-9f0a-45f2-8a4e-2a7f9b1c0d22"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.address, "Pier 4");
        // Optional fields default
        assert_eq!(event.short_description, "");
        assert!(event.tags.is_empty());
    }

    #[test]
    fn test_event_end_and_start_helpers() {
        let event: Event = serde_json::from_str(sample_event_json()).unwrap();
        let before = "2025-06-01T18:00:00Z".parse().unwrap();
        let during = "2025-06-01T20:00:00Z".parse().unwrap();
        let after = "2025-06-02T00:00:00Z".parse().unwrap();

        assert!(!event.has_started(before));
        assert!(!event.has_ended(before));
        assert!(event.has_started(during));
        assert!(!event.has_ended(during));
        assert!(event.has_ended(after));
    }

    #[test]
    fn test_ticket_type_deserializes_type_field() {
        let json = r#"{
            "Id": "aa8d2d0a-4d3e-4b2f-9a63-0d6f2f5f2a11",
            "EventId": "7f8d2d0a-4d3e-4b2f-9a63-0d6f2f5f2a11",
            "Type": "VIP",
            "Price": 25.5,
            "TotalTickets": 40
        }"#;
        let ticket_type: TicketType = serde_json::from_str(json).unwrap();
        assert_eq!(ticket_type.label, "VIP");
        assert_eq!(ticket_type.price, Money::from_cents(2550));
        assert_eq!(ticket_type.total_tickets, 40);
    }

    #[test]
    fn test_money_rejects_negative_price() {
        let result = serde_json::from_str::<Money>("-1.0");
        assert!(result.is_err());
    }

    #[test]
    fn test_money_serializes_as_dollars() {
        let json = serde_json::to_string(&Money::from_cents(2550)).unwrap();
        assert_eq!(json, "25.5");
    }

    #[test]
    fn test_money_arithmetic() {
        let price = Money::from_dollars(10);
        assert_eq!(price.checked_mul(2), Some(Money::from_dollars(20)));
        assert_eq!(
            Money::from_dollars(20).checked_add(Money::from_dollars(20)),
            Some(Money::from_dollars(40))
        );
        assert_eq!(Money::from_cents(u64::MAX).checked_mul(2), None);
        assert_eq!(format!("{}", Money::from_cents(2505)), "$25.05");
    }

    #[test]
    fn test_payment_request_omits_absent_optionals() {
        let request = PaymentRequest {
            user_id: None,
            event_id: EventId::new(),
            buyer: BuyerDetails {
                email: "a@b.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone_number: String::new(),
            },
            purchases: vec![TicketOrder {
                ticket_type_id: TicketTypeId::new(),
                quantity: 2,
            }],
            promo_code: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("UserId"));
        assert!(!object.contains_key("PromoCode"));
        // Buyer details are flattened to top-level PascalCase fields
        assert_eq!(object["Email"], "a@b.com");
        assert_eq!(object["Purchases"][0]["Quantity"], 2);
    }

    #[test]
    fn test_payment_request_includes_known_user() {
        let user_id = UserId::new();
        let request = PaymentRequest {
            user_id: Some(user_id),
            event_id: EventId::new(),
            buyer: BuyerDetails::default(),
            purchases: vec![],
            promo_code: Some("EARLYBIRD".to_string()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["UserId"], serde_json::json!(user_id));
        assert_eq!(value["PromoCode"], "EARLYBIRD");
    }

    #[test]
    fn test_generate_request_wire_shape() {
        let request = GenerateTicketsRequest {
            confirmation: ConfirmationId::new("cs_test_abc123"),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"Confirmation":"cs_test_abc123"}"#);
    }

    #[test]
    fn test_redirect_target_bare_url() {
        let target = RedirectTarget::parse("https://pay.example/abc").unwrap();
        assert_eq!(target.url(), "https://pay.example/abc");
    }

    #[test]
    fn test_redirect_target_stripe_link_json() {
        let target = RedirectTarget::parse(r#"{"stripeLink":"https://pay.example/xyz"}"#).unwrap();
        assert_eq!(target.url(), "https://pay.example/xyz");
    }

    #[test]
    fn test_redirect_target_rejects_other_shapes() {
        let result = RedirectTarget::parse(r#"{"other":"field"}"#);
        assert!(matches!(result, Err(BackendError::MalformedResponse(_))));

        let wrong_type = RedirectTarget::parse(r#"{"stripeLink":42}"#);
        assert!(matches!(wrong_type, Err(BackendError::MalformedResponse(_))));

        let empty = RedirectTarget::parse("");
        assert!(empty.is_err());
    }
}
