use serde::Serialize;
use std::fmt;

// The two form submission endpoints, each with its own rate limit table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Contact,
    Booking,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Contact => "contact",
            Endpoint::Booking => "booking",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Kinds of booking the venue takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Football,
    Basketball,
    Event,
    Training,
    Other,
}

impl EventType {
    // Same order as ALL, the schema maps a literal to its variant by position
    pub const LITERALS: [&'static str; 5] = ["football", "basketball", "event", "training", "other"];

    pub const ALL: [EventType; 5] = [
        EventType::Football,
        EventType::Basketball,
        EventType::Event,
        EventType::Training,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Football => "football",
            EventType::Basketball => "basketball",
            EventType::Event => "event",
            EventType::Training => "training",
            EventType::Other => "other",
        }
    }
}

// Booking request after validation; guests already coerced to an integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: EventType,
    pub date: String, // YYYY-MM-DD, calendar validity checked by the date rule
    pub time: String, // HH:MM
    pub guests: u32,
    pub message: String,
}

// Contact form after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

// 200 body for both endpoints
#[derive(Debug, Clone, Serialize)]
pub struct Accepted {
    pub success: bool,
    pub message: &'static str,
}

impl Accepted {
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        let message = match endpoint {
            Endpoint::Contact => "Your message has been received. We'll get back to you soon.",
            Endpoint::Booking => {
                "Booking request submitted successfully. We'll contact you to confirm."
            }
        };
        Self {
            success: true,
            message,
        }
    }
}
