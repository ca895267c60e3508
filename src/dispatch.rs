use tracing::{debug, info};

use crate::models::{BookingSubmission, ContactSubmission};

/// Receives accepted submissions after sanitizing, ready to be emailed or stored.
pub trait Dispatch: Send + Sync {
    fn booking(&self, booking: &BookingSubmission);
    fn contact(&self, message: &ContactSubmission);
}

// Writes submissions to the log; the full sanitized payload only at debug
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatch;

impl Dispatch for LogDispatch {
    fn booking(&self, booking: &BookingSubmission) {
        info!(
            event_type = booking.event_type.as_str(),
            guests = booking.guests,
            date = %booking.date,
            "booking request accepted"
        );
        debug!(payload = %serde_json::to_string(booking).unwrap_or_default(), "booking payload");
    }

    fn contact(&self, message: &ContactSubmission) {
        info!(
            subject_len = message.subject.chars().count(),
            has_phone = message.phone.is_some(),
            "contact message accepted"
        );
        debug!(payload = %serde_json::to_string(message).unwrap_or_default(), "contact payload");
    }
}
