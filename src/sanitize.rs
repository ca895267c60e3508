use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{BookingSubmission, ContactSubmission};

static ANGLE_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]").unwrap());
static JS_PROTOCOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)on\w+=").unwrap());
static NOT_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9+]").unwrap());

// Strip markup fragments that could turn into script when echoed into an email or admin page
pub fn sanitize_text(input: &str) -> String {
    let s = ANGLE_BRACKETS.replace_all(input.trim(), "");
    let s = JS_PROTOCOL.replace_all(&s, "");
    EVENT_HANDLER.replace_all(&s, "").into_owned()
}

pub fn sanitize_email(input: &str) -> String {
    sanitize_text(input).to_lowercase()
}

pub fn sanitize_phone(input: &str) -> String {
    NOT_PHONE.replace_all(input, "").into_owned()
}

pub fn booking(b: BookingSubmission) -> BookingSubmission {
    BookingSubmission {
        name: sanitize_text(&b.name),
        email: sanitize_email(&b.email),
        phone: sanitize_phone(&b.phone),
        message: sanitize_text(&b.message),
        ..b
    }
}

pub fn contact(c: ContactSubmission) -> ContactSubmission {
    ContactSubmission {
        name: sanitize_text(&c.name),
        email: sanitize_email(&c.email),
        phone: c.phone.as_deref().map(sanitize_phone),
        subject: sanitize_text(&c.subject),
        message: sanitize_text(&c.message),
    }
}
