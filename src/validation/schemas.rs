use once_cell::sync::Lazy;
use regex::Regex;

use super::{Check, FieldKind, FieldRule, Fields, Presence, Schema, Submission};
use crate::models::{BookingSubmission, ContactSubmission, EventType};

static NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());
static GHANA_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?233[0-9]{9}$").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

pub const MAX_GUESTS: u32 = 1390;

static BOOKING_NAME: [Check; 3] = [
    Check::MinLen(2, "Name must be at least 2 characters"),
    Check::MaxLen(100, "Name must not exceed 100 characters"),
    Check::Pattern(&NAME_CHARS, "Name contains invalid characters"),
];
static CONTACT_NAME: [Check; 2] = [
    Check::MinLen(2, "Name must be at least 2 characters"),
    Check::MaxLen(100, "Name must not exceed 100 characters"),
];
static EMAIL: [Check; 2] = [
    Check::Email("Invalid email address"),
    Check::MaxLen(255, "Email must not exceed 255 characters"),
];
static PHONE: [Check; 2] = [
    Check::Pattern(&GHANA_PHONE, "Invalid Ghana phone number format"),
    Check::MaxLen(20, "Phone number too long"),
];
static DATE_FORMAT: [Check; 1] = [Check::Pattern(&DATE, "Invalid date format")];
static TIME_FORMAT: [Check; 1] = [Check::Pattern(&TIME, "Invalid time format")];
static GUESTS: [Check; 1] = [Check::Pattern(&DIGITS, "Guests must be a number")];
static BOOKING_MESSAGE: [Check; 1] = [Check::MaxLen(
    1000,
    "Message must not exceed 1000 characters",
)];
static SUBJECT: [Check; 2] = [
    Check::MinLen(5, "Subject must be at least 5 characters"),
    Check::MaxLen(200, "Subject must not exceed 200 characters"),
];
static CONTACT_MESSAGE: [Check; 2] = [
    Check::MinLen(10, "Message must be at least 10 characters"),
    Check::MaxLen(1000, "Message must not exceed 1000 characters"),
];

pub static BOOKING_SCHEMA: [FieldRule; 8] = [
    FieldRule {
        name: "name",
        presence: Presence::Required,
        kind: FieldKind::Text(&BOOKING_NAME),
    },
    FieldRule {
        name: "email",
        presence: Presence::Required,
        kind: FieldKind::Text(&EMAIL),
    },
    FieldRule {
        name: "phone",
        presence: Presence::Required,
        kind: FieldKind::Text(&PHONE),
    },
    FieldRule {
        name: "eventType",
        presence: Presence::Required,
        kind: FieldKind::Choice(&EventType::LITERALS),
    },
    FieldRule {
        name: "date",
        presence: Presence::Required,
        kind: FieldKind::Text(&DATE_FORMAT),
    },
    FieldRule {
        name: "time",
        presence: Presence::Required,
        kind: FieldKind::Text(&TIME_FORMAT),
    },
    FieldRule {
        name: "guests",
        presence: Presence::Required,
        kind: FieldKind::Count {
            checks: &GUESTS,
            min: (1, "Number must be greater than or equal to 1"),
            max: (MAX_GUESTS, "Exceeds maximum capacity"),
        },
    },
    FieldRule {
        name: "message",
        presence: Presence::DefaultEmpty,
        kind: FieldKind::Text(&BOOKING_MESSAGE),
    },
];

pub static CONTACT_SCHEMA: [FieldRule; 5] = [
    FieldRule {
        name: "name",
        presence: Presence::Required,
        kind: FieldKind::Text(&CONTACT_NAME),
    },
    FieldRule {
        name: "email",
        presence: Presence::Required,
        kind: FieldKind::Text(&EMAIL),
    },
    FieldRule {
        name: "phone",
        presence: Presence::Optional,
        kind: FieldKind::Text(&PHONE),
    },
    FieldRule {
        name: "subject",
        presence: Presence::Required,
        kind: FieldKind::Text(&SUBJECT),
    },
    FieldRule {
        name: "message",
        presence: Presence::Required,
        kind: FieldKind::Text(&CONTACT_MESSAGE),
    },
];

impl Submission for BookingSubmission {
    fn schema() -> &'static Schema {
        &BOOKING_SCHEMA
    }

    fn from_fields(mut fields: Fields) -> Self {
        Self {
            name: fields.text("name"),
            email: fields.text("email"),
            phone: fields.text("phone"),
            event_type: EventType::ALL[fields.choice("eventType")],
            date: fields.text("date"),
            time: fields.text("time"),
            guests: fields.count("guests"),
            message: fields.text("message"),
        }
    }
}

impl Submission for ContactSubmission {
    fn schema() -> &'static Schema {
        &CONTACT_SCHEMA
    }

    fn from_fields(mut fields: Fields) -> Self {
        Self {
            name: fields.text("name"),
            email: fields.text("email"),
            phone: fields.optional_text("phone"),
            subject: fields.text("subject"),
            message: fields.text("message"),
        }
    }
}
