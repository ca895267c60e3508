mod bookings;
mod contact;
mod gate;
mod health;
mod metrics;

pub use bookings::bookings_handler;
pub use contact::contact_handler;
pub use gate::method_not_allowed;
pub use health::health_handler;
pub use metrics::metrics_handler;
