use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::Args;
use crate::dispatch::{Dispatch, LogDispatch};
use crate::rate_limit::EndpointLimiters;

// app's shared state, built once at startup and handed to every handler
pub struct AppState {
    pub limiters: Arc<EndpointLimiters>,
    pub clock: Arc<dyn Clock>,
    pub processing_delay: Duration, // simulated latency of the downstream work
    pub dispatch: Arc<dyn Dispatch>,
}

impl AppState {
    pub fn new(
        contact_limit: u32,
        booking_limit: u32,
        window: Duration,
        processing_delay: Duration,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Self::with_dispatch(
            contact_limit,
            booking_limit,
            window,
            processing_delay,
            clock,
            Arc::new(LogDispatch),
        )
    }

    pub fn with_dispatch(
        contact_limit: u32,
        booking_limit: u32,
        window: Duration,
        processing_delay: Duration,
        clock: Arc<dyn Clock>,
        dispatch: Arc<dyn Dispatch>,
    ) -> Arc<Self> {
        Arc::new(Self {
            limiters: Arc::new(EndpointLimiters::new(
                contact_limit,
                booking_limit,
                window,
                Arc::clone(&clock),
            )),
            clock,
            processing_delay,
            dispatch,
        })
    }

    pub fn from_args(args: &Args, clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::new(
            args.contact_rate_limit,
            args.booking_rate_limit,
            args.rate_window(),
            args.processing_delay(),
            clock,
        )
    }
}
