use std::fmt;

use saga_engine::{Interrupted, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum TripState {
    Init,
    HotelBooked,
    HotelFailed,
    HotelCancelled,
    FlightBooked,
    FlightFailed,
    FlightCancelled,
    CarRented,
    CarFailed,
    CarReturned,
}

impl fmt::Display for TripState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::HotelBooked => "hotel-booked",
            Self::HotelFailed => "hotel-failed",
            Self::HotelCancelled => "hotel-cancelled",
            Self::FlightBooked => "flight-booked",
            Self::FlightFailed => "flight-failed",
            Self::FlightCancelled => "flight-cancelled",
            Self::CarRented => "car-rented",
            Self::CarFailed => "car-failed",
            Self::CarReturned => "car-returned",
        };
        f.write_str(name)
    }
}

/// Error from a booking service or from the journal.
#[derive(Debug, Error)]
pub(crate) enum BookingError {
    #[error("{service} service unavailable")]
    Unavailable { service: Service },

    #[error("{service} service refused to cancel")]
    CancellationRefused { service: Service },

    #[error("booking interrupted")]
    Interrupted(#[from] Interrupted),

    #[error("failed to write journal")]
    JournalWrite(#[source] std::io::Error),

    #[error("failed to encode journal entry")]
    JournalEncode(#[source] serde_json::Error),
}

/// One trip moving through the booking saga. Every step yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Booking {
    pub trip_id: String,
    pub state: TripState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<String>,
}

impl Booking {
    pub(crate) fn new(trip_id: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            state: TripState::Init,
            hotel: None,
            flight: None,
            car: None,
        }
    }

    pub(crate) fn moved_to(&self, state: TripState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }

    pub(crate) fn with_reference(&self, service: Service, reference: Option<String>) -> Self {
        let mut next = self.clone();
        match service {
            Service::Hotel => next.hotel = reference,
            Service::Flight => next.flight = reference,
            Service::Car => next.car = reference,
        }
        next
    }

    pub(crate) fn reference(&self, service: Service) -> Option<&str> {
        match service {
            Service::Hotel => self.hotel.as_deref(),
            Service::Flight => self.flight.as_deref(),
            Service::Car => self.car.as_deref(),
        }
    }
}

impl Transaction for Booking {
    type State = TripState;

    fn current_state(&self) -> TripState {
        self.state
    }
}
