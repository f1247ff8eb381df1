use std::fmt;

use saga_engine::{Action, Activity, Context, Executor, Logger, SagaError};
use tracing::info;

use crate::booking::{Booking, BookingError, TripState};
use crate::scenario::{Outcome, Scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Hotel,
    Flight,
    Car,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hotel => "hotel",
            Self::Flight => "flight",
            Self::Car => "car",
        })
    }
}

impl Service {
    /// Booking order of the trip saga.
    pub(crate) const ALL: [Self; 3] = [Self::Hotel, Self::Flight, Self::Car];

    fn success_state(self) -> TripState {
        match self {
            Self::Hotel => TripState::HotelBooked,
            Self::Flight => TripState::FlightBooked,
            Self::Car => TripState::CarRented,
        }
    }

    fn failure_state(self) -> TripState {
        match self {
            Self::Hotel => TripState::HotelFailed,
            Self::Flight => TripState::FlightFailed,
            Self::Car => TripState::CarFailed,
        }
    }

    fn rolled_back_state(self) -> TripState {
        match self {
            Self::Hotel => TripState::HotelCancelled,
            Self::Flight => TripState::FlightCancelled,
            Self::Car => TripState::CarReturned,
        }
    }

    fn reference_prefix(self) -> &'static str {
        match self {
            Self::Hotel => "HTL",
            Self::Flight => "FLT",
            Self::Car => "CAR",
        }
    }
}

/// Simulated reservation call against one service.
struct Reserve {
    service: Service,
    outcome: Outcome,
}

impl Action<Booking, BookingError> for Reserve {
    fn execute(&self, ctx: &Context, tx: &Booking) -> Result<Booking, BookingError> {
        ctx.check()?;
        match self.outcome {
            Outcome::Confirm => {
                let reference = format!("{}-{}", self.service.reference_prefix(), tx.trip_id);
                info!(service = %self.service, reference = %reference, "reservation confirmed");
                Ok(tx
                    .with_reference(self.service, Some(reference))
                    .moved_to(self.service.success_state()))
            }
            Outcome::Decline => {
                info!(service = %self.service, "reservation declined");
                Ok(tx.moved_to(self.service.failure_state()))
            }
            Outcome::Unavailable => Err(BookingError::Unavailable {
                service: self.service,
            }),
        }
    }

    fn name(&self) -> &str {
        match self.service {
            Service::Hotel => "book_hotel",
            Service::Flight => "book_flight",
            Service::Car => "rent_car",
        }
    }
}

/// Simulated cancellation of an earlier reservation.
///
/// A compensation has no failure state of its own, so a declined
/// cancellation is reported as an error like an unavailable service.
struct Cancel {
    service: Service,
    outcome: Outcome,
}

impl Action<Booking, BookingError> for Cancel {
    fn execute(&self, ctx: &Context, tx: &Booking) -> Result<Booking, BookingError> {
        ctx.check()?;
        match self.outcome {
            Outcome::Confirm => {
                info!(
                    service = %self.service,
                    reference = tx.reference(self.service),
                    "reservation cancelled"
                );
                Ok(tx
                    .with_reference(self.service, None)
                    .moved_to(self.service.rolled_back_state()))
            }
            Outcome::Decline => Err(BookingError::CancellationRefused {
                service: self.service,
            }),
            Outcome::Unavailable => Err(BookingError::Unavailable {
                service: self.service,
            }),
        }
    }

    fn name(&self) -> &str {
        match self.service {
            Service::Hotel => "cancel_hotel",
            Service::Flight => "cancel_flight",
            Service::Car => "return_car",
        }
    }
}

fn activity(service: Service, scenario: &Scenario) -> Activity<Booking, BookingError> {
    Activity::new(
        service.success_state(),
        service.failure_state(),
        service.rolled_back_state(),
    )
    .with_action(Reserve {
        service,
        outcome: scenario.step(service).book,
    })
}

/// Build the hotel, flight, car saga for `scenario`.
///
/// The car is booked last, so nothing ever needs to undo it.
pub(crate) fn trip_executor(
    scenario: &Scenario,
    logger: impl Logger<Booking, BookingError> + 'static,
) -> Result<Executor<Booking, BookingError>, SagaError<TripState, BookingError>> {
    let last = Service::ALL.len() - 1;
    let activities = Service::ALL.iter().enumerate().map(|(index, &service)| {
        let activity = activity(service, scenario);
        if index < last {
            activity.with_compensation(Cancel {
                service,
                outcome: scenario.step(service).cancel,
            })
        } else {
            activity
        }
    });

    Executor::builder(TripState::Init)
        .activities(activities)
        .logger(logger)
        .build()
}
