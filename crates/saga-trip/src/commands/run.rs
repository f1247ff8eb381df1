use saga_engine::Executor;
use tracing::info;

use super::{SagaArgs, print_booking, print_halt};
use crate::booking::{Booking, BookingError};
use crate::error::Result;
use crate::journal::Journal;
use crate::scenario::Scenario;
use crate::services::trip_executor;

pub(crate) fn run(args: &SagaArgs) -> Result<()> {
    let scenario = Scenario::load(args.scenario.as_deref())?;
    let journal = Journal::new(&args.journal);
    let executor = trip_executor(&scenario, journal.clone())?;

    let booking = Booking::new(&scenario.trip_id);
    journal.start(&booking)?;
    info!(trip = %booking.trip_id, journal = %journal.path().display(), "starting trip");

    drive(&executor, args, booking)
}

pub(super) fn drive(
    executor: &Executor<Booking, BookingError>,
    args: &SagaArgs,
    booking: impl Into<Option<Booking>>,
) -> Result<()> {
    match executor.execute(&args.context(), booking) {
        Ok(done) => {
            print_booking(&done);
            Ok(())
        }
        Err(halted) => {
            print_halt(&halted);
            Err(halted.into())
        }
    }
}
