use tracing::info;

use super::SagaArgs;
use super::run::drive;
use crate::error::Result;
use crate::journal::Journal;
use crate::scenario::Scenario;
use crate::services::trip_executor;

/// Rebuild the booking from the journal's last entry and carry on.
///
/// An empty or missing journal has nothing to resume; the executor reports
/// that as a missing transaction.
pub(crate) fn run(args: &SagaArgs) -> Result<()> {
    let scenario = Scenario::load(args.scenario.as_deref())?;
    let journal = Journal::new(&args.journal);
    let executor = trip_executor(&scenario, journal.clone())?;

    let last = journal.last()?;
    if let Some(booking) = &last {
        info!(trip = %booking.trip_id, state = %booking.state, "resuming trip");
    }

    drive(&executor, args, last)
}
