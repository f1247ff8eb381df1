mod graph;
mod resume;
mod run;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use saga_engine::{Context, Halted};

use crate::booking::{Booking, BookingError};
use crate::error::Result;
use crate::services::Service;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start a new trip from scratch
    Run(SagaArgs),
    /// Continue a trip from the last journaled state
    Resume(SagaArgs),
    /// Print the transition graph of the trip saga
    Graph,
}

#[derive(Args)]
pub(crate) struct SagaArgs {
    /// JSON-lines journal recording every transition
    #[arg(long, short = 'j', default_value = "trip.jsonl")]
    journal: PathBuf,

    /// TOML file scripting how each service answers
    #[arg(long, short = 's')]
    scenario: Option<PathBuf>,

    /// Give up on any step still running after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl SagaArgs {
    fn context(&self) -> Context {
        let ctx = Context::new();
        match self.timeout_secs {
            Some(secs) => ctx.with_timeout(Duration::from_secs(secs)),
            None => ctx,
        }
    }
}

impl Commands {
    pub(crate) fn execute(self) -> Result<()> {
        match self {
            Self::Run(args) => run::run(&args),
            Self::Resume(args) => resume::run(&args),
            Self::Graph => graph::run(),
        }
    }
}

fn print_booking(booking: &Booking) {
    println!("Trip {}: {}", booking.trip_id, booking.state);
    for service in Service::ALL {
        if let Some(reference) = booking.reference(service) {
            println!("  {service}: {reference}");
        }
    }
}

fn print_halt(halted: &Halted<Booking, BookingError>) {
    match halted.transaction() {
        Some(booking) => {
            println!("Trip {} halted at {}", booking.trip_id, booking.state);
            println!("Run `saga-trip resume` to continue from the journal.");
        }
        None => println!("Nothing to resume."),
    }
}
