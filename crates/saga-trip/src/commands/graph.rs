use saga_engine::NopLogger;

use crate::error::Result;
use crate::scenario::Scenario;
use crate::services::trip_executor;

pub(crate) fn run() -> Result<()> {
    let executor = trip_executor(&Scenario::default(), NopLogger)?;
    let graph = executor.graph();

    println!("Initial state: {}", graph.initial_state());
    println!("Transitions:");
    for state in graph.states() {
        let next: Vec<String> = graph
            .legal_next(state)
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .collect();
        println!("  {state} -> {}", next.join(" | "));
    }

    let finals: Vec<String> = executor
        .final_states()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Final states: {}", finals.join(", "));
    Ok(())
}
