/// Execute an aggregate command deterministically (no IO).
///
/// Provides the canonical lifecycle in one step:
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (pure, no mutation)
/// 2. **Evolve**: applies each event to the aggregate via `aggregate.apply(event)`
///
/// The returned events are exactly the ones applied, in order, so the caller can
/// publish them afterwards. If `handle` fails nothing is applied.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: satchel_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
