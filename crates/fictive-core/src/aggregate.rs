//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots whose state is rebuilt by replaying their
/// event stream.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate emits and replays.
    type Event: DomainEvent;

    /// Returns the identifier of the stream this aggregate owns.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the number of committed events applied so far.
    fn version(&self) -> i64;

    /// Apply one event to the in-memory state. Used both during replay
    /// and after a command method emits new events.
    fn apply(&mut self, event: &Self::Event);

    /// Events emitted by command methods but not yet persisted.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Forget uncommitted events once they have been appended to storage.
    fn clear_uncommitted_events(&mut self);
}
