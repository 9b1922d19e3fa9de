//! Fictive — Story bounded context.
//!
//! Owns the authoritative state of every story: creation, snippet
//! contribution, and the administrative finish that freezes a story and
//! unlocks full readability. Mutations on a single story are serialized;
//! independent stories proceed concurrently.

pub mod application;
pub mod domain;
