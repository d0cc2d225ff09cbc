//! Shared vocabulary for the Eldorado game engine.
//!
//! Everything here crosses a crate boundary: identity newtypes used as map
//! keys, the per-round player posture, event-log tags, and the report rows
//! handed to the presentation layer. All of it is serde-serializable so an
//! embedding bot can ship snapshots to whatever renderer it uses.

mod types;

pub use types::{DangerKind, EventTag, PlayerId, PlayerView, Posture, RankingEntry, RoomId};
