//! Room lifecycle management for Eldorado.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its game
//! state, turn timer, and player list. All mutation for one room flows
//! through the actor's command channel in arrival order — the per-room
//! serialization the engine's concurrency model requires — while different
//! rooms run fully in parallel.
//!
//! # Key types
//!
//! - [`Presenter`] — the presentation/transport boundary the embedder implements
//! - [`RoomManager`] — creates/destroys rooms, routes players
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomStatus`] — lifecycle state machine
//! - [`RoomConfig`] — player-count limits

mod config;
mod error;
mod manager;
mod presenter;
mod room;

pub use config::{RoomConfig, RoomStatus};
pub use error::RoomError;
pub use manager::RoomManager;
pub use presenter::{Presenter, RoomSnapshot};
pub use room::{AdvanceReport, RoomHandle};
