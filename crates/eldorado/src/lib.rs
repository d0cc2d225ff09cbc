//! Eldorado: a multiplayer push-your-luck treasure game engine.
//!
//! The engine runs game rooms through rounds of simultaneous hidden
//! choices — keep exploring or return to camp — against a shuffled deck of
//! gold, danger, and treasure cards. It is a library: rendering, identity,
//! and message transport belong to the embedder, which implements the
//! [`Presenter`](eldorado_room::Presenter) trait and drives the engine
//! through an [`ExpeditionService`].
//!
//! # Example
//!
//! ```rust,ignore
//! use eldorado::prelude::*;
//!
//! let service = ExpeditionService::new(
//!     RoomConfig::default(),
//!     GameConfig::default(),
//!     Arc::new(MyBotPresenter::new()),
//! );
//!
//! let room = service.create_room(host).await?;
//! service.join_room(room, guest).await?;
//! service.start_game(room, host).await?;
//! service.submit_action(guest, Action::Return).await?;
//! ```

mod error;
mod service;

pub use error::EldoradoError;
pub use service::ExpeditionService;

/// Convenient re-exports of the working set.
pub mod prelude {
    pub use crate::{EldoradoError, ExpeditionService};
    pub use eldorado_deck::{Card, DeckError, RoundDeck};
    pub use eldorado_game::{
        Action, GameConfig, GameError, GameState, Outcome, RoundTransition, TreasureClaim,
    };
    pub use eldorado_protocol::{
        DangerKind, EventTag, PlayerId, PlayerView, Posture, RankingEntry, RoomId,
    };
    pub use eldorado_room::{
        AdvanceReport, Presenter, RoomConfig, RoomError, RoomManager, RoomSnapshot, RoomStatus,
    };
    pub use eldorado_timer::{TimerConfig, TimerEvent, TimerEventKind, TurnTimer};
}
