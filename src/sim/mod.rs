//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (virtual millisecond clock)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies; presentation is driven by
//!   the `GameEvent` stream

pub mod actor;
pub mod autopilot;
pub mod boss;
pub mod clock;
pub mod collectibles;
pub mod combat;
pub mod flow;
pub mod level;
pub mod motion;
pub mod physics;
pub mod stamina;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorId, ActorKind, Anim, Facing};
pub use autopilot::autopilot;
pub use clock::{Deferred, Millis, Scheduler};
pub use collectibles::{Collectible, CollectibleSet};
pub use combat::HitSource;
pub use level::{LevelConfig, LevelError, builtin_levels, load_levels, parse_levels};
pub use physics::{Aabb, ArcadePhysics, Body, Physics};
pub use stamina::{BarState, Stamina};
pub use state::{
    Banner, Cue, GameEvent, GamePhase, GameState, Hud, Outcome, Sound, Transition,
};
pub use tick::{InputEdges, TickInput, tick};
