//! Arena simulation
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - One `World` context passed by `&mut` through each phase
//! - Frame-counted timers only (no wall-clock)
//! - Seeded RNG only, so a seed plus an input sequence replays exactly

pub mod bot_ai;
pub mod combat;
pub mod player;
pub mod rules;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use player::{PlayerController, PlayerInput, Stick};
pub use state::{
    Character, EntityId, GameEvent, GameMode, Gem, MatchConfig, MatchPhase, Particle, Projectile,
    Role, Score, Team, World,
};
pub use tick::tick;
pub use weapon::Weapon;
