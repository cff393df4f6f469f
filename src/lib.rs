//! Brawl Arena - a top-down team arena shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (movement, bot AI, combat, mode rules)
//! - `camera`: Zoom/offset transform shared by rendering and pointer aiming
//! - `heroes`: Static hero roster and loot box catalog
//! - `shop`: Coins, hero unlocks and loot boxes
//! - `persistence`: Key-value profile storage (LocalStorage on web)
//! - `commentary`: Announcer request queue and on-screen message log
//! - `settings`: Player preferences

pub mod camera;
pub mod commentary;
pub mod heroes;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod shop;
pub mod sim;

pub use camera::Camera;
pub use heroes::{HERO_ROSTER, HeroData, HeroStats, LOOT_BOXES, LootBoxConfig};
pub use settings::{QualityPreset, Settings};
pub use shop::{Shop, ShopError};

use glam::Vec2;

/// Game configuration constants
///
/// All durations are in frames; speeds are world units per frame.
pub mod consts {
    /// World dimensions (square arena)
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 1200.0;

    /// Nominal frame rate used to convert seconds into frames
    pub const FRAMES_PER_SECOND: u32 = 60;

    pub const PLAYER_RADIUS: f32 = 24.0;
    pub const PROJECTILE_RADIUS: f32 = 8.0;
    pub const GEM_RADIUS: f32 = 12.0;

    pub const PROJECTILE_SPEED: f32 = 12.0;
    /// Projectiles spawn this far beyond the shooter's rim
    pub const MUZZLE_OFFSET: f32 = 5.0;

    /// Bot defaults (bots never use hero stats)
    pub const BOT_SPEED: f32 = 3.5;
    pub const RELOAD_TIME: u32 = 40;
    pub const MAX_AMMO: u8 = 3;
    pub const DAMAGE: i32 = 340;
    pub const MAX_HEALTH: i32 = 4000;
    pub const BOT_RANGE: f32 = 600.0;

    /// Boss overrides
    pub const BOSS_RADIUS: f32 = 60.0;
    pub const BOSS_HEALTH: i32 = 25_000;
    pub const BOSS_SPEED_FACTOR: f32 = 0.6;

    /// Bot AI distances
    pub const GEM_SEEK_RADIUS: f32 = 400.0;
    pub const ENGAGE_RADIUS: f32 = 600.0;
    pub const RETREAT_RADIUS: f32 = 200.0;

    /// Gem rush
    pub const INITIAL_SPAWN_GEMS: usize = 5;
    pub const GEM_SPAWN_INTERVAL: u32 = 300;
    pub const MAX_DROPPED_GEMS: u32 = 5;
    pub const GEM_DROP_SPREAD: f32 = 20.0;

    /// Replacement bots appear this many frames after a death (3 s)
    pub const RESPAWN_DELAY: u32 = 3 * FRAMES_PER_SECOND;

    /// Win thresholds
    pub const GEM_WIN_COUNT: u32 = 10;
    pub const KILL_WIN_COUNT: u32 = 10;

    /// Camera: visible world width we aim for, and the minimum zoom
    pub const TARGET_VISIBLE_WIDTH: f32 = 900.0;
    pub const MIN_ZOOM: f32 = 0.8;

    /// Coins awarded at match end
    pub const WIN_REWARD: u32 = 60;
    pub const LOSS_REWARD: u32 = 10;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector from `from` toward `to` (zero when the points coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Clamp a circle center so the whole circle stays inside the world
#[inline]
pub fn clamp_to_world(pos: Vec2, radius: f32) -> Vec2 {
    use consts::{WORLD_HEIGHT, WORLD_WIDTH};
    Vec2::new(
        pos.x.max(radius).min(WORLD_WIDTH - radius),
        pos.y.max(radius).min(WORLD_HEIGHT - radius),
    )
}

/// Whether a point lies inside the world rectangle (edges included)
#[inline]
pub fn in_world(pos: Vec2) -> bool {
    use consts::{WORLD_HEIGHT, WORLD_WIDTH};
    pos.x >= 0.0 && pos.x <= WORLD_WIDTH && pos.y >= 0.0 && pos.y <= WORLD_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_world() {
        let clamped = clamp_to_world(Vec2::new(-500.0, 500.0), 24.0);
        assert_eq!(clamped.x, 24.0);
        assert_eq!(clamped.y, 500.0);

        let clamped = clamp_to_world(Vec2::new(5000.0, 1199.0), 24.0);
        assert_eq!(clamped, Vec2::new(1176.0, 1176.0));
    }

    #[test]
    fn test_direction_to() {
        let dir = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(direction_to(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_in_world() {
        assert!(in_world(Vec2::new(0.0, 1200.0)));
        assert!(!in_world(Vec2::new(-0.1, 10.0)));
        assert!(!in_world(Vec2::new(10.0, 1200.5)));
    }
}
