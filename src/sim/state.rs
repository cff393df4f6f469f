//! World state and core simulation types
//!
//! The world is one explicit context object handed by `&mut` to each phase.
//! Entities live in typed arenas (player, bots, projectiles, gems) addressed
//! by stable [`EntityId`]s. Dead entities stay in their arena until the
//! lifecycle prune at the end of the frame and are skipped by every phase.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::PlayerController;
use super::spawner;
use super::weapon::Weapon;
use crate::commentary::{CommentaryQueue, CommentaryRequest};
use crate::consts::*;
use crate::heroes::HeroStats;

/// Stable entity handle, unique within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids in increasing order
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Player-aligned
    Blue,
    Red,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Team::Blue => "#3b82f6",
            Team::Red => "#ef4444",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Collect 10 gems as a team
    GemRush,
    /// First team to 10 kills
    Deathmatch,
    /// Take down the boss
    BossHunt,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::GemRush => "gem_rush",
            GameMode::Deathmatch => "deathmatch",
            GameMode::BossHunt => "boss_hunt",
        }
    }
}

/// Match state machine: Active → Ended (exactly once)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Active,
    Ended { winner: Team },
}

/// Who drives a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Bot,
    /// Singleton boss of boss hunt; always hunts the player, never respawns
    Boss,
}

/// A player or bot
#[derive(Debug, Clone)]
pub struct Character {
    pub id: EntityId,
    pub role: Role,
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub dead: bool,
    pub health: i32,
    pub max_health: i32,
    pub weapon: Weapon,
    /// World units per frame
    pub speed: f32,
    pub damage: i32,
    pub range: f32,
    /// Gems currently carried
    pub gems: u32,
    pub kills: u32,
    /// Facing angle (radians)
    pub angle: f32,
}

impl Character {
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_boss(&self) -> bool {
        self.role == Role::Boss
    }

    /// Subtract damage, clamping at zero. Returns true if this killed it.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        self.health == 0
    }

    /// Fire along `dir` if the weapon is ready
    pub fn shoot(&mut self, dir: Vec2, ids: &mut IdAllocator) -> Option<Projectile> {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO || !self.weapon.try_fire() {
            return None;
        }

        let color = match (self.team, self.role) {
            (Team::Blue, Role::Player) => self.color,
            (Team::Blue, _) => "#60a5fa",
            (Team::Red, _) => "#f87171",
        };

        Some(Projectile {
            id: ids.next_id(),
            owner: self.id,
            team: self.team,
            pos: self.pos + dir * (self.radius + MUZZLE_OFFSET),
            vel: dir * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            color,
            damage: self.damage,
            range: self.range,
            traveled: 0.0,
            dead: false,
        })
    }
}

/// A bullet in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    /// Firer, used only to attribute kills
    pub owner: EntityId,
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub damage: i32,
    pub range: f32,
    /// Cumulative distance flown
    pub traveled: f32,
    pub dead: bool,
}

/// A collectible gem
#[derive(Debug, Clone)]
pub struct Gem {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub dead: bool,
}

pub const GEM_COLOR: &str = "#a855f7";

/// A cosmetic particle (not gameplay-affecting)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, removed at 0
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    pub size: f32,
    pub color: &'static str,
}

/// Default particle cap (overridden from settings by the shell)
pub const MAX_PARTICLES: usize = 300;

/// A replacement bot waiting to enter the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSpawn {
    pub team: Team,
    pub frames_left: u32,
}

/// Team score pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub blue: u32,
    pub red: u32,
}

impl Score {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
        }
    }

    pub fn add(&mut self, team: Team, amount: u32) {
        match team {
            Team::Blue => self.blue += amount,
            Team::Red => self.red += amount,
        }
    }
}

/// Things that happened during a frame, for the HUD/audio collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Hit {
        target: EntityId,
        damage: i32,
        pos: Vec2,
    },
    Killed {
        victim: EntityId,
        victim_team: Team,
        killer: EntityId,
    },
    GemCollected {
        collector: EntityId,
    },
    GemsDropped {
        count: u32,
    },
    BotSpawned {
        id: EntityId,
        team: Team,
    },
    MatchEnded {
        winner: Team,
    },
}

/// Everything needed to start a match
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub mode: GameMode,
    /// The equipped hero, frozen for the whole match
    pub hero: HeroStats,
    pub seed: u64,
}

const FX_SEED_OFFSET: u64 = 0x9e37_79b9_7f4a_7c15;

fn particle_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed.wrapping_add(FX_SEED_OFFSET))
}

/// Complete mutable match state
#[derive(Debug, Clone)]
pub struct World {
    pub mode: GameMode,
    /// Player's hero snapshot for this match
    pub hero: HeroStats,
    pub seed: u64,
    /// Gameplay randomness (gem placement, drops)
    pub rng: Pcg32,
    /// Particle randomness, kept apart so the particle cap never shifts gameplay
    pub fx_rng: Pcg32,
    pub ids: IdAllocator,
    /// Frames simulated so far
    pub frame: u64,
    pub phase: MatchPhase,
    pub player: Character,
    pub bots: Vec<Character>,
    pub projectiles: Vec<Projectile>,
    pub gems: Vec<Gem>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    pub pending_spawns: Vec<PendingSpawn>,
    /// Cumulative deathmatch kills per team
    pub team_kills: Score,
    /// Latest reported score
    pub score: Score,
    pub gem_spawn_timer: u32,
    pub controller: PlayerController,
    pub commentary: CommentaryQueue,
    pub events: Vec<GameEvent>,
}

impl World {
    /// Build a fresh match
    pub fn new(config: MatchConfig) -> Self {
        let mut ids = IdAllocator::starting_at(1);
        let player = spawner::create_player(ids.next_id(), &config.hero);

        let mut world = Self {
            mode: config.mode,
            hero: config.hero,
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            fx_rng: particle_rng(config.seed),
            ids,
            frame: 0,
            phase: MatchPhase::Active,
            player,
            bots: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            pending_spawns: Vec::new(),
            team_kills: Score::default(),
            score: Score::default(),
            gem_spawn_timer: 0,
            controller: PlayerController::default(),
            commentary: CommentaryQueue::new(),
            events: Vec::new(),
        };
        world.begin();
        world
    }

    /// Start over, reusing the player character (repositioned and reset)
    pub fn restart(&mut self, config: MatchConfig) {
        self.mode = config.mode;
        self.hero = config.hero;
        self.seed = config.seed;
        self.rng = Pcg32::seed_from_u64(config.seed);
        self.fx_rng = particle_rng(config.seed);
        self.ids = IdAllocator::starting_at(self.player.id.0 + 1);
        self.frame = 0;
        self.phase = MatchPhase::Active;
        spawner::reset_player(&mut self.player, &config.hero);
        self.bots.clear();
        self.projectiles.clear();
        self.gems.clear();
        self.particles.clear();
        self.pending_spawns.clear();
        self.team_kills = Score::default();
        self.score = Score::default();
        self.gem_spawn_timer = 0;
        self.controller = PlayerController::default();
        self.commentary.clear();
        self.events.clear();
        self.begin();
    }

    fn begin(&mut self) {
        spawner::setup_match(self);
        self.commentary.push(CommentaryRequest::match_start(self.mode));
        log::info!(
            "Match started: mode={}, hero={}, seed={}, bots={}",
            self.mode.as_str(),
            self.hero.id,
            self.seed,
            self.bots.len()
        );
    }

    pub fn is_active(&self) -> bool {
        self.phase == MatchPhase::Active
    }

    pub fn winner(&self) -> Option<Team> {
        match self.phase {
            MatchPhase::Active => None,
            MatchPhase::Ended { winner } => Some(winner),
        }
    }

    /// Player followed by bots
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        std::iter::once(&self.player).chain(self.bots.iter())
    }

    pub fn characters_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        std::iter::once(&mut self.player).chain(self.bots.iter_mut())
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters_mut().find(|c| c.id == id)
    }

    /// The boss, if one is alive
    pub fn boss(&self) -> Option<&Character> {
        self.bots.iter().find(|b| b.is_boss() && !b.dead)
    }

    /// Take this frame's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Burst of cosmetic particles, respecting the cap
    pub fn spawn_particles(&mut self, pos: Vec2, color: &'static str, count: usize) {
        use rand::Rng;
        use std::f32::consts::TAU;

        for _ in 0..count {
            if self.particles.len() >= self.particle_cap {
                break;
            }
            let angle = self.fx_rng.random::<f32>() * TAU;
            let speed = self.fx_rng.random::<f32>() * 3.0 + 1.0;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                decay: 0.05 + self.fx_rng.random::<f32>() * 0.05,
                size: self.fx_rng.random::<f32>() * 4.0 + 2.0,
                color,
            });
        }
    }

    /// Drop every dead bot, projectile and gem. The player is never removed.
    pub fn prune(&mut self) {
        self.bots.retain(|b| !b.dead);
        self.projectiles.retain(|p| !p.dead);
        self.gems.retain(|g| !g.dead);
    }
}
