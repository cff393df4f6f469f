//! Character and gem creation
//!
//! Mode-specific starting rosters, team spawn points, and gem placement.

use glam::Vec2;
use rand::Rng;

use super::state::{Character, EntityId, GameMode, Gem, Role, Team, World};
use super::weapon::Weapon;
use crate::clamp_to_world;
use crate::consts::*;
use crate::heroes::HeroStats;

/// Where the player enters the arena
pub const PLAYER_START: Vec2 = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - 200.0);

const BOSS_COLOR: &str = "#7f1d1d";

/// Replacement bots enter at their team's home edge
pub fn spawn_point(team: Team) -> Vec2 {
    match team {
        Team::Blue => Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - 100.0),
        Team::Red => Vec2::new(WORLD_WIDTH / 2.0, 100.0),
    }
}

pub fn create_player(id: EntityId, hero: &HeroStats) -> Character {
    let mut player = Character {
        role: Role::Player,
        ..create_bot(id, Team::Blue, PLAYER_START)
    };
    reset_player(&mut player, hero);
    player
}

/// Re-arm the existing player from a new hero snapshot
pub fn reset_player(player: &mut Character, hero: &HeroStats) {
    player.pos = PLAYER_START;
    player.vel = Vec2::ZERO;
    player.color = hero.color;
    player.dead = false;
    player.health = hero.max_health;
    player.max_health = hero.max_health;
    player.weapon = Weapon::for_hero(hero.reload_time);
    player.speed = hero.speed;
    player.damage = hero.damage;
    player.range = hero.range;
    player.gems = 0;
    player.kills = 0;
    player.angle = -std::f32::consts::FRAC_PI_2;
}

pub fn create_bot(id: EntityId, team: Team, pos: Vec2) -> Character {
    Character {
        id,
        role: Role::Bot,
        team,
        pos,
        vel: Vec2::ZERO,
        radius: PLAYER_RADIUS,
        color: team.color(),
        dead: false,
        health: MAX_HEALTH,
        max_health: MAX_HEALTH,
        weapon: Weapon::for_bot(),
        speed: BOT_SPEED,
        damage: DAMAGE,
        range: BOT_RANGE,
        gems: 0,
        kills: 0,
        angle: match team {
            Team::Blue => -std::f32::consts::FRAC_PI_2,
            Team::Red => std::f32::consts::FRAC_PI_2,
        },
    }
}

pub fn create_boss(id: EntityId, pos: Vec2) -> Character {
    Character {
        role: Role::Boss,
        radius: BOSS_RADIUS,
        health: BOSS_HEALTH,
        max_health: BOSS_HEALTH,
        color: BOSS_COLOR,
        speed: BOT_SPEED * BOSS_SPEED_FACTOR,
        ..create_bot(id, Team::Red, pos)
    }
}

/// Add a bot to the world and return its id
pub fn add_bot(world: &mut World, team: Team, pos: Vec2) -> EntityId {
    let id = world.ids.next_id();
    world.bots.push(create_bot(id, team, pos));
    id
}

/// Add a gem at `pos` (clamped inside the world)
pub fn add_gem(world: &mut World, pos: Vec2) -> EntityId {
    let id = world.ids.next_id();
    world.gems.push(Gem {
        id,
        pos: clamp_to_world(pos, GEM_RADIUS),
        radius: GEM_RADIUS,
        dead: false,
    });
    id
}

/// Gem somewhere in the central band of the arena (initial and periodic gems)
pub fn spawn_random_gem(world: &mut World) -> EntityId {
    let x = WORLD_WIDTH * 0.2 + world.rng.random::<f32>() * WORLD_WIDTH * 0.6;
    let y = WORLD_HEIGHT * 0.3 + world.rng.random::<f32>() * WORLD_HEIGHT * 0.4;
    add_gem(world, Vec2::new(x, y))
}

/// Scatter `count` gems around `pos`
pub fn drop_gems(world: &mut World, pos: Vec2, count: u32) {
    for _ in 0..count {
        let offset = Vec2::new(
            world.rng.random_range(-GEM_DROP_SPREAD..GEM_DROP_SPREAD),
            world.rng.random_range(-GEM_DROP_SPREAD..GEM_DROP_SPREAD),
        );
        add_gem(world, pos + offset);
    }
}

/// Populate the arena for the world's mode
pub fn setup_match(world: &mut World) {
    let w = WORLD_WIDTH;
    let h = WORLD_HEIGHT;
    let allies_left = Vec2::new(w / 2.0 - 100.0, h - 100.0);
    let allies_right = Vec2::new(w / 2.0 + 100.0, h - 100.0);

    match world.mode {
        GameMode::GemRush => {
            for _ in 0..INITIAL_SPAWN_GEMS {
                spawn_random_gem(world);
            }
            add_bot(world, Team::Red, Vec2::new(100.0, 100.0));
            add_bot(world, Team::Red, Vec2::new(w - 100.0, 100.0));
            add_bot(world, Team::Red, Vec2::new(w / 2.0, 200.0));
            add_bot(world, Team::Blue, allies_left);
        }
        GameMode::Deathmatch => {
            add_bot(world, Team::Red, Vec2::new(100.0, 100.0));
            add_bot(world, Team::Red, Vec2::new(w - 100.0, 100.0));
            add_bot(world, Team::Red, Vec2::new(w / 2.0, 200.0));
            add_bot(world, Team::Red, Vec2::new(200.0, 200.0));
            add_bot(world, Team::Blue, allies_left);
            add_bot(world, Team::Blue, allies_right);
        }
        GameMode::BossHunt => {
            let id = world.ids.next_id();
            world.bots.push(create_boss(id, Vec2::new(w / 2.0, 200.0)));
            add_bot(world, Team::Blue, allies_left);
            add_bot(world, Team::Blue, allies_right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::MatchConfig;

    fn world(mode: GameMode) -> World {
        World::new(MatchConfig {
            mode,
            hero: HeroStats::default(),
            seed: 7,
        })
    }

    fn count(world: &World, team: Team) -> usize {
        world.bots.iter().filter(|b| b.team == team).count()
    }

    #[test]
    fn test_gem_rush_roster() {
        let world = world(GameMode::GemRush);
        assert_eq!(world.gems.len(), INITIAL_SPAWN_GEMS);
        assert_eq!(count(&world, Team::Red), 3);
        assert_eq!(count(&world, Team::Blue), 1);
        for gem in &world.gems {
            assert!(gem.pos.x >= WORLD_WIDTH * 0.2 && gem.pos.x <= WORLD_WIDTH * 0.8);
            assert!(gem.pos.y >= WORLD_HEIGHT * 0.3 && gem.pos.y <= WORLD_HEIGHT * 0.7);
        }
    }

    #[test]
    fn test_deathmatch_roster() {
        let world = world(GameMode::Deathmatch);
        assert!(world.gems.is_empty());
        assert_eq!(count(&world, Team::Red), 4);
        assert_eq!(count(&world, Team::Blue), 2);
    }

    #[test]
    fn test_boss_hunt_roster() {
        let world = world(GameMode::BossHunt);
        let boss = world.boss().expect("boss present");
        assert_eq!(boss.health, BOSS_HEALTH);
        assert_eq!(boss.radius, BOSS_RADIUS);
        assert_eq!(boss.team, Team::Red);
        assert_eq!(world.bots.iter().filter(|b| b.is_boss()).count(), 1);
        assert_eq!(count(&world, Team::Blue), 2);
    }

    #[test]
    fn test_dropped_gems_stay_in_world() {
        let mut world = world(GameMode::GemRush);
        world.gems.clear();
        drop_gems(&mut world, Vec2::new(2.0, 2.0), 5);
        assert_eq!(world.gems.len(), 5);
        for gem in &world.gems {
            assert!(gem.pos.x >= GEM_RADIUS && gem.pos.y >= GEM_RADIUS);
            assert!(gem.pos.x <= 2.0 + GEM_DROP_SPREAD && gem.pos.y <= 2.0 + GEM_DROP_SPREAD);
        }
    }

    #[test]
    fn test_spawn_points_on_home_edges() {
        assert!(spawn_point(Team::Blue).y > WORLD_HEIGHT / 2.0);
        assert!(spawn_point(Team::Red).y < WORLD_HEIGHT / 2.0);
    }
}
