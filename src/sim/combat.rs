//! Combat resolution
//!
//! Projectile flight, hit detection, damage and death handling, gem pickup,
//! periodic gem spawns and the replacement-bot queue.

use super::rules;
use super::spawner;
use super::state::{EntityId, GEM_COLOR, GameEvent, GameMode, PendingSpawn, Role, Team, World};
use crate::commentary::CommentaryRequest;
use crate::consts::*;
use crate::{distance, in_world};

/// Move every live projectile; expire those past their range or outside the world
pub fn advance_projectiles(world: &mut World) {
    for projectile in world.projectiles.iter_mut().filter(|p| !p.dead) {
        projectile.pos += projectile.vel;
        projectile.traveled += projectile.vel.length();
        if projectile.traveled > projectile.range || !in_world(projectile.pos) {
            projectile.dead = true;
        }
    }
}

/// Test each live projectile against opposing characters.
///
/// A projectile hits at most one character: the first overlapping one in
/// iteration order (player, then bots in arena order).
pub fn resolve_hits(world: &mut World) {
    for i in 0..world.projectiles.len() {
        let projectile = &world.projectiles[i];
        if projectile.dead {
            continue;
        }

        let struck = world
            .characters()
            .filter(|c| c.is_alive() && c.team != projectile.team && c.pos.is_finite())
            .find(|c| distance(c.pos, projectile.pos) < c.radius + projectile.radius)
            .map(|c| c.id);

        if let Some(target) = struck {
            let (damage, owner) = (projectile.damage, projectile.owner);
            world.projectiles[i].dead = true;
            apply_damage(world, target, damage, owner);
        }
    }
}

/// Damage a character and handle its death. Returns true if this killed it.
pub fn apply_damage(world: &mut World, target: EntityId, amount: i32, attacker: EntityId) -> bool {
    let Some(victim) = world.character_mut(target) else {
        return false;
    };
    if victim.dead {
        return false;
    }

    let killed = victim.take_damage(amount);
    if killed {
        victim.dead = true;
    }
    let (pos, color, team, role, gems) = (victim.pos, victim.color, victim.team, victim.role, victim.gems);

    world.spawn_particles(pos, color, 3);
    world.events.push(GameEvent::Hit {
        target,
        damage: amount,
        pos,
    });

    if !killed {
        return false;
    }

    log::debug!("{:?} ({}) killed by {:?}", target, team.as_str(), attacker);
    world.events.push(GameEvent::Killed {
        victim: target,
        victim_team: team,
        killer: attacker,
    });
    if let Some(killer) = world.character_mut(attacker) {
        killer.kills += 1;
    }

    match world.mode {
        GameMode::Deathmatch => world.team_kills.add(team.opponent(), 1),
        GameMode::GemRush => {
            let count = gems.min(MAX_DROPPED_GEMS);
            if count > 0 {
                spawner::drop_gems(world, pos, count);
                world.events.push(GameEvent::GemsDropped { count });
                log::debug!("Dropped {} gems at ({:.0}, {:.0})", count, pos.x, pos.y);
            }
        }
        GameMode::BossHunt => {}
    }

    match role {
        Role::Player => {
            rules::end_match(world, Team::Red);
            world.commentary.push(CommentaryRequest::player_died());
        }
        Role::Bot => {
            if attacker == world.player.id {
                world.commentary.push(CommentaryRequest::enemy_eliminated());
            }
            world.pending_spawns.push(PendingSpawn {
                team,
                frames_left: RESPAWN_DELAY,
            });
        }
        // The boss never comes back
        Role::Boss => log::info!("Boss defeated by {:?}", attacker),
    }

    true
}

/// Live characters pick up any live gem they overlap
pub fn collect_gems(world: &mut World) {
    for i in 0..world.gems.len() {
        let gem = &world.gems[i];
        if gem.dead {
            continue;
        }

        let collector = world
            .characters()
            .filter(|c| c.is_alive())
            .find(|c| distance(c.pos, gem.pos) < c.radius + gem.radius)
            .map(|c| c.id);

        let Some(collector) = collector else {
            continue;
        };

        let pos = gem.pos;
        world.gems[i].dead = true;
        if let Some(character) = world.character_mut(collector) {
            character.gems += 1;
        }
        world.spawn_particles(pos, GEM_COLOR, 5);
        world.events.push(GameEvent::GemCollected { collector });
    }
}

/// Gem rush: a new gem every [`GEM_SPAWN_INTERVAL`] frames, however many exist
pub fn update_gem_spawner(world: &mut World) {
    if world.mode != GameMode::GemRush {
        return;
    }
    world.gem_spawn_timer += 1;
    if world.gem_spawn_timer >= GEM_SPAWN_INTERVAL {
        spawner::spawn_random_gem(world);
        world.gem_spawn_timer = 0;
    }
}

/// Count down queued replacement bots and spawn the ones that are due.
///
/// Nothing spawns once the match has ended; the queue is simply discarded.
pub fn process_respawns(world: &mut World) {
    if !world.is_active() {
        world.pending_spawns.clear();
        return;
    }

    let mut due = Vec::new();
    world.pending_spawns.retain_mut(|spawn| {
        spawn.frames_left = spawn.frames_left.saturating_sub(1);
        if spawn.frames_left == 0 {
            due.push(spawn.team);
            false
        } else {
            true
        }
    });

    for team in due {
        let id = spawner::add_bot(world, team, spawner::spawn_point(team));
        log::debug!("Respawned {:?} for team {}", id, team.as_str());
        world.events.push(GameEvent::BotSpawned { id, team });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heroes::HeroStats;
    use crate::sim::spawner::{add_bot, add_gem, create_boss};
    use crate::sim::state::{MatchConfig, MatchPhase, Projectile};
    use glam::Vec2;

    fn empty_world(mode: GameMode) -> World {
        let mut world = World::new(MatchConfig {
            mode,
            hero: HeroStats::default(),
            seed: 3,
        });
        world.bots.clear();
        world.gems.clear();
        world.commentary.clear();
        world
    }

    fn bullet(world: &mut World, team: Team, owner: EntityId, pos: Vec2) -> Projectile {
        Projectile {
            id: world.ids.next_id(),
            owner,
            team,
            pos,
            vel: Vec2::new(PROJECTILE_SPEED, 0.0),
            radius: PROJECTILE_RADIUS,
            color: "#fff",
            damage: DAMAGE,
            range: BOT_RANGE,
            traveled: 0.0,
            dead: false,
        }
    }

    #[test]
    fn test_projectile_expires_past_range() {
        let mut world = empty_world(GameMode::Deathmatch);
        let owner = world.player.id;
        let mut shot = bullet(&mut world, Team::Blue, owner, Vec2::new(100.0, 100.0));
        shot.range = 30.0;
        world.projectiles.push(shot);

        advance_projectiles(&mut world);
        assert!(!world.projectiles[0].dead);
        advance_projectiles(&mut world);
        assert!(!world.projectiles[0].dead);
        advance_projectiles(&mut world);
        assert!(world.projectiles[0].dead);
        assert_eq!(world.projectiles[0].traveled, 36.0);
    }

    #[test]
    fn test_projectile_expires_outside_world() {
        let mut world = empty_world(GameMode::Deathmatch);
        let owner = world.player.id;
        let shot = bullet(&mut world, Team::Blue, owner, Vec2::new(WORLD_WIDTH - 5.0, 100.0));
        world.projectiles.push(shot);
        advance_projectiles(&mut world);
        assert!(world.projectiles[0].dead);
    }

    #[test]
    fn test_single_hit_per_projectile() {
        let mut world = empty_world(GameMode::Deathmatch);
        let a = add_bot(&mut world, Team::Red, Vec2::new(300.0, 300.0));
        let b = add_bot(&mut world, Team::Red, Vec2::new(305.0, 300.0));
        let owner = world.player.id;
        let shot = bullet(&mut world, Team::Blue, owner, Vec2::new(302.0, 300.0));
        world.projectiles.push(shot);

        resolve_hits(&mut world);
        assert!(world.projectiles[0].dead);
        assert_eq!(world.character(a).unwrap().health, MAX_HEALTH - DAMAGE);
        assert_eq!(world.character(b).unwrap().health, MAX_HEALTH);
    }

    #[test]
    fn test_friendly_fire_ignored() {
        let mut world = empty_world(GameMode::Deathmatch);
        let ally = add_bot(&mut world, Team::Blue, Vec2::new(300.0, 300.0));
        let owner = world.player.id;
        let shot = bullet(&mut world, Team::Blue, owner, Vec2::new(300.0, 300.0));
        world.projectiles.push(shot);

        resolve_hits(&mut world);
        assert!(!world.projectiles[0].dead);
        assert_eq!(world.character(ally).unwrap().health, MAX_HEALTH);
    }

    #[test]
    fn test_deathmatch_kill_credits_opponent_and_queues_respawn() {
        let mut world = empty_world(GameMode::Deathmatch);
        let red = add_bot(&mut world, Team::Red, Vec2::new(300.0, 300.0));
        let player = world.player.id;

        assert!(apply_damage(&mut world, red, MAX_HEALTH, player));
        assert_eq!(world.team_kills.blue, 1);
        assert_eq!(world.team_kills.red, 0);
        assert_eq!(world.player.kills, 1);
        assert_eq!(world.pending_spawns.len(), 1);
        assert_eq!(world.pending_spawns[0].team, Team::Red);
        assert_eq!(world.commentary.len(), 1);

        // Already dead: further damage is ignored
        assert!(!apply_damage(&mut world, red, 1, player));
        assert_eq!(world.team_kills.blue, 1);
    }

    #[test]
    fn test_health_clamped_at_zero() {
        let mut world = empty_world(GameMode::Deathmatch);
        let red = add_bot(&mut world, Team::Red, Vec2::new(300.0, 300.0));
        let player = world.player.id;
        apply_damage(&mut world, red, MAX_HEALTH * 3, player);
        assert_eq!(world.character(red).unwrap().health, 0);
    }

    #[test]
    fn test_bot_kill_by_bot_has_no_commentary() {
        let mut world = empty_world(GameMode::Deathmatch);
        let red = add_bot(&mut world, Team::Red, Vec2::new(300.0, 300.0));
        let ally = add_bot(&mut world, Team::Blue, Vec2::new(300.0, 600.0));
        apply_damage(&mut world, red, MAX_HEALTH, ally);
        assert!(world.commentary.is_empty());
        assert_eq!(world.character(ally).unwrap().kills, 1);
    }

    #[test]
    fn test_gem_carrier_drops_at_most_five() {
        let mut world = empty_world(GameMode::GemRush);
        let red = add_bot(&mut world, Team::Red, Vec2::new(300.0, 300.0));
        world.character_mut(red).unwrap().gems = 8;
        let player = world.player.id;

        apply_damage(&mut world, red, MAX_HEALTH, player);
        assert_eq!(world.gems.len(), MAX_DROPPED_GEMS as usize);
        assert!(world.events.contains(&GameEvent::GemsDropped { count: 5 }));
        assert_eq!(world.team_kills.blue, 0);
    }

    #[test]
    fn test_player_death_ends_match_for_red() {
        let mut world = empty_world(GameMode::GemRush);
        let red = add_bot(&mut world, Team::Red, Vec2::new(300.0, 300.0));
        let (player, health) = (world.player.id, world.player.health);

        apply_damage(&mut world, player, health, red);
        assert!(world.player.dead);
        assert_eq!(world.phase, MatchPhase::Ended { winner: Team::Red });
        assert!(world.pending_spawns.is_empty());
        assert_eq!(world.commentary.drain()[0], CommentaryRequest::player_died());
    }

    #[test]
    fn test_boss_is_not_respawned() {
        let mut world = empty_world(GameMode::BossHunt);
        let id = world.ids.next_id();
        world.bots.push(create_boss(id, Vec2::new(600.0, 200.0)));
        let player = world.player.id;

        apply_damage(&mut world, id, BOSS_HEALTH, player);
        assert!(world.pending_spawns.is_empty());
        assert!(world.boss().is_none());
        assert!(world.commentary.is_empty());
    }

    #[test]
    fn test_gem_round_trip() {
        let mut world = empty_world(GameMode::GemRush);
        add_bot(&mut world, Team::Red, Vec2::new(200.0, 200.0));
        add_bot(&mut world, Team::Blue, Vec2::new(900.0, 700.0));
        let spots: Vec<_> = world.characters().map(|c| c.pos).collect();
        for pos in &spots {
            add_gem(&mut world, *pos);
        }
        add_gem(&mut world, Vec2::new(600.0, 600.0));

        collect_gems(&mut world);
        assert!(world.characters().all(|c| c.gems == 1));
        assert_eq!(world.gems.iter().filter(|g| g.dead).count(), spots.len());
        world.prune();
        assert_eq!(world.gems.len(), 1);
    }

    #[test]
    fn test_dead_character_does_not_collect() {
        let mut world = empty_world(GameMode::GemRush);
        let red = add_bot(&mut world, Team::Red, Vec2::new(200.0, 200.0));
        world.character_mut(red).unwrap().dead = true;
        add_gem(&mut world, Vec2::new(200.0, 200.0));
        collect_gems(&mut world);
        assert!(!world.gems[0].dead);
    }

    #[test]
    fn test_gem_spawner_interval() {
        let mut world = empty_world(GameMode::GemRush);
        for _ in 0..GEM_SPAWN_INTERVAL - 1 {
            update_gem_spawner(&mut world);
        }
        assert!(world.gems.is_empty());
        update_gem_spawner(&mut world);
        assert_eq!(world.gems.len(), 1);
        assert_eq!(world.gem_spawn_timer, 0);

        let mut dm = empty_world(GameMode::Deathmatch);
        for _ in 0..GEM_SPAWN_INTERVAL * 2 {
            update_gem_spawner(&mut dm);
        }
        assert!(dm.gems.is_empty());
    }

    #[test]
    fn test_respawn_after_delay() {
        let mut world = empty_world(GameMode::Deathmatch);
        world.pending_spawns.push(PendingSpawn {
            team: Team::Red,
            frames_left: RESPAWN_DELAY,
        });

        for _ in 0..RESPAWN_DELAY - 1 {
            process_respawns(&mut world);
        }
        assert!(world.bots.is_empty());
        process_respawns(&mut world);
        assert_eq!(world.bots.len(), 1);
        assert_eq!(world.bots[0].pos, spawner::spawn_point(Team::Red));
        assert!(world.pending_spawns.is_empty());
    }

    #[test]
    fn test_no_respawn_after_match_end() {
        let mut world = empty_world(GameMode::Deathmatch);
        world.pending_spawns.push(PendingSpawn {
            team: Team::Blue,
            frames_left: 1,
        });
        rules::end_match(&mut world, Team::Blue);
        process_respawns(&mut world);
        assert!(world.bots.is_empty());
    }
}
