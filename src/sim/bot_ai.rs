//! Bot AI: per-frame target selection, movement and firing
//!
//! Targeting priority (first match wins):
//! 1. Gem rush only: nearest live gem within [`GEM_SEEK_RADIUS`]
//! 2. Red bots: the player within [`ENGAGE_RADIUS`]; Blue bots: the first
//!    live Red bot found within [`ENGAGE_RADIUS`] (first, not nearest)
//! 3. The boss always targets the player, overriding the above

use glam::Vec2;

use super::state::{Character, GameMode, Team, World};
use crate::consts::*;
use crate::{clamp_to_world, direction_to, distance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Gem,
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub pos: Vec2,
    pub kind: TargetKind,
}

/// Pick this frame's target for `bot`
pub fn select_target(world: &World, bot: &Character) -> Option<Target> {
    let player = &world.player;

    if bot.is_boss() && player.is_alive() {
        return Some(Target {
            pos: player.pos,
            kind: TargetKind::Character,
        });
    }

    if world.mode == GameMode::GemRush {
        let nearest = world
            .gems
            .iter()
            .filter(|g| !g.dead)
            .map(|g| (g, distance(bot.pos, g.pos)))
            .filter(|(_, d)| *d < GEM_SEEK_RADIUS)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((gem, _)) = nearest {
            return Some(Target {
                pos: gem.pos,
                kind: TargetKind::Gem,
            });
        }
    }

    let enemy = match bot.team {
        Team::Red => (player.is_alive() && distance(bot.pos, player.pos) < ENGAGE_RADIUS)
            .then_some(player.pos),
        Team::Blue => world
            .bots
            .iter()
            .find(|b| b.team == Team::Red && b.is_alive() && distance(bot.pos, b.pos) < ENGAGE_RADIUS)
            .map(|b| b.pos),
    };

    enemy.map(|pos| Target {
        pos,
        kind: TargetKind::Character,
    })
}

/// Run every live bot for one frame
pub fn update_bots(world: &mut World) {
    let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);

    for i in 0..world.bots.len() {
        if world.bots[i].dead {
            continue;
        }
        if !world.bots[i].pos.is_finite() {
            log::warn!("Skipping bot {:?} with invalid position", world.bots[i].id);
            continue;
        }

        let target = select_target(world, &world.bots[i]);
        let bot = &mut world.bots[i];
        let start = bot.pos;
        let mut shot = None;

        match target {
            Some(target) => {
                let dir = direction_to(bot.pos, target.pos);
                let dist = distance(bot.pos, target.pos);
                let is_enemy = target.kind == TargetKind::Character;

                if is_enemy && dist < RETREAT_RADIUS && !bot.is_boss() {
                    // Back off to keep range
                    bot.pos -= dir * bot.speed * 0.5;
                } else {
                    bot.pos += dir * bot.speed;
                }

                if is_enemy {
                    bot.angle = (target.pos.y - bot.pos.y).atan2(target.pos.x - bot.pos.x);
                    shot = bot.shoot(target.pos - bot.pos, &mut world.ids);
                }
            }
            None => {
                // Idle: drift toward the center
                bot.pos += direction_to(bot.pos, center) * bot.speed * 0.5;
            }
        }

        bot.weapon.tick();
        bot.pos = clamp_to_world(bot.pos, bot.radius);
        bot.vel = bot.pos - start;

        if let Some(projectile) = shot {
            world.projectiles.push(projectile);
        }
    }
}
