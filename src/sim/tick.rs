//! Per-frame simulation step
//!
//! Runs every phase of a frame in a fixed order against one `World`:
//! player → bots → projectiles → hits → gem pickup → particles →
//! lifecycle (gem spawns, respawn queue, prune) → score and win check.

use glam::Vec2;

use super::bot_ai;
use super::combat;
use super::player::PlayerInput;
use super::rules;
use super::state::World;
use crate::camera::Camera;

/// Advance the world by one frame.
///
/// `display` is the current drawable size in CSS pixels; it may change
/// between frames, so the camera is recomputed every time. A pending flick
/// in `input` is consumed.
pub fn tick(world: &mut World, input: &mut PlayerInput, display: Vec2) {
    // Finished matches keep their particles fading but nothing else moves
    if !world.is_active() {
        update_particles(world);
        return;
    }

    world.frame += 1;

    let camera = Camera::follow(world.player.pos, display);
    update_player(world, input, &camera);
    bot_ai::update_bots(world);

    combat::advance_projectiles(world);
    combat::resolve_hits(world);
    combat::collect_gems(world);

    update_particles(world);

    combat::update_gem_spawner(world);
    combat::process_respawns(world);
    world.prune();

    rules::update(world);
}

fn update_player(world: &mut World, input: &mut PlayerInput, camera: &Camera) {
    let player = &mut world.player;
    if player.dead {
        return;
    }
    if !player.pos.is_finite() {
        log::warn!("Skipping player with invalid position {:?}", player.pos);
        return;
    }

    if let Some(shot) = world.controller.update(player, input, camera, &mut world.ids) {
        world.projectiles.push(shot);
    }
}

/// Drift and fade cosmetic particles
pub fn update_particles(world: &mut World) {
    for p in &mut world.particles {
        p.pos += p.vel;
        p.life -= p.decay;
    }
    world.particles.retain(|p| p.life > 0.0);
}
