//! Player controller
//!
//! Turns raw input (keyboard + pointer, or the two virtual joysticks) into
//! the player's velocity, facing angle and shots.

use std::collections::HashSet;

use glam::Vec2;

use super::state::{Character, IdAllocator, Projectile};
use crate::camera::Camera;
use crate::clamp_to_world;

/// One virtual joystick: each axis in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stick {
    pub vec: Vec2,
    pub active: bool,
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct PlayerInput {
    /// Currently held keys, lowercased (`"w"`, `"arrowup"`, ...)
    pub keys: HashSet<String>,
    /// Pointer position in screen (CSS) pixels, if known
    pub pointer: Option<Vec2>,
    /// Primary pointer button held
    pub pointer_down: bool,
    /// False on touch devices: pointer aiming and hold-to-fire are ignored
    pub pointer_capable: bool,
    pub move_stick: Stick,
    pub aim_stick: Stick,
    /// Last non-zero aim-stick deflection received (unit length)
    pub aim_deflection: Option<Vec2>,
    /// Flick released since the last frame, consumed by the controller
    pub flick: Option<Vec2>,
}

impl PlayerInput {
    pub fn press(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(&key.to_lowercase());
    }

    /// Feed an aim-stick update from the shell. Releasing a held stick
    /// latches one flick along the last deflection, so a press and release
    /// that both land between two frames still fires.
    pub fn set_aim_stick(&mut self, vec: Vec2, active: bool) {
        if active && vec != Vec2::ZERO {
            self.aim_deflection = Some(vec.normalize_or_zero());
        }
        if self.aim_stick.active && !active {
            self.flick = self.aim_deflection;
        }
        self.aim_stick = Stick { vec, active };
    }

    fn held(&self, a: &str, b: &str) -> bool {
        self.keys.contains(a) || self.keys.contains(b)
    }

    /// Raw movement direction; a deflected movement stick overrides keys
    pub fn move_direction(&self) -> Vec2 {
        if self.move_stick.vec != Vec2::ZERO {
            return self.move_stick.vec;
        }

        let mut dir = Vec2::ZERO;
        if self.held("w", "arrowup") {
            dir.y -= 1.0;
        }
        if self.held("s", "arrowdown") {
            dir.y += 1.0;
        }
        if self.held("a", "arrowleft") {
            dir.x -= 1.0;
        }
        if self.held("d", "arrowright") {
            dir.x += 1.0;
        }
        dir
    }
}

/// Analog speed response: full speed past unit deflection, proportional below
pub fn movement_velocity(dir: Vec2, speed: f32) -> Vec2 {
    let len = dir.length();
    if len == 0.0 || !len.is_finite() {
        return Vec2::ZERO;
    }
    if len > 1.0 {
        dir / len * speed
    } else {
        dir * speed
    }
}

/// Aim state carried between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    /// Last non-zero aim-stick direction (unit length)
    pub last_aim: Vec2,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self { last_aim: Vec2::X }
    }
}

impl PlayerController {
    /// Move, aim and fire for one frame. Returns any projectile fired.
    /// Consumes a pending flick from `input`.
    pub fn update(
        &mut self,
        player: &mut Character,
        input: &mut PlayerInput,
        camera: &Camera,
        ids: &mut IdAllocator,
    ) -> Option<Projectile> {
        // Movement: no inertia, zero input = zero velocity
        player.vel = movement_velocity(input.move_direction(), player.speed);
        player.pos = clamp_to_world(player.pos + player.vel, player.radius);

        // Aiming
        let aim = input.aim_stick;
        if aim.active {
            if aim.vec != Vec2::ZERO {
                player.angle = aim.vec.y.atan2(aim.vec.x);
                self.last_aim = aim.vec.normalize_or_zero();
            }
        } else if input.pointer_capable {
            if let Some(pointer) = input.pointer {
                let on_screen = camera.world_to_screen(player.pos);
                player.angle = (pointer.y - on_screen.y).atan2(pointer.x - on_screen.x);
            }
        }

        // Firing: hold pointer, or release the aim stick to flick a shot
        let shot = if let Some(dir) = input.flick.take() {
            self.last_aim = dir;
            player.angle = dir.y.atan2(dir.x);
            player.shoot(dir, ids)
        } else if input.pointer_down && input.pointer_capable && !aim.active {
            player.shoot(Vec2::new(player.angle.cos(), player.angle.sin()), ids)
        } else {
            None
        };

        player.weapon.tick();
        shot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::heroes::HeroStats;
    use crate::sim::spawner::create_player;
    use crate::sim::state::EntityId;

    fn setup() -> (Character, PlayerController, IdAllocator, Camera) {
        let player = create_player(EntityId(1), &HeroStats::default());
        let camera = Camera::follow(player.pos, Vec2::new(900.0, 600.0));
        (player, PlayerController::default(), IdAllocator::starting_at(2), camera)
    }

    #[test]
    fn test_keyboard_diagonal_normalized() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        let mut input = PlayerInput::default();
        input.press("W");
        input.press("d");
        ctl.update(&mut player, &mut input, &cam, &mut ids);
        assert!((player.vel.length() - player.speed).abs() < 1e-4);
        assert!(player.vel.x > 0.0 && player.vel.y < 0.0);
    }

    #[test]
    fn test_partial_stick_gives_partial_speed() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        let mut input = PlayerInput {
            move_stick: Stick {
                vec: Vec2::new(0.5, 0.0),
                active: true,
            },
            ..Default::default()
        };
        let start = player.pos;
        ctl.update(&mut player, &mut input, &cam, &mut ids);
        assert!((player.vel.x - player.speed * 0.5).abs() < 1e-5);
        assert!((player.pos.x - start.x - player.speed * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_stick_overrides_keys() {
        let mut input = PlayerInput::default();
        input.press("a");
        input.move_stick.vec = Vec2::new(0.0, 1.0);
        assert_eq!(input.move_direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_zero_input_stops_player() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        player.vel = Vec2::new(3.0, 3.0);
        ctl.update(&mut player, &mut PlayerInput::default(), &cam, &mut ids);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_movement_clamped_to_bounds() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        player.pos = Vec2::new(-500.0, 500.0);
        ctl.update(&mut player, &mut PlayerInput::default(), &cam, &mut ids);
        assert_eq!(player.pos.x, PLAYER_RADIUS);
        assert_eq!(player.pos.y, 500.0);
    }

    #[test]
    fn test_pointer_aim_goes_through_camera() {
        let (mut player, mut ctl, mut ids, _) = setup();
        player.pos = Vec2::new(100.0, 100.0);
        // Player pinned near the corner, so it is NOT at the screen center
        let cam = Camera::follow(player.pos, Vec2::new(1800.0, 1000.0));
        let target_world = Vec2::new(200.0, 100.0);
        let mut input = PlayerInput {
            pointer: Some(cam.world_to_screen(target_world)),
            pointer_capable: true,
            ..Default::default()
        };
        ctl.update(&mut player, &mut input, &cam, &mut ids);
        assert!(player.angle.abs() < 1e-4, "angle {}", player.angle);
    }

    #[test]
    fn test_hold_pointer_fires_along_facing() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        let mut input = PlayerInput {
            pointer: Some(cam.world_to_screen(player.pos + Vec2::new(0.0, 50.0))),
            pointer_down: true,
            pointer_capable: true,
            ..Default::default()
        };
        let shot = ctl.update(&mut player, &mut input, &cam, &mut ids).expect("fired");
        assert!(shot.vel.y > 0.0 && shot.vel.x.abs() < 1e-3);

        // Reloading: holding doesn't fire again next frame
        assert!(ctl.update(&mut player, &mut input, &cam, &mut ids).is_none());
    }

    #[test]
    fn test_touch_ignores_pointer_button() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        let mut input = PlayerInput {
            pointer_down: true,
            pointer_capable: false,
            ..Default::default()
        };
        assert!(ctl.update(&mut player, &mut input, &cam, &mut ids).is_none());
        assert_eq!(player.weapon.ammo, MAX_AMMO);
    }

    #[test]
    fn test_aim_stick_flick_fires_on_release_only() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        let mut input = PlayerInput::default();
        input.set_aim_stick(Vec2::new(-0.6, 0.0), true);

        // Held: aims, no shot
        assert!(ctl.update(&mut player, &mut input, &cam, &mut ids).is_none());
        assert!((player.angle - std::f32::consts::PI).abs() < 1e-4);
        assert!((ctl.last_aim - Vec2::new(-1.0, 0.0)).length() < 1e-6);

        // Released (stick snaps back to zero): one shot along the last aim
        input.set_aim_stick(Vec2::ZERO, false);
        let shot = ctl.update(&mut player, &mut input, &cam, &mut ids).expect("flick shot");
        assert!(shot.vel.x < 0.0);
        assert!(input.flick.is_none());

        // Nothing further while idle
        assert!(ctl.update(&mut player, &mut input, &cam, &mut ids).is_none());
    }

    #[test]
    fn test_flick_between_frames_fires_once_along_new_direction() {
        let (mut player, mut ctl, mut ids, cam) = setup();
        let mut input = PlayerInput::default();

        // An earlier flick to the left
        input.set_aim_stick(Vec2::new(-1.0, 0.0), true);
        input.set_aim_stick(Vec2::ZERO, false);
        ctl.update(&mut player, &mut input, &cam, &mut ids).expect("first flick");
        player.weapon.reload_timer = 0;

        // Press, drag down and release, all before the next frame
        input.set_aim_stick(Vec2::new(0.0, 0.4), true);
        input.set_aim_stick(Vec2::new(0.0, 0.9), true);
        input.set_aim_stick(Vec2::ZERO, false);
        let ammo = player.weapon.ammo;

        let shot = ctl.update(&mut player, &mut input, &cam, &mut ids).expect("flick shot");
        assert!(shot.vel.y > 0.0 && shot.vel.x.abs() < 1e-4);
        assert_eq!(player.weapon.ammo, ammo - 1);
        assert!((ctl.last_aim - Vec2::Y).length() < 1e-6);

        player.weapon.reload_timer = 0;
        assert!(ctl.update(&mut player, &mut input, &cam, &mut ids).is_none());
    }

    #[test]
    fn test_release_without_press_does_not_fire() {
        let mut input = PlayerInput::default();
        input.set_aim_stick(Vec2::ZERO, false);
        assert!(input.flick.is_none());
    }
}
