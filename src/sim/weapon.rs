//! Ammo and reload state machine
//!
//! `Ready` (ammo > 0, timer == 0) → fire: ammo -1, timer = full reload →
//! `Reloading` (timer counts down once per frame) → at 0, one ammo comes back
//! and the timer restarts at the refill duration. Ammo regenerates one unit at
//! a time; it is never refilled all at once.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_AMMO, RELOAD_TIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub ammo: u8,
    pub max_ammo: u8,
    /// Frames until the next ammo unit regenerates (0 = ready)
    pub reload_timer: u32,
    /// Timer set after each shot
    pub reload_frames: u32,
    /// Timer set after each regenerated unit
    pub refill_frames: u32,
}

impl Weapon {
    /// Player weapon: regenerating a unit takes half the shot reload (rounded up)
    pub fn for_hero(reload_time: u32) -> Self {
        Self {
            ammo: MAX_AMMO,
            max_ammo: MAX_AMMO,
            reload_timer: 0,
            reload_frames: reload_time,
            refill_frames: reload_time.div_ceil(2),
        }
    }

    /// Bot weapon: fixed reload, full duration between regenerated units
    pub fn for_bot() -> Self {
        Self {
            ammo: MAX_AMMO,
            max_ammo: MAX_AMMO,
            reload_timer: 0,
            reload_frames: RELOAD_TIME,
            refill_frames: RELOAD_TIME,
        }
    }

    #[inline]
    pub fn can_fire(&self) -> bool {
        self.ammo > 0 && !self.is_reloading()
    }

    /// Spend one ammo if ready. No state change when it can't fire.
    pub fn try_fire(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.ammo -= 1;
        self.reload_timer = self.reload_frames;
        true
    }

    /// Advance one frame
    pub fn tick(&mut self) {
        if self.reload_timer > 0 {
            self.reload_timer -= 1;
        } else if self.ammo < self.max_ammo {
            self.ammo += 1;
            self.reload_timer = self.refill_frames;
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer > 0
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::for_bot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_spends_ammo_and_starts_reload() {
        let mut weapon = Weapon::for_hero(40);
        assert!(weapon.try_fire());
        assert_eq!(weapon.ammo, 2);
        assert_eq!(weapon.reload_timer, 40);

        // Reloading: firing is a no-op
        let before = weapon;
        assert!(!weapon.try_fire());
        assert_eq!(weapon, before);
    }

    #[test]
    fn test_empty_weapon_cannot_fire() {
        let mut weapon = Weapon::for_bot();
        weapon.ammo = 0;
        assert!(!weapon.try_fire());
        assert_eq!(weapon.ammo, 0);
        assert_eq!(weapon.reload_timer, 0);
    }

    #[test]
    fn test_partial_refill_regenerates_one_unit() {
        let reload = 40;
        let mut weapon = Weapon::for_hero(reload);
        weapon.try_fire();
        // The shot's own frame also ticks the weapon
        weapon.tick();

        for _ in 0..reload - 1 {
            weapon.tick();
            assert_eq!(weapon.ammo, 2);
        }
        weapon.tick();
        assert_eq!(weapon.ammo, 3);
        assert_eq!(weapon.reload_timer, 20);

        // Full: further frames only drain the timer, never exceed max
        for _ in 0..200 {
            weapon.tick();
            assert!(weapon.ammo <= weapon.max_ammo);
        }
        assert_eq!(weapon.ammo, 3);
        assert_eq!(weapon.reload_timer, 0);
    }

    #[test]
    fn test_odd_reload_refill_rounds_up() {
        assert_eq!(Weapon::for_hero(25).refill_frames, 13);
        assert_eq!(Weapon::for_hero(12).refill_frames, 6);
    }

    #[test]
    fn test_bot_refill_uses_full_reload() {
        let mut weapon = Weapon::for_bot();
        weapon.ammo = 1;
        weapon.tick();
        assert_eq!(weapon.ammo, 2);
        assert_eq!(weapon.reload_timer, RELOAD_TIME);
    }
}
