//! Hero roster and loot box catalog
//!
//! Static, read-only data. A match only ever sees a [`HeroStats`] snapshot
//! taken when it starts.

use serde::Serialize;

/// A playable hero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroData {
    pub id: &'static str,
    pub name: &'static str,
    /// Unlock price in coins (0 = starter)
    pub price: u32,
    pub color: &'static str,
    pub hp: i32,
    /// World units per frame
    pub speed: f32,
    pub damage: i32,
    /// Frames between shots
    pub reload_time: u32,
    pub range: f32,
    pub description: &'static str,
}

/// A purchasable box that pays out coins or, sometimes, a locked hero
#[derive(Debug, Clone, Serialize)]
pub struct LootBoxConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub min_coins: u32,
    pub max_coins: u32,
    /// Probability (0-1) of unlocking a hero instead of coins
    pub hero_chance: f64,
    pub color: &'static str,
}

/// Hero everyone owns from the start
pub const STARTER_HERO: &str = "scout";

pub const HERO_ROSTER: &[HeroData] = &[
    HeroData {
        id: "scout",
        name: "Scout",
        price: 0,
        color: "#3b82f6",
        hp: 3800,
        speed: 5.5,
        damage: 360,
        reload_time: 40,
        range: 550.0,
        description: "Balanced fighter. Good for beginners.",
    },
    HeroData {
        id: "tank",
        name: "Heavy",
        price: 150,
        color: "#1e40af",
        hp: 6500,
        speed: 3.5,
        damage: 480,
        reload_time: 55,
        range: 400.0,
        description: "High health tank. Slow but tough.",
    },
    HeroData {
        id: "sniper",
        name: "Hawk",
        price: 300,
        color: "#60a5fa",
        hp: 2800,
        speed: 4.5,
        damage: 900,
        reload_time: 70,
        range: 850.0,
        description: "Low HP, massive damage at long range.",
    },
    HeroData {
        id: "blaze",
        name: "Blaze",
        price: 600,
        color: "#ef4444",
        hp: 4200,
        speed: 5.0,
        damage: 200,
        reload_time: 12,
        range: 350.0,
        description: "Rapid fire madness! Short range but high DPS.",
    },
    HeroData {
        id: "speedster",
        name: "Volt",
        price: 500,
        color: "#fbbf24",
        hp: 3200,
        speed: 7.5,
        damage: 280,
        reload_time: 25,
        range: 450.0,
        description: "Extremely fast. Run circles around enemies.",
    },
    HeroData {
        id: "frost",
        name: "Frost",
        price: 1000,
        color: "#06b6d4",
        hp: 5200,
        speed: 4.0,
        damage: 440,
        reload_time: 45,
        range: 550.0,
        description: "Steady and durable. Controls the battlefield.",
    },
    HeroData {
        id: "assassin",
        name: "Shade",
        price: 1200,
        color: "#581c87",
        hp: 2400,
        speed: 8.5,
        damage: 600,
        reload_time: 30,
        range: 250.0,
        description: "Very fast, deadly at close range.",
    },
    HeroData {
        id: "viper",
        name: "Viper",
        price: 1500,
        color: "#65a30d",
        hp: 2600,
        speed: 8.0,
        damage: 350,
        reload_time: 20,
        range: 450.0,
        description: "Toxic agility. Hit and run specialist.",
    },
    HeroData {
        id: "demo",
        name: "Sparky",
        price: 800,
        color: "#f97316",
        hp: 4000,
        speed: 5.0,
        damage: 550,
        reload_time: 60,
        range: 600.0,
        description: "High damage output but slower reload.",
    },
    HeroData {
        id: "mech",
        name: "Golem",
        price: 2000,
        color: "#475569",
        hp: 8000,
        speed: 3.0,
        damage: 400,
        reload_time: 50,
        range: 400.0,
        description: "A walking fortress. Massive health pool.",
    },
    HeroData {
        id: "titan",
        name: "Titan",
        price: 3500,
        color: "#1c1917",
        hp: 9500,
        speed: 2.8,
        damage: 650,
        reload_time: 65,
        range: 350.0,
        description: "The ultimate tank. Nearly unstoppable.",
    },
    HeroData {
        id: "nova",
        name: "Nova",
        price: 5000,
        color: "#ec4899",
        hp: 3000,
        speed: 6.0,
        damage: 1100,
        reload_time: 90,
        range: 950.0,
        description: "Cosmic power. Devastating long-range blasts.",
    },
];

pub const LOOT_BOXES: &[LootBoxConfig] = &[
    LootBoxConfig {
        id: "brawl_box",
        name: "Brawl Box",
        price: 100,
        min_coins: 10,
        max_coins: 50,
        hero_chance: 0.05,
        color: "#3b82f6",
    },
    LootBoxConfig {
        id: "big_box",
        name: "Big Box",
        price: 300,
        min_coins: 40,
        max_coins: 150,
        hero_chance: 0.15,
        color: "#9333ea",
    },
    LootBoxConfig {
        id: "mega_box",
        name: "Mega Box",
        price: 800,
        min_coins: 150,
        max_coins: 500,
        hero_chance: 0.40,
        color: "#ef4444",
    },
];

/// Look up a hero by id
pub fn find_hero(id: &str) -> Option<&'static HeroData> {
    HERO_ROSTER.iter().find(|h| h.id == id)
}

/// Look up a loot box by id
pub fn find_box(id: &str) -> Option<&'static LootBoxConfig> {
    LOOT_BOXES.iter().find(|b| b.id == id)
}

/// The player's combat stats, frozen at match start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroStats {
    pub id: &'static str,
    pub color: &'static str,
    pub max_health: i32,
    pub speed: f32,
    pub damage: i32,
    pub reload_time: u32,
    pub range: f32,
}

impl From<&HeroData> for HeroStats {
    fn from(hero: &HeroData) -> Self {
        Self {
            id: hero.id,
            color: hero.color,
            max_health: hero.hp,
            speed: hero.speed,
            damage: hero.damage,
            reload_time: hero.reload_time,
            range: hero.range,
        }
    }
}

impl Default for HeroStats {
    /// The starter hero
    fn default() -> Self {
        Self::from(&HERO_ROSTER[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_roster_ids_unique() {
        let ids: HashSet<_> = HERO_ROSTER.iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), HERO_ROSTER.len());
        assert_eq!(HERO_ROSTER[0].id, STARTER_HERO);
        assert_eq!(HERO_ROSTER[0].price, 0);
    }

    #[test]
    fn test_snapshot_copies_stats() {
        let hawk = find_hero("sniper").unwrap();
        let stats = HeroStats::from(hawk);
        assert_eq!(stats.max_health, 2800);
        assert_eq!(stats.damage, 900);
        assert_eq!(stats.reload_time, 70);
        assert_eq!(stats.range, 850.0);
    }

    #[test]
    fn test_box_ranges_valid() {
        for b in LOOT_BOXES {
            assert!(b.min_coins <= b.max_coins, "{}", b.id);
            assert!((0.0..=1.0).contains(&b.hero_chance), "{}", b.id);
        }
        assert!(find_box("mega_box").is_some());
        assert!(find_box("nope").is_none());
    }
}
