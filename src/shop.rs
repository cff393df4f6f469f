//! Coins, hero unlocks and loot boxes
//!
//! Every successful action writes the profile back to the store. A rejected
//! action returns a [`ShopError`] and leaves the profile untouched.

use core::fmt;

use rand::Rng;

use crate::consts::{LOSS_REWARD, WIN_REWARD};
use crate::heroes::{self, HERO_ROSTER, HeroData, HeroStats};
use crate::persistence::{KeyValueStore, Profile};
use crate::sim::Team;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShopError {
    UnknownHero(String),
    AlreadyUnlocked(String),
    NotUnlocked(String),
    InsufficientCoins { needed: u32, available: u32 },
    UnknownBox(String),
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHero(id) => write!(f, "unknown hero '{id}'"),
            Self::AlreadyUnlocked(id) => write!(f, "hero '{id}' is already unlocked"),
            Self::NotUnlocked(id) => write!(f, "hero '{id}' is not unlocked"),
            Self::InsufficientCoins { needed, available } => {
                write!(f, "not enough coins: need {needed}, have {available}")
            }
            Self::UnknownBox(id) => write!(f, "unknown loot box '{id}'"),
        }
    }
}

impl std::error::Error for ShopError {}

/// What a loot box paid out
#[derive(Debug, Clone, PartialEq)]
pub enum BoxReward {
    Coins(u32),
    Hero(&'static HeroData),
}

pub struct Shop<S: KeyValueStore> {
    store: S,
    profile: Profile,
}

impl<S: KeyValueStore> Shop<S> {
    /// Load the saved profile (or defaults) from `store`
    pub fn load(store: S) -> Self {
        let profile = Profile::load(&store);
        Self { store, profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn coins(&self) -> u32 {
        self.profile.coins
    }

    pub fn owns(&self, hero_id: &str) -> bool {
        self.profile.owns(hero_id)
    }

    /// Equipped hero; the starter if the selection no longer exists
    pub fn current_hero(&self) -> &'static HeroData {
        heroes::find_hero(&self.profile.selected).unwrap_or(&HERO_ROSTER[0])
    }

    /// Snapshot handed to a new match
    pub fn hero_stats(&self) -> HeroStats {
        HeroStats::from(self.current_hero())
    }

    fn spend(&mut self, price: u32) -> Result<(), ShopError> {
        if self.profile.coins < price {
            return Err(ShopError::InsufficientCoins {
                needed: price,
                available: self.profile.coins,
            });
        }
        self.profile.coins -= price;
        Ok(())
    }

    fn save(&mut self) {
        self.profile.save(&mut self.store);
    }

    /// Buy a locked hero and equip it
    pub fn buy_hero(&mut self, hero_id: &str) -> Result<&'static HeroData, ShopError> {
        let hero = heroes::find_hero(hero_id).ok_or_else(|| ShopError::UnknownHero(hero_id.to_string()))?;
        if self.owns(hero.id) {
            return Err(ShopError::AlreadyUnlocked(hero.id.to_string()));
        }
        self.spend(hero.price)?;

        self.profile.unlocked.push(hero.id.to_string());
        self.profile.selected = hero.id.to_string();
        self.save();
        log::info!("Bought {} for {} coins", hero.name, hero.price);
        Ok(hero)
    }

    /// Equip an owned hero
    pub fn select_hero(&mut self, hero_id: &str) -> Result<(), ShopError> {
        let hero = heroes::find_hero(hero_id).ok_or_else(|| ShopError::UnknownHero(hero_id.to_string()))?;
        if !self.owns(hero.id) {
            return Err(ShopError::NotUnlocked(hero.id.to_string()));
        }
        self.profile.selected = hero.id.to_string();
        self.save();
        Ok(())
    }

    /// Pay for a box and roll it: a random locked hero with the box's hero
    /// chance (when any are left), otherwise a uniform coin amount.
    pub fn open_box(&mut self, box_id: &str, rng: &mut impl Rng) -> Result<BoxReward, ShopError> {
        let config = heroes::find_box(box_id).ok_or_else(|| ShopError::UnknownBox(box_id.to_string()))?;
        self.spend(config.price)?;

        let locked: Vec<&'static HeroData> = HERO_ROSTER.iter().filter(|h| !self.owns(h.id)).collect();
        let roll: f64 = rng.random();

        let reward = if !locked.is_empty() && roll < config.hero_chance {
            let hero = locked[rng.random_range(0..locked.len())];
            self.profile.unlocked.push(hero.id.to_string());
            BoxReward::Hero(hero)
        } else {
            let coins = rng.random_range(config.min_coins..=config.max_coins);
            self.profile.coins += coins;
            BoxReward::Coins(coins)
        };

        self.save();
        log::info!("Opened {}: {:?}", config.name, reward);
        Ok(reward)
    }

    /// Pay out the end-of-match reward; returns the coins earned
    pub fn award_match(&mut self, winner: Team) -> u32 {
        let earned = match winner {
            Team::Blue => WIN_REWARD,
            Team::Red => LOSS_REWARD,
        };
        self.profile.coins += earned;
        self.save();
        earned
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Result line shown in the message log
pub fn result_message(winner: Team, earned: u32) -> String {
    match winner {
        Team::Blue => format!("Victory! +{earned} Coins"),
        Team::Red => format!("Defeat... +{earned} Coins"),
    }
}
