//! Profile persistence
//!
//! A tiny key-value layer: LocalStorage in the browser, an in-memory map
//! elsewhere (native runs and tests). Values are JSON. Anything missing or
//! unreadable falls back to its default.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::heroes::STARTER_HERO;

pub const COINS_KEY: &str = "brawl_coins";
pub const UNLOCKED_KEY: &str = "brawl_unlocked";
pub const SELECTED_KEY: &str = "brawl_selected";

/// Coins a brand new profile starts with
pub const DEFAULT_COINS: u32 = 800;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage; silently does nothing if storage is unavailable
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("LocalStorage write failed for '{}'", key);
                }
            }
            None => log::warn!("LocalStorage unavailable, '{}' not saved", key),
        }
    }
}

/// Read and decode a JSON value
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Could not encode '{}': {}", key, e),
    }
}

pub fn load_coins(store: &impl KeyValueStore) -> u32 {
    load_json(store, COINS_KEY).unwrap_or(DEFAULT_COINS)
}

pub fn save_coins(store: &mut impl KeyValueStore, coins: u32) {
    save_json(store, COINS_KEY, &coins);
}

/// Owned hero ids; always contains the starter hero
pub fn load_unlocked_heroes(store: &impl KeyValueStore) -> Vec<String> {
    let mut unlocked: Vec<String> = load_json(store, UNLOCKED_KEY).unwrap_or_default();
    if !unlocked.iter().any(|id| id == STARTER_HERO) {
        unlocked.insert(0, STARTER_HERO.to_string());
    }
    unlocked
}

pub fn save_unlocked_heroes(store: &mut impl KeyValueStore, unlocked: &[String]) {
    save_json(store, UNLOCKED_KEY, &unlocked);
}

/// Selected hero id. Stored as a bare string.
pub fn load_selected_hero(store: &impl KeyValueStore) -> String {
    store
        .get(SELECTED_KEY)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| STARTER_HERO.to_string())
}

pub fn save_selected_hero(store: &mut impl KeyValueStore, id: &str) {
    store.set(SELECTED_KEY, id);
}

/// Everything the shop keeps between sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub coins: u32,
    pub unlocked: Vec<String>,
    pub selected: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            coins: DEFAULT_COINS,
            unlocked: vec![STARTER_HERO.to_string()],
            selected: STARTER_HERO.to_string(),
        }
    }
}

impl Profile {
    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut profile = Self {
            coins: load_coins(store),
            unlocked: load_unlocked_heroes(store),
            selected: load_selected_hero(store),
        };
        if !profile.owns(&profile.selected) {
            log::warn!("Selected hero '{}' is not owned, using starter", profile.selected);
            profile.selected = STARTER_HERO.to_string();
        }
        log::info!(
            "Profile loaded: {} coins, {} heroes, selected {}",
            profile.coins,
            profile.unlocked.len(),
            profile.selected
        );
        profile
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        save_coins(store, self.coins);
        save_unlocked_heroes(store, &self.unlocked);
        save_selected_hero(store, &self.selected);
        log::debug!("Profile saved");
    }

    pub fn owns(&self, hero_id: &str) -> bool {
        self.unlocked.iter().any(|id| id == hero_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_gives_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_coins(&store), 800);
        assert_eq!(load_unlocked_heroes(&store), vec!["scout".to_string()]);
        assert_eq!(load_selected_hero(&store), "scout");
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_profile_survives_reload() {
        let mut store = MemoryStore::new();
        let profile = Profile {
            coins: 1234,
            unlocked: vec!["scout".into(), "tank".into()],
            selected: "tank".into(),
        };
        profile.save(&mut store);

        assert_eq!(store.get(UNLOCKED_KEY).as_deref(), Some(r#"["scout","tank"]"#));
        assert_eq!(Profile::load(&store), profile);
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set(COINS_KEY, "lots");
        store.set(UNLOCKED_KEY, "{not json");
        assert_eq!(load_coins(&store), DEFAULT_COINS);
        assert_eq!(load_unlocked_heroes(&store), vec![STARTER_HERO.to_string()]);
    }

    #[test]
    fn test_starter_always_unlocked() {
        let mut store = MemoryStore::new();
        save_unlocked_heroes(&mut store, &["tank".to_string()]);
        let unlocked = load_unlocked_heroes(&store);
        assert_eq!(unlocked[0], STARTER_HERO);
        assert!(unlocked.contains(&"tank".to_string()));
    }

    #[test]
    fn test_unowned_selection_resets() {
        let mut store = MemoryStore::new();
        save_selected_hero(&mut store, "tank");
        assert_eq!(Profile::load(&store).selected, STARTER_HERO);
    }
}
