//! Mode scoring and win evaluation

use super::state::{GameEvent, GameMode, MatchPhase, Score, Team, World};
use crate::consts::*;

/// Current score for the world's mode
pub fn compute_score(world: &World) -> Score {
    match world.mode {
        GameMode::GemRush => {
            // Carried gems count straight away, there is no banking
            let mut score = Score::default();
            for c in world.characters().filter(|c| c.is_alive()) {
                score.add(c.team, c.gems);
            }
            score
        }
        GameMode::Deathmatch => world.team_kills,
        GameMode::BossHunt => {
            let red = world.boss().map_or(0, |boss| {
                let pct = boss.health.max(0) as f32 / boss.max_health.max(1) as f32 * 100.0;
                pct.ceil() as u32
            });
            Score { blue: 100, red }
        }
    }
}

/// Winner implied by `score`, if any. Blue is checked first.
pub fn check_win(world: &World, score: Score) -> Option<Team> {
    match world.mode {
        GameMode::GemRush => threshold_winner(score, GEM_WIN_COUNT),
        GameMode::Deathmatch => threshold_winner(score, KILL_WIN_COUNT),
        GameMode::BossHunt => world.boss().is_none().then_some(Team::Blue),
    }
}

fn threshold_winner(score: Score, target: u32) -> Option<Team> {
    if score.blue >= target {
        Some(Team::Blue)
    } else if score.red >= target {
        Some(Team::Red)
    } else {
        None
    }
}

/// Move to `Ended`. Only the first call has any effect; returns whether it did.
pub fn end_match(world: &mut World, winner: Team) -> bool {
    if !world.is_active() {
        return false;
    }
    world.phase = MatchPhase::Ended { winner };
    world.events.push(GameEvent::MatchEnded { winner });
    log::info!(
        "Match over after {} frames: {} wins ({} mode)",
        world.frame,
        winner.as_str(),
        world.mode.as_str()
    );
    true
}

/// Refresh the reported score and fire the win trigger
pub fn update(world: &mut World) {
    let score = compute_score(world);
    world.score = score;
    if world.is_active() {
        if let Some(winner) = check_win(world, score) {
            end_match(world, winner);
        }
    }
}
