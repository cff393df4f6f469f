//! Announcer commentary plumbing
//!
//! The simulation never waits on commentary. It pushes requests onto a
//! bounded outbound queue; the platform shell drains the queue, asks the
//! announcer service, and feeds whatever comes back (possibly nothing) into
//! the [`MessageLog`] shown by the HUD.

use std::collections::VecDeque;

use crate::consts::FRAMES_PER_SECOND;
use crate::sim::GameMode;

/// Requests beyond this many are dropped until the shell drains the queue
pub const COMMENTARY_QUEUE_CAPACITY: usize = 8;

/// On-screen lifetime of a message (3 s)
pub const MESSAGE_LIFETIME: u32 = 3 * FRAMES_PER_SECOND;

/// Shown when the match-start commentary cannot be fetched
pub const MATCH_START_FALLBACK: &str = "BRAWL TIME!";

pub const EVENT_MATCH_START: &str = "Match Start";
pub const EVENT_PLAYER_DIED: &str = "Player Died";
pub const EVENT_ENEMY_ELIMINATED: &str = "Enemy Eliminated";

/// One announcer request: an event name and a short context sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub event: &'static str,
    pub context: String,
}

impl CommentaryRequest {
    pub fn match_start(mode: GameMode) -> Self {
        let context = match mode {
            GameMode::GemRush => "The match has started.",
            GameMode::Deathmatch => "Team Deathmatch started. Kill enemies.",
            GameMode::BossHunt => "Boss Hunt started. Take down the giant robot.",
        };
        Self {
            event: EVENT_MATCH_START,
            context: context.to_string(),
        }
    }

    pub fn player_died() -> Self {
        Self {
            event: EVENT_PLAYER_DIED,
            context: "The blue team player was eliminated.".to_string(),
        }
    }

    pub fn enemy_eliminated() -> Self {
        Self {
            event: EVENT_ENEMY_ELIMINATED,
            context: "The player killed an enemy bot.".to_string(),
        }
    }

    /// What to show if the announcer never answers
    pub fn fallback(&self) -> Option<&'static str> {
        (self.event == EVENT_MATCH_START).then_some(MATCH_START_FALLBACK)
    }
}

/// Bounded fire-and-forget outbound queue
#[derive(Debug, Clone, Default)]
pub struct CommentaryQueue {
    pending: VecDeque<CommentaryRequest>,
}

impl CommentaryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request; returns false (and drops it) when the queue is full
    pub fn push(&mut self, request: CommentaryRequest) -> bool {
        if self.pending.len() >= COMMENTARY_QUEUE_CAPACITY {
            log::warn!("Commentary queue full, dropping '{}'", request.event);
            return false;
        }
        self.pending.push_back(request);
        true
    }

    /// Take every queued request, oldest first
    pub fn drain(&mut self) -> Vec<CommentaryRequest> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Where a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    System,
    Announcer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u32,
    pub text: String,
    pub kind: MessageKind,
    /// Frames until the message disappears
    pub frames_left: u32,
}

/// Short-lived HUD messages
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: u32,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message; blank text is ignored (announcer said nothing)
    pub fn push(&mut self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.next_id += 1;
        self.messages.push(Message {
            id: self.next_id,
            text: text.to_string(),
            kind,
            frames_left: MESSAGE_LIFETIME,
        });
    }

    /// Record the announcer's answer to `request`, falling back when absent
    pub fn push_response(&mut self, request: &CommentaryRequest, response: Option<String>) {
        match response.filter(|t| !t.trim().is_empty()) {
            Some(text) => self.push(text, MessageKind::Announcer),
            None => {
                if let Some(fallback) = request.fallback() {
                    self.push(fallback, MessageKind::System);
                }
            }
        }
    }

    /// Age messages by one frame and drop expired ones
    pub fn tick(&mut self) {
        for msg in &mut self.messages {
            msg.frames_left = msg.frames_left.saturating_sub(1);
        }
        self.messages.retain(|m| m.frames_left > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
