//! Scripted input: a timeline of key edges and fire requests.
//!
//! A script is a JSON array of entries:
//!
//! ```json
//! [
//!   { "tick": 0, "press": ["Up"] },
//!   { "tick": 30, "release": ["Up"], "press": ["Left"], "fire": true }
//! ]
//! ```
//!
//! Each poll consumes one tick. Releases in an entry are reported before its
//! presses.

use serde::{Deserialize, Serialize};

use battlecity_core::enums::Direction;
use battlecity_core::input::{DirectionEdge, InputAdapter};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub tick: u64,
    #[serde(default)]
    pub press: Vec<Direction>,
    #[serde(default)]
    pub release: Vec<Direction>,
    #[serde(default)]
    pub fire: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    entries: Vec<ScriptEntry>,
    cursor: usize,
    tick: u64,
    fire_latched: bool,
}

impl ScriptedInput {
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by_key(|entry| entry.tick);
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Whether every entry has been played.
    pub fn finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }
}

impl InputAdapter for ScriptedInput {
    fn poll_edges(&mut self) -> Vec<DirectionEdge> {
        let mut edges = Vec::new();
        while let Some(entry) = self.entries.get(self.cursor) {
            if entry.tick > self.tick {
                break;
            }
            edges.extend(entry.release.iter().copied().map(DirectionEdge::release));
            edges.extend(entry.press.iter().copied().map(DirectionEdge::press));
            self.fire_latched |= entry.fire;
            self.cursor += 1;
        }
        self.tick += 1;
        edges
    }

    fn poll_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire_latched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_play_on_their_tick() {
        let mut input = ScriptedInput::from_json(
            r#"[
                { "tick": 2, "release": ["Up"], "press": ["Left"], "fire": true },
                { "tick": 0, "press": ["Up"] }
            ]"#,
        )
        .unwrap();

        assert_eq!(input.poll_edges(), vec![DirectionEdge::press(Direction::Up)]);
        assert!(!input.poll_fire());
        assert!(input.poll_edges().is_empty());
        assert_eq!(
            input.poll_edges(),
            vec![
                DirectionEdge::release(Direction::Up),
                DirectionEdge::press(Direction::Left),
            ]
        );
        assert!(input.poll_fire());
        assert!(!input.poll_fire());
        assert!(input.finished());
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert!(ScriptedInput::from_json(r#"[{ "tick": 0, "press": ["Sideways"] }]"#).is_err());
    }

    #[test]
    fn test_empty_script() {
        let mut input = ScriptedInput::default();
        assert!(input.finished());
        assert!(input.poll_edges().is_empty());
        assert!(!input.poll_fire());
    }
}
