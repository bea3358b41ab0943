use serde::{Deserialize, Serialize};

use crate::model::Team;

/// One player staged for the next game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub codename: String,
    pub equipment: String,
}

/// Players registered this session, split by team. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    green: Vec<RosterEntry>,
    red: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self, team: Team) -> &[RosterEntry] {
        match team {
            Team::Green => &self.green,
            Team::Red => &self.red,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut Vec<RosterEntry> {
        match team {
            Team::Green => &mut self.green,
            Team::Red => &mut self.red,
        }
    }

    /// Append `entry` to `team`, dropping any earlier entry for the same
    /// player from both teams first.
    pub fn assign(&mut self, team: Team, entry: RosterEntry) {
        self.remove(&entry.player_id);
        self.team_mut(team).push(entry);
    }

    fn remove(&mut self, player_id: &str) {
        for team in Team::ALL {
            self.team_mut(team).retain(|e| e.player_id != player_id);
        }
    }

    pub fn clear(&mut self) {
        self.green.clear();
        self.red.clear();
    }

    pub fn len(&self) -> usize {
        self.green.len() + self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
