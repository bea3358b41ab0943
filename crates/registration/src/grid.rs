use crate::model::Team;
use crate::roster::Roster;

/// Rows drawn per team on the entry screen.
pub const GRID_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow<'a> {
    /// 1-based row label.
    pub number: usize,
    pub codename: Option<&'a str>,
}

/// Lay a team out on the fixed grid. Players past the last row are not shown.
pub fn team_grid(roster: &Roster, team: Team) -> [GridRow<'_>; GRID_ROWS] {
    let entries = roster.team(team);
    std::array::from_fn(|i| GridRow {
        number: i + 1,
        codename: entries.get(i).map(|e| e.codename.as_str()),
    })
}
