//! Player registration for the laser-tag entry console.
//!
//! [`AppState`] holds the roster and the screen the operator is on. Key
//! presses and clicks are turned into [`Command`]s by the state itself;
//! [`Registrar::execute`] then applies them, talking to the player store
//! and the equipment notifier where a step needs it.

pub mod error;
pub mod grid;
pub mod model;
pub mod roster;
pub mod screen;
pub mod widget;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::EntryError;
pub use grid::{GRID_ROWS, GridRow, team_grid};
pub use model::{PlayerId, Team};
pub use roster::{Roster, RosterEntry};
pub use screen::{AddStep, AppState, Command, Countdown, GameScreen, Popup, PopupKind, Screen};
pub use widget::{Button, FocusRing, Key, TextInput, Widget};
pub use workflow::{Committed, Registrar, Registration};
