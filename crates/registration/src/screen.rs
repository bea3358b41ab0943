//! Screens of the entry console and the transitions that need no I/O.

use std::time::Duration;

use net::EquipmentCode;

use crate::model::{PlayerId, Team, parse_equipment};
use crate::roster::Roster;
use crate::widget::{Button, FocusRing, Key, TextInput, Widget};

/// Length of the pre-game countdown.
pub const COUNTDOWN: Duration = Duration::from_secs(30);

pub const DEFAULT_UDP_IP: &str = "127.0.0.1";

/// What a button (or shortcut) asks the workflow to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenAddPlayer,
    OpenUpdatePlayer,
    ClearRoster,
    StartGame,
    ReturnToMain,
    /// Advance the add-player wizard past its current step.
    Next,
    ChooseTeam(Team),
    SubmitUpdate,
    CancelPopup,
}

/// Data gathered so far by the add-player wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddStep {
    PlayerId,
    Codename {
        player_id: PlayerId,
    },
    Equipment {
        player_id: PlayerId,
        codename: String,
    },
    Team {
        player_id: PlayerId,
        codename: String,
        equipment: EquipmentCode,
        target_ip: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupKind {
    Add(AddStep),
    Update,
}

impl PopupKind {
    pub fn header(&self) -> &'static str {
        match self {
            PopupKind::Add(AddStep::PlayerId) => "Step 1: Enter Player ID",
            PopupKind::Add(AddStep::Codename { .. }) => "Step 2: Enter/Update Codename",
            PopupKind::Add(AddStep::Equipment { .. }) => "Step 3: Equipment ID & UDP IP",
            PopupKind::Add(AddStep::Team { .. }) => "Step 4: Choose Team",
            PopupKind::Update => "Update Player Information",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub kind: PopupKind,
    pub form: FocusRing,
    /// Last validation or storage error, shown under the form.
    pub info: Option<String>,
}

impl Popup {
    fn new(kind: PopupKind, widgets: Vec<Widget>) -> Self {
        Self {
            kind,
            form: FocusRing::new(widgets),
            info: None,
        }
    }
}

fn input(label: &'static str) -> Widget {
    Widget::TextInput(TextInput::new(label))
}

fn prefilled(label: &'static str, text: &str) -> Widget {
    Widget::TextInput(TextInput::with_text(label, text))
}

fn button(label: &'static str, command: Command) -> Widget {
    Widget::Button(Button::new(label, command))
}

/// Counts down to the start of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self { remaining: total }
    }

    pub fn tick(&mut self, delta: Duration) {
        self.remaining = self.remaining.saturating_sub(delta);
    }

    /// Whole seconds left, rounded up so the display starts at the full length.
    pub fn seconds_left(&self) -> u64 {
        self.remaining.as_secs() + u64::from(self.remaining.subsec_nanos() > 0)
    }

    pub fn finished(&self) -> bool {
        self.remaining.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScreen {
    pub countdown: Countdown,
    pub form: FocusRing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Main,
    Popup(Popup),
    Game(GameScreen),
}

/// Everything the console shows and edits, owned by the client and passed
/// by `&mut` into every transition.
#[derive(Debug, Clone)]
pub struct AppState {
    pub roster: Roster,
    screen: Screen,
    main_menu: FocusRing,
    notice: Option<String>,
    default_udp_ip: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_UDP_IP)
    }
}

impl AppState {
    pub fn new(default_udp_ip: impl Into<String>) -> Self {
        Self {
            roster: Roster::new(),
            screen: Screen::Main,
            main_menu: FocusRing::new(vec![
                button("Add Player", Command::OpenAddPlayer),
                button("Update Player", Command::OpenUpdatePlayer),
                button("Clear Players", Command::ClearRoster),
                button("Start Game", Command::StartGame),
            ]),
            notice: None,
            default_udp_ip: default_udp_ip.into(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn main_menu(&self) -> &FocusRing {
        &self.main_menu
    }

    pub fn popup(&self) -> Option<&Popup> {
        match &self.screen {
            Screen::Popup(popup) => Some(popup),
            _ => None,
        }
    }

    pub fn popup_mut(&mut self) -> Option<&mut Popup> {
        match &mut self.screen {
            Screen::Popup(popup) => Some(popup),
            _ => None,
        }
    }

    /// Message left on the main screen by the last commit. Any later action
    /// from the main screen dismisses it.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    /// The focus ring that receives input on the current screen.
    pub fn active_form(&self) -> &FocusRing {
        match &self.screen {
            Screen::Main => &self.main_menu,
            Screen::Popup(popup) => &popup.form,
            Screen::Game(game) => &game.form,
        }
    }

    fn active_form_mut(&mut self) -> &mut FocusRing {
        match &mut self.screen {
            Screen::Main => &mut self.main_menu,
            Screen::Popup(popup) => &mut popup.form,
            Screen::Game(game) => &mut game.form,
        }
    }

    /// Route a key press. Returns the command it triggers, if any.
    pub fn handle_key(&mut self, key: Key) -> Option<Command> {
        match (&self.screen, key) {
            (Screen::Main, Key::F5) => Some(Command::StartGame),
            (Screen::Main, Key::F12) => Some(Command::ClearRoster),
            (Screen::Popup(_), Key::Escape) => Some(Command::CancelPopup),
            (Screen::Game(_), Key::Escape) => Some(Command::ReturnToMain),
            _ => self.active_form_mut().key(key),
        }
    }

    /// Pointer click on widget `index` of the current screen.
    pub fn click(&mut self, index: usize) -> Option<Command> {
        self.active_form_mut().activate(index)
    }

    /// Type `text` into the focused widget.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.handle_key(Key::Char(c));
        }
    }

    /// Advance frame-based state such as the countdown.
    pub fn tick(&mut self, delta: Duration) {
        if let Screen::Game(game) = &mut self.screen {
            game.countdown.tick(delta);
        }
    }

    pub fn open_add_player(&mut self) {
        self.notice = None;
        self.screen = Screen::Popup(Popup::new(
            PopupKind::Add(AddStep::PlayerId),
            vec![input("Player ID:"), button("Next", Command::Next)],
        ));
    }

    pub fn open_update_player(&mut self) {
        self.notice = None;
        self.screen = Screen::Popup(Popup::new(
            PopupKind::Update,
            vec![
                input("Player ID:"),
                input("Codename:"),
                input("Equipment ID:"),
                prefilled("UDP Target IP:", &self.default_udp_ip),
                input("Team:"),
                button("Submit", Command::SubmitUpdate),
                button("Cancel", Command::CancelPopup),
            ],
        ));
    }

    pub(crate) fn show_codename_step(&mut self, player_id: PlayerId, stored: &str) {
        self.screen = Screen::Popup(Popup::new(
            PopupKind::Add(AddStep::Codename { player_id }),
            vec![prefilled("Codename:", stored), button("Next", Command::Next)],
        ));
    }

    /// Accept the codename as typed; an empty one is checked at commit.
    pub(crate) fn submit_codename(&mut self, player_id: PlayerId) {
        let codename = self
            .popup()
            .map(|p| p.form.value(0).to_owned())
            .unwrap_or_default();
        self.screen = Screen::Popup(Popup::new(
            PopupKind::Add(AddStep::Equipment {
                player_id,
                codename,
            }),
            vec![
                input("Equipment ID:"),
                prefilled("UDP Target IP:", &self.default_udp_ip),
                button("Next", Command::Next),
            ],
        ));
    }

    pub(crate) fn submit_equipment(&mut self, player_id: PlayerId, codename: String) {
        let Some(popup) = self.popup_mut() else {
            return;
        };
        let equipment = match parse_equipment(popup.form.value(0)) {
            Ok(equipment) => equipment,
            Err(err) => {
                popup.info = Some(err.to_string());
                return;
            }
        };
        let target_ip = popup.form.value(1).to_owned();
        self.screen = Screen::Popup(Popup::new(
            PopupKind::Add(AddStep::Team {
                player_id,
                codename,
                equipment,
                target_ip,
            }),
            vec![
                button("Green Team", Command::ChooseTeam(Team::Green)),
                button("Red Team", Command::ChooseTeam(Team::Red)),
            ],
        ));
    }

    /// Show `message` in the open popup, leaving the step where it is.
    pub(crate) fn reject(&mut self, message: String) {
        if let Some(popup) = self.popup_mut() {
            popup.info = Some(message);
        }
    }

    pub fn close_popup(&mut self) {
        self.screen = Screen::Main;
        self.main_menu.set_focus(0);
    }

    pub fn clear_roster(&mut self) {
        self.roster.clear();
        self.notice = None;
    }

    pub fn start_game(&mut self) {
        self.notice = None;
        self.screen = Screen::Game(GameScreen {
            countdown: Countdown::new(COUNTDOWN),
            form: FocusRing::new(vec![button("Return", Command::ReturnToMain)]),
        });
    }

    pub fn return_to_main(&mut self) {
        self.close_popup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_shortcuts() {
        let mut state = AppState::default();
        assert_eq!(state.handle_key(Key::F12), Some(Command::ClearRoster));
        assert_eq!(state.handle_key(Key::F5), Some(Command::StartGame));
        assert_eq!(state.handle_key(Key::Enter), Some(Command::OpenAddPlayer));
        state.handle_key(Key::Tab);
        assert_eq!(state.handle_key(Key::Enter), Some(Command::OpenUpdatePlayer));
    }

    #[test]
    fn shortcuts_do_nothing_inside_popups() {
        let mut state = AppState::default();
        state.open_add_player();
        assert_eq!(state.handle_key(Key::F12), None);
        assert_eq!(state.handle_key(Key::Escape), Some(Command::CancelPopup));
    }

    #[test]
    fn update_form_prefills_udp_target() {
        let mut state = AppState::new("10.0.0.255");
        state.open_update_player();
        let popup = state.popup().unwrap();
        assert_eq!(popup.kind.header(), "Update Player Information");
        assert_eq!(popup.form.value(3), "10.0.0.255");
        assert_eq!(popup.form.widgets().len(), 7);
    }

    #[test]
    fn codename_step_keeps_typed_text() {
        let mut state = AppState::default();
        let id = PlayerId::parse("5").unwrap();
        state.show_codename_step(id, "Hawk");
        state.handle_key(Key::Backspace);
        state.type_text("s ");
        state.submit_codename(id);
        match &state.popup().unwrap().kind {
            PopupKind::Add(AddStep::Equipment { codename, .. }) => assert_eq!(codename, "Haws"),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn bad_equipment_stays_on_step_three() {
        let mut state = AppState::default();
        let id = PlayerId::parse("5").unwrap();
        state.show_codename_step(id, "Hawk");
        state.submit_codename(id);
        state.type_text("x1");
        state.submit_equipment(id, "Hawk".into());
        let popup = state.popup().unwrap();
        assert_eq!(popup.kind.header(), "Step 3: Equipment ID & UDP IP");
        assert_eq!(popup.info.as_deref(), Some("Equipment ID must be an integer."));
    }

    #[test]
    fn main_screen_actions_dismiss_notice() {
        let mut state = AppState::default();
        let actions: [fn(&mut AppState); 4] = [
            AppState::clear_roster,
            AppState::start_game,
            AppState::open_add_player,
            AppState::open_update_player,
        ];
        for action in actions {
            state.return_to_main();
            state.set_notice(Some("UDP send error: unreachable".into()));
            action(&mut state);
            assert_eq!(state.notice(), None);
        }
    }

    #[test]
    fn closing_popup_keeps_notice() {
        let mut state = AppState::default();
        state.open_add_player();
        state.set_notice(Some("UDP send error: unreachable".into()));
        state.close_popup();
        assert_eq!(state.notice(), Some("UDP send error: unreachable"));
    }

    #[test]
    fn countdown_rounds_up_and_stops_at_zero() {
        let mut countdown = Countdown::new(COUNTDOWN);
        assert_eq!(countdown.seconds_left(), 30);
        countdown.tick(Duration::from_millis(500));
        assert_eq!(countdown.seconds_left(), 30);
        countdown.tick(Duration::from_millis(500));
        assert_eq!(countdown.seconds_left(), 29);
        countdown.tick(Duration::from_secs(60));
        assert!(countdown.finished());
        assert_eq!(countdown.seconds_left(), 0);
    }

    #[test]
    fn game_screen_ticks_and_returns() {
        let mut state = AppState::default();
        state.start_game();
        state.tick(Duration::from_secs(10));
        match state.screen() {
            Screen::Game(game) => assert_eq!(game.countdown.seconds_left(), 20),
            other => panic!("unexpected screen {other:?}"),
        }
        assert_eq!(state.handle_key(Key::Enter), Some(Command::ReturnToMain));
        state.return_to_main();
        assert_eq!(state.screen(), &Screen::Main);
    }
}
