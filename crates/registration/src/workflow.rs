use std::sync::atomic::{AtomicBool, Ordering};

use net::{EquipmentCode, Notifier};
use storage::{MAX_CODENAME_LEN, PlayerRepository, StorageError};

use crate::error::EntryError;
use crate::model::{PlayerId, Team, parse_equipment};
use crate::roster::RosterEntry;
use crate::screen::{AddStep, AppState, Command, PopupKind};
use crate::widget::FocusRing;

/// A fully validated request to put a player on a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub player_id: PlayerId,
    /// Codename as entered; empty means "keep the stored one".
    pub codename: String,
    pub equipment: EquipmentCode,
    pub target_ip: String,
    pub team: Team,
}

/// Result of a successful commit.
#[derive(Debug)]
pub struct Committed {
    pub team: Team,
    pub entry: RosterEntry,
    /// Set when the equipment notification could not be sent.
    pub notify_error: Option<String>,
}

/// Drives [`AppState`] through the registration steps, calling into the
/// player store and the equipment notifier.
pub struct Registrar<R, N> {
    players: R,
    notifier: N,
    schema_ready: AtomicBool,
}

impl<R: PlayerRepository, N: Notifier> Registrar<R, N> {
    pub fn new(players: R, notifier: N) -> Self {
        Self {
            players,
            notifier,
            schema_ready: AtomicBool::new(false),
        }
    }

    pub fn players(&self) -> &R {
        &self.players
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Make sure the players table exists. Retried on the next store access
    /// after a failure.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        if self.schema_ready.load(Ordering::Acquire) {
            return Ok(());
        }
        self.players.ensure_schema().await?;
        self.schema_ready.store(true, Ordering::Release);
        Ok(())
    }

    /// Run `command` against `state`. Failures are reported inside `state`;
    /// none of them end the session.
    pub async fn execute(&self, state: &mut AppState, command: Command) {
        match command {
            Command::OpenAddPlayer => state.open_add_player(),
            Command::OpenUpdatePlayer => state.open_update_player(),
            Command::ClearRoster => {
                state.clear_roster();
                log::info!("roster cleared");
            }
            Command::StartGame => state.start_game(),
            Command::ReturnToMain => state.return_to_main(),
            Command::CancelPopup => state.close_popup(),
            Command::Next => self.next_step(state).await,
            Command::ChooseTeam(team) => self.choose_team(state, team).await,
            Command::SubmitUpdate => self.submit_update(state).await,
        }
    }

    async fn next_step(&self, state: &mut AppState) {
        let Some(popup) = state.popup() else {
            return;
        };
        match popup.kind.clone() {
            PopupKind::Add(AddStep::PlayerId) => self.submit_player_id(state).await,
            PopupKind::Add(AddStep::Codename { player_id }) => state.submit_codename(player_id),
            PopupKind::Add(AddStep::Equipment {
                player_id,
                codename,
            }) => state.submit_equipment(player_id, codename),
            PopupKind::Add(AddStep::Team { .. }) | PopupKind::Update => {}
        }
    }

    /// Step 1: validate the id and look up any stored codename.
    async fn submit_player_id(&self, state: &mut AppState) {
        let raw = state
            .popup()
            .map(|p| p.form.value(0).to_owned())
            .unwrap_or_default();
        let player_id = match PlayerId::parse(&raw) {
            Ok(id) => id,
            Err(err) => return state.reject(err.to_string()),
        };
        match self.lookup(player_id).await {
            Ok(stored) => state.show_codename_step(player_id, stored.as_deref().unwrap_or("")),
            Err(err) => state.reject(err.to_string()),
        }
    }

    async fn lookup(&self, player_id: PlayerId) -> Result<Option<String>, EntryError> {
        let stored = match self.ensure_schema().await {
            Ok(()) => self.players.find_codename(player_id.get()).await,
            Err(err) => Err(err),
        };
        stored.map_err(|err| {
            log::error!("player lookup for {player_id} failed: {err}");
            EntryError::from(err)
        })
    }

    /// Step 4: the team choice completes the wizard.
    async fn choose_team(&self, state: &mut AppState, team: Team) {
        let Some(PopupKind::Add(AddStep::Team {
            player_id,
            codename,
            equipment,
            target_ip,
        })) = state.popup().map(|p| p.kind.clone())
        else {
            return;
        };
        let registration = Registration {
            player_id,
            codename,
            equipment,
            target_ip,
            team,
        };
        self.finish(state, registration).await;
    }

    /// Single-screen variant: every field is validated before the store is
    /// touched.
    async fn submit_update(&self, state: &mut AppState) {
        let Some(popup) = state.popup() else {
            return;
        };
        let parsed = read_update_form(&popup.form);
        match parsed {
            Ok(registration) => self.finish(state, registration).await,
            Err(err) => state.reject(err.to_string()),
        }
    }

    async fn finish(&self, state: &mut AppState, registration: Registration) {
        match self.commit(registration).await {
            Ok(committed) => {
                state.roster.assign(committed.team, committed.entry);
                state.set_notice(committed.notify_error);
                state.close_popup();
            }
            Err(err) => state.reject(err.to_string()),
        }
    }

    /// Persist the player, send the equipment code, and build the roster
    /// entry. Only persistence failures abort; a failed notification is
    /// reported in [`Committed::notify_error`].
    pub async fn commit(&self, registration: Registration) -> Result<Committed, EntryError> {
        let Registration {
            player_id,
            codename,
            equipment,
            target_ip,
            team,
        } = registration;

        let stored = self.lookup(player_id).await?;
        let codename = match stored {
            Some(stored) if codename.is_empty() || codename == stored => stored,
            Some(_) => {
                check_length(&codename)?;
                self.write(self.players.update_codename(player_id.get(), &codename))
                    .await?;
                codename
            }
            None => {
                if codename.is_empty() {
                    return Err(EntryError::EmptyCodename);
                }
                check_length(&codename)?;
                self.write(self.players.insert(player_id.get(), &codename))
                    .await?;
                codename
            }
        };

        let notify_error = match self.notifier.notify(&target_ip, equipment).await {
            Ok(()) => None,
            Err(err) => {
                log::warn!("equipment {equipment} for player {player_id} not delivered: {err}");
                Some(format!("UDP send error: {err}"))
            }
        };

        log::info!("player {player_id} '{codename}' joined {team} with equipment {equipment}");
        Ok(Committed {
            team,
            entry: RosterEntry {
                player_id: player_id.to_string(),
                codename,
                equipment: equipment.to_string(),
            },
            notify_error,
        })
    }

    async fn write(
        &self,
        op: impl std::future::Future<Output = Result<(), StorageError>>,
    ) -> Result<(), EntryError> {
        op.await.map_err(|err| {
            log::error!("player write failed: {err}");
            EntryError::from(err)
        })
    }
}

fn read_update_form(form: &FocusRing) -> Result<Registration, EntryError> {
    let player_id = PlayerId::parse(form.value(0))?;
    let equipment = parse_equipment(form.value(2))?;
    let team = form.value(4).parse::<Team>()?;
    Ok(Registration {
        player_id,
        codename: form.value(1).to_owned(),
        equipment,
        target_ip: form.value(3).to_owned(),
        team,
    })
}

fn check_length(codename: &str) -> Result<(), EntryError> {
    if codename.chars().count() > MAX_CODENAME_LEN {
        return Err(EntryError::CodenameTooLong);
    }
    Ok(())
}
