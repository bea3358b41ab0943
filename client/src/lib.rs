//! Bevy shell around the registration workflow: owns the window, feeds
//! keyboard and pointer input to [`AppState`] and redraws the current
//! screen whenever it changes.

pub mod config;
pub mod input;
pub mod ui;

use std::sync::Arc;

use anyhow::Result;
use bevy::prelude::*;
use net::{Notifier, UdpNotifier};
use registration::{AppState, Command, Registrar};
use storage::{PlayerRepository, PlayerStore};
use tokio::runtime::Runtime;

use crate::config::Cli;

pub type SharedRegistrar = Registrar<Arc<dyn PlayerRepository>, Arc<dyn Notifier>>;

/// The console state as a bevy resource.
#[derive(Resource, Default)]
pub struct Console(pub AppState);

/// Runs workflow commands to completion on a single-threaded runtime.
/// A slow store or network stalls the frame that issued the command.
#[derive(Resource)]
pub struct Backend {
    runtime: Runtime,
    registrar: SharedRegistrar,
}

impl Backend {
    pub fn new(runtime: Runtime, registrar: SharedRegistrar) -> Self {
        Self { runtime, registrar }
    }

    /// Build the production backend from startup settings. An unreachable
    /// database is logged and reported again by each command that needs it.
    pub fn connect(cli: &Cli) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let store =
            runtime.block_on(PlayerStore::open_lazy(&cli.database_url, cli.db_max_connections))?;
        let players: Arc<dyn PlayerRepository> = Arc::new(store);
        let notifier: Arc<dyn Notifier> = Arc::new(UdpNotifier::new(cli.udp_port));
        let backend = Self::new(runtime, Registrar::new(players, notifier));
        backend.prepare();
        Ok(backend)
    }

    /// Create the players table up front so the first lookup is not the one
    /// to find out the database is missing.
    pub fn prepare(&self) {
        match self.runtime.block_on(self.registrar.ensure_schema()) {
            Ok(()) => log::info!("players table ready"),
            Err(err) => log::error!("could not prepare players table: {err}"),
        }
    }

    pub fn run(&self, state: &mut AppState, command: Command) {
        log::debug!("running {command:?}");
        self.runtime.block_on(self.registrar.execute(state, command));
    }
}

pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Console>()
            .add_systems(Startup, ui::setup_camera)
            .add_systems(
                Update,
                (
                    input::keyboard_input,
                    input::pointer_input,
                    input::advance_countdown,
                    ui::redraw,
                )
                    .chain(),
            );
    }
}
