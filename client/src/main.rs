use anyhow::Result;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;
use photon_console::config::Cli;
use photon_console::{Backend, Console, ConsolePlugin};
use registration::AppState;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Laser Tag - Player Entry".into(),
                    resolution: (1024.0, 768.0).into(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level: Level::INFO,
                filter: "wgpu=error,naga=warn,sqlx=warn".into(),
            }),
    );

    // logging is live once the plugins are in
    let backend = Backend::connect(&cli)?;
    app.insert_resource(Console(AppState::new(cli.udp_ip.clone())))
        .insert_resource(backend)
        .add_plugins(ConsolePlugin)
        .run();
    Ok(())
}
