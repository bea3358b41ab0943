use bevy::prelude::*;
use registration::{
    AddStep, AppState, Command, FocusRing, GameScreen, Popup, PopupKind, Screen, Team, Widget,
    team_grid,
};

use crate::Console;

const FONT_SIZE: f32 = 22.0;
const HEADER_SIZE: f32 = 28.0;
const ROW_HEIGHT: f32 = 34.0;
const TABLE_WIDTH: f32 = 924.0;

const BACKGROUND: Color = Color::BLACK;
const PANEL: Color = Color::rgb(0.27, 0.35, 0.45);
const GRID_LINE: Color = Color::rgb(0.2, 0.2, 0.2);
const FOCUS: Color = Color::rgb(0.12, 0.56, 1.0);
const BUTTON: Color = Color::rgb(0.25, 0.25, 0.25);
const ERROR: Color = Color::rgb(1.0, 0.35, 0.35);

fn team_color(team: Team) -> Color {
    match team {
        Team::Green => Color::rgb(0.0, 0.5, 0.0),
        Team::Red => Color::rgb(0.55, 0.0, 0.0),
    }
}

fn row_color(team: Team) -> Color {
    match team {
        Team::Green => Color::rgb(0.8, 0.93, 0.8),
        Team::Red => Color::rgb(0.95, 0.8, 0.8),
    }
}

fn button_color(command: &Command) -> Color {
    match command {
        Command::ChooseTeam(team) => team_color(*team),
        _ => BUTTON,
    }
}

/// Everything drawn for the current screen hangs off this entity.
#[derive(Component)]
pub struct ScreenRoot;

/// Index of a widget in the focus ring of the current screen.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSlot(pub usize);

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Rebuild the screen from [`Console`] whenever it changed this frame.
pub fn redraw(
    mut commands: Commands,
    console: Res<Console>,
    roots: Query<Entity, With<ScreenRoot>>,
) {
    if !console.is_changed() {
        return;
    }
    for root in &roots {
        commands.entity(root).despawn_recursive();
    }

    let state = &console.0;
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    padding: UiRect::all(Val::Px(24.0)),
                    row_gap: Val::Px(16.0),
                    ..default()
                },
                background_color: BACKGROUND.into(),
                ..default()
            },
            ScreenRoot,
        ))
        .with_children(|root| match state.screen() {
            Screen::Main => {
                roster_table(root, state);
                if let Some(notice) = state.notice() {
                    label(root, notice, FONT_SIZE, ERROR);
                }
                form(root, state.main_menu(), FlexDirection::Row);
            }
            Screen::Popup(popup) => {
                roster_table(root, state);
                popup_panel(root, popup);
            }
            Screen::Game(game) => game_screen(root, state, game),
        });
}

fn label(parent: &mut ChildBuilder, text: impl Into<String>, size: f32, color: Color) {
    parent.spawn(TextBundle::from_section(
        text,
        TextStyle {
            font_size: size,
            color,
            ..default()
        },
    ));
}

fn banner(parent: &mut ChildBuilder, text: &str, height: f32, color: Color) {
    parent
        .spawn(NodeBundle {
            style: Style {
                height: Val::Px(height),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            background_color: color.into(),
            ..default()
        })
        .with_children(|b| label(b, text, FONT_SIZE, Color::WHITE));
}

fn roster_table(parent: &mut ChildBuilder, state: &AppState) {
    parent
        .spawn(NodeBundle {
            style: Style {
                width: Val::Px(TABLE_WIDTH),
                flex_direction: FlexDirection::Row,
                ..default()
            },
            ..default()
        })
        .with_children(|table| {
            for team in Team::ALL {
                team_column(table, state, team);
            }
        });
}

fn team_column(parent: &mut ChildBuilder, state: &AppState, team: Team) {
    parent
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(50.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            ..default()
        })
        .with_children(|col| {
            banner(col, team.title(), 40.0, team_color(team));
            banner(col, "Codename", 30.0, team_color(team).with_a(0.7));
            for row in team_grid(&state.roster, team) {
                col.spawn(NodeBundle {
                    style: Style {
                        height: Val::Px(ROW_HEIGHT),
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        border: UiRect::bottom(Val::Px(1.0)),
                        ..default()
                    },
                    background_color: row_color(team).into(),
                    border_color: BorderColor(GRID_LINE),
                    ..default()
                })
                .with_children(|cells| {
                    cells
                        .spawn(NodeBundle {
                            style: Style {
                                width: Val::Px(50.0),
                                justify_content: JustifyContent::Center,
                                ..default()
                            },
                            ..default()
                        })
                        .with_children(|c| {
                            label(c, row.number.to_string(), FONT_SIZE, Color::BLACK)
                        });
                    if let Some(codename) = row.codename {
                        label(cells, codename, FONT_SIZE, Color::BLACK);
                    }
                });
            }
        });
}

/// Draw a focus ring; index `i` of the ring becomes [`WidgetSlot`]`(i)`.
fn form(parent: &mut ChildBuilder, ring: &FocusRing, direction: FlexDirection) {
    parent
        .spawn(NodeBundle {
            style: Style {
                flex_direction: direction,
                column_gap: Val::Px(20.0),
                row_gap: Val::Px(8.0),
                ..default()
            },
            ..default()
        })
        .with_children(|row| {
            for (index, widget) in ring.widgets().iter().enumerate() {
                let outline = if index == ring.focus() {
                    FOCUS
                } else {
                    Color::NONE
                };
                match widget {
                    Widget::TextInput(input) => {
                        label(row, input.label, FONT_SIZE, Color::WHITE);
                        row.spawn((
                            ButtonBundle {
                                style: Style {
                                    width: Val::Px(360.0),
                                    height: Val::Px(32.0),
                                    padding: UiRect::horizontal(Val::Px(5.0)),
                                    align_items: AlignItems::Center,
                                    border: UiRect::all(Val::Px(3.0)),
                                    ..default()
                                },
                                background_color: Color::WHITE.into(),
                                border_color: BorderColor(outline),
                                ..default()
                            },
                            WidgetSlot(index),
                        ))
                        .with_children(|b| label(b, input.text(), FONT_SIZE, Color::BLACK));
                    }
                    Widget::Button(button) => {
                        row.spawn((
                            ButtonBundle {
                                style: Style {
                                    min_width: Val::Px(160.0),
                                    height: Val::Px(44.0),
                                    padding: UiRect::horizontal(Val::Px(12.0)),
                                    justify_content: JustifyContent::Center,
                                    align_items: AlignItems::Center,
                                    border: UiRect::all(Val::Px(3.0)),
                                    ..default()
                                },
                                background_color: button_color(&button.command).into(),
                                border_color: BorderColor(outline),
                                ..default()
                            },
                            WidgetSlot(index),
                        ))
                        .with_children(|b| label(b, button.label, FONT_SIZE, Color::WHITE));
                    }
                }
            }
        });
}

fn popup_panel(parent: &mut ChildBuilder, popup: &Popup) {
    let direction = match popup.kind {
        PopupKind::Add(AddStep::Team { .. }) => FlexDirection::Row,
        _ => FlexDirection::Column,
    };
    parent
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            background_color: Color::rgba(0.0, 0.0, 0.0, 0.6).into(),
            ..default()
        })
        .with_children(|overlay| {
            overlay
                .spawn(NodeBundle {
                    style: Style {
                        min_width: Val::Px(420.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(20.0)),
                        row_gap: Val::Px(12.0),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    background_color: PANEL.into(),
                    border_color: BorderColor(Color::BLACK),
                    ..default()
                })
                .with_children(|panel| {
                    label(panel, popup.kind.header(), HEADER_SIZE, Color::WHITE);
                    form(panel, &popup.form, direction);
                    if let Some(info) = &popup.info {
                        label(panel, info.as_str(), FONT_SIZE, ERROR);
                    }
                });
        });
}

fn game_screen(parent: &mut ChildBuilder, state: &AppState, game: &GameScreen) {
    let message = if game.countdown.finished() {
        "Play Action Screen - Under Construction".to_owned()
    } else {
        format!("Game starts in {}", game.countdown.seconds_left())
    };
    parent
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                flex_grow: 1.0,
                flex_direction: FlexDirection::Row,
                ..default()
            },
            ..default()
        })
        .with_children(|cols| {
            team_panel(cols, state, Team::Green);
            cols.spawn(NodeBundle {
                style: Style {
                    width: Val::Percent(34.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                ..default()
            })
            .with_children(|mid| label(mid, message, 32.0, Color::WHITE));
            team_panel(cols, state, Team::Red);
        });
    form(parent, &game.form, FlexDirection::Row);
}

fn team_panel(parent: &mut ChildBuilder, state: &AppState, team: Team) {
    parent
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(33.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(6.0),
                ..default()
            },
            background_color: team_color(team).into(),
            ..default()
        })
        .with_children(|panel| {
            label(panel, team.title(), HEADER_SIZE, Color::WHITE);
            for entry in state.roster.team(team) {
                label(panel, entry.codename.as_str(), FONT_SIZE, Color::WHITE);
            }
        });
}
