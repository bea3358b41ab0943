use bevy::prelude::*;
use registration::{Key, Screen};

use crate::ui::WidgetSlot;
use crate::{Backend, Console};

/// Keys the console reacts to besides typed characters.
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Return | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Back => Some(Key::Backspace),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F5 => Some(Key::F5),
        KeyCode::F12 => Some(Key::F12),
        _ => None,
    }
}

/// Feed this frame's characters, then its special keys, to the console.
///
/// Characters and key presses arrive on separate event streams with no
/// ordering between them. Characters go first, so text typed just before
/// Enter in the same frame lands in the field Enter leaves.
pub fn keyboard_input(
    keys: Res<Input<KeyCode>>,
    mut chars: EventReader<ReceivedCharacter>,
    mut console: ResMut<Console>,
    backend: Res<Backend>,
) {
    let mut pressed: Vec<Key> = chars.read().map(|ev| Key::Char(ev.char)).collect();
    pressed.extend(keys.get_just_pressed().filter_map(|code| map_key(*code)));
    if pressed.is_empty() {
        return;
    }

    let state = &mut console.0;
    for key in pressed {
        if let Some(command) = state.handle_key(key) {
            backend.run(state, command);
        }
    }
}

/// Clicking a widget focuses it; clicking a button also runs its command.
pub fn pointer_input(
    interactions: Query<(&Interaction, &WidgetSlot), Changed<Interaction>>,
    mut console: ResMut<Console>,
    backend: Res<Backend>,
) {
    let clicked: Vec<usize> = interactions
        .iter()
        .filter(|(interaction, _)| **interaction == Interaction::Pressed)
        .map(|(_, slot)| slot.0)
        .collect();

    for index in clicked {
        let state = &mut console.0;
        if let Some(command) = state.click(index) {
            backend.run(state, command);
        }
    }
}

/// Run the pre-game countdown, redrawing only when the shown second changes.
pub fn advance_countdown(time: Res<Time>, mut console: ResMut<Console>) {
    let state = &mut console.bypass_change_detection().0;
    let Screen::Game(game) = state.screen() else {
        return;
    };
    let before = game.countdown.seconds_left();
    state.tick(time.delta());
    let after = match state.screen() {
        Screen::Game(game) => game.countdown.seconds_left(),
        _ => return,
    };
    if after != before {
        console.set_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;
    use std::sync::Arc;
    use std::time::Duration;

    use net::{Notifier, UdpNotifier};
    use registration::{Registrar, Team};
    use storage::{PlayerRepository, PlayerStore};

    fn app_with(port: u16) -> App {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let store = runtime
            .block_on(PlayerStore::open("sqlite::memory:", 1))
            .unwrap();
        let players: Arc<dyn PlayerRepository> = Arc::new(store);
        let notifier: Arc<dyn Notifier> = Arc::new(UdpNotifier::new(port));
        let backend = Backend::new(runtime, Registrar::new(players, notifier));

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Input<KeyCode>>()
            .add_event::<ReceivedCharacter>()
            .init_resource::<Console>()
            .insert_resource(backend)
            .add_systems(Update, (keyboard_input, advance_countdown).chain());
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.world.resource_mut::<Input<KeyCode>>().press(code);
        app.update();
        let mut keys = app.world.resource_mut::<Input<KeyCode>>();
        keys.release(code);
        keys.clear();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.world.send_event(ReceivedCharacter {
                window: Entity::PLACEHOLDER,
                char: c,
            });
        }
        app.update();
    }

    #[test]
    fn maps_console_keys() {
        assert_eq!(map_key(KeyCode::Return), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::Back), Some(Key::Backspace));
        assert_eq!(map_key(KeyCode::F12), Some(Key::F12));
        assert_eq!(map_key(KeyCode::A), None);
    }

    #[test]
    fn keyboard_registers_player_end_to_end() {
        let field = UdpSocket::bind("127.0.0.1:0").unwrap();
        field
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let mut app = app_with(field.local_addr().unwrap().port());

        press(&mut app, KeyCode::Return);
        type_text(&mut app, "42");
        press(&mut app, KeyCode::Return);
        press(&mut app, KeyCode::Return);
        {
            let console = app.world.resource::<Console>();
            let popup = console.0.popup().unwrap();
            assert_eq!(popup.kind.header(), "Step 2: Enter/Update Codename");
        }

        type_text(&mut app, "Falcon");
        press(&mut app, KeyCode::Return);
        press(&mut app, KeyCode::Return);
        type_text(&mut app, "7");
        press(&mut app, KeyCode::Return);
        press(&mut app, KeyCode::Return);
        press(&mut app, KeyCode::Return);
        {
            let console = app.world.resource::<Console>();
            assert_eq!(console.0.popup().unwrap().kind.header(), "Step 4: Choose Team");
        }
        press(&mut app, KeyCode::Return);

        let console = app.world.resource::<Console>();
        assert_eq!(console.0.screen(), &Screen::Main);
        let green = console.0.roster.team(Team::Green);
        assert_eq!(green.len(), 1);
        assert_eq!(green[0].codename, "Falcon");

        let mut buf = [0u8; 16];
        let (n, _) = field.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"7");
    }

    #[test]
    fn characters_apply_before_enter_in_same_frame() {
        let mut app = app_with(9);
        press(&mut app, KeyCode::Return);

        for c in "42".chars() {
            app.world.send_event(ReceivedCharacter {
                window: Entity::PLACEHOLDER,
                char: c,
            });
        }
        press(&mut app, KeyCode::Return);

        let console = app.world.resource::<Console>();
        let popup = console.0.popup().unwrap();
        assert_eq!(popup.kind.header(), "Step 1: Enter Player ID");
        assert_eq!(popup.form.value(0), "42");
        assert_eq!(popup.form.focus(), 1);
    }

    #[test]
    fn shortcuts_clear_and_start_game() {
        let mut app = app_with(9);
        app.world
            .resource_mut::<Console>()
            .0
            .roster
            .assign(
                Team::Red,
                registration::RosterEntry {
                    player_id: "1".into(),
                    codename: "Viper".into(),
                    equipment: "3".into(),
                },
            );

        press(&mut app, KeyCode::F12);
        assert!(app.world.resource::<Console>().0.roster.is_empty());

        press(&mut app, KeyCode::F5);
        assert!(matches!(
            app.world.resource::<Console>().0.screen(),
            Screen::Game(_)
        ));

        press(&mut app, KeyCode::Escape);
        assert_eq!(app.world.resource::<Console>().0.screen(), &Screen::Main);
    }
}
