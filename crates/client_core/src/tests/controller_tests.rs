use super::*;

fn commands(effects: &[Effect]) -> Vec<&Command> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Command(command) => Some(command),
            _ => None,
        })
        .collect()
}

#[test]
fn key_down_moves_and_highlights_once() {
    let state = ControlState::new();
    let (state, effects) = reduce(
        state,
        ControlEvent::KeyDown {
            key: DriveKey::W,
            typing: false,
        },
    );

    assert_eq!(state.active_key, Some(DriveKey::W));
    assert_eq!(
        effects,
        vec![
            Effect::Highlight(Direction::Forward),
            Effect::Command(Command::Move(Direction::Forward)),
        ]
    );
}

#[test]
fn held_key_repeat_fires_exactly_once() {
    let (state, first) = reduce(
        ControlState::new(),
        ControlEvent::KeyDown {
            key: DriveKey::D,
            typing: false,
        },
    );
    assert_eq!(first.len(), 2);

    // OS key repeat delivers the same key-down again and again.
    let mut state = state;
    for _ in 0..5 {
        let (next, effects) = reduce(
            state,
            ControlEvent::KeyDown {
                key: DriveKey::D,
                typing: false,
            },
        );
        assert!(effects.is_empty());
        state = next;
    }
    assert_eq!(state.active_key, Some(DriveKey::D));
}

#[test]
fn last_key_wins_without_stopping_displaced_key() {
    let (state, _) = reduce(
        ControlState::new(),
        ControlEvent::KeyDown {
            key: DriveKey::W,
            typing: false,
        },
    );
    let (state, effects) = reduce(
        state,
        ControlEvent::KeyDown {
            key: DriveKey::A,
            typing: false,
        },
    );

    assert_eq!(state.active_key, Some(DriveKey::A));
    assert_eq!(
        commands(&effects),
        vec![&Command::Move(Direction::Left)],
        "displacing a held key moves, it does not stop"
    );

    // The stale release of the displaced key must not stop the newer hold.
    let (state, effects) = reduce(state, ControlEvent::KeyUp { key: DriveKey::W });
    assert!(effects.is_empty());
    assert_eq!(state.active_key, Some(DriveKey::A));
}

#[test]
fn key_up_for_active_key_stops_and_clears() {
    let (state, _) = reduce(
        ControlState::new(),
        ControlEvent::KeyDown {
            key: DriveKey::ArrowDown,
            typing: false,
        },
    );
    let (state, effects) = reduce(
        state,
        ControlEvent::KeyUp {
            key: DriveKey::ArrowDown,
        },
    );

    assert_eq!(state.active_key, None);
    assert_eq!(
        effects,
        vec![Effect::ClearHighlight, Effect::Command(Command::Stop)]
    );
}

#[test]
fn typing_suppresses_drive_keys() {
    let (state, effects) = reduce(
        ControlState::new(),
        ControlEvent::KeyDown {
            key: DriveKey::S,
            typing: true,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.active_key, None);
}

#[test]
fn idle_mode_suppresses_movement_but_not_toggles() {
    let (state, effects) = reduce(ControlState::new(), ControlEvent::ToggleMode);
    assert_eq!(state.mode, Mode::Idle);
    assert_eq!(commands(&effects), vec![&Command::SetMode(Mode::Idle)]);

    let (state, effects) = reduce(
        state,
        ControlEvent::KeyDown {
            key: DriveKey::W,
            typing: false,
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = reduce(
        state,
        ControlEvent::PadPress {
            direction: Direction::Left,
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = reduce(state, ControlEvent::PadRelease);
    assert_eq!(effects, vec![Effect::ClearHighlight], "no stop while idle");

    // Toggle actions stay live in any mode.
    let (state, effects) = reduce(state, ControlEvent::ToggleLights);
    assert_eq!(
        commands(&effects),
        vec![&Command::Action(RobotAction::Lights { state: true })]
    );
    let (state, effects) = reduce(state, ControlEvent::ToggleRecording);
    assert_eq!(
        commands(&effects),
        vec![&Command::Record(RecordingState::Start)]
    );
    let (state, effects) = reduce(
        state,
        ControlEvent::Speak {
            text: "hold position".to_string(),
        },
    );
    assert_eq!(
        commands(&effects),
        vec![&Command::Speak("hold position".to_string())]
    );
    let (_, effects) = reduce(state, ControlEvent::Shutdown { confirmed: true });
    assert_eq!(commands(&effects), vec![&Command::Shutdown]);
}

#[test]
fn key_up_while_idle_clears_hold_without_stop_command() {
    let (state, _) = reduce(
        ControlState::new(),
        ControlEvent::KeyDown {
            key: DriveKey::W,
            typing: false,
        },
    );
    let (state, _) = reduce(state, ControlEvent::ToggleMode);
    assert_eq!(state.mode, Mode::Idle);

    let (state, effects) = reduce(state, ControlEvent::KeyUp { key: DriveKey::W });
    assert_eq!(state.active_key, None);
    assert_eq!(effects, vec![Effect::ClearHighlight]);
}

#[test]
fn medkit_deploys_exactly_once() {
    let (state, effects) = reduce(
        ControlState::new(),
        ControlEvent::DeployMedKit { confirmed: false },
    );
    assert!(effects.is_empty(), "unconfirmed deploy does nothing");
    assert!(!state.medkit_deployed);

    let (state, effects) = reduce(state, ControlEvent::DeployMedKit { confirmed: true });
    assert!(state.medkit_deployed);
    assert_eq!(
        commands(&effects),
        vec![&Command::Action(RobotAction::MedKit)]
    );

    for _ in 0..3 {
        let (next, effects) = reduce(state, ControlEvent::DeployMedKit { confirmed: true });
        assert!(commands(&effects).is_empty());
        assert_eq!(
            effects,
            vec![Effect::Notice("Med kit already deployed".to_string())]
        );
        assert_eq!(next, state);
    }
}

#[test]
fn shutdown_is_not_idempotency_guarded() {
    let mut state = ControlState::new();
    for _ in 0..2 {
        let (next, effects) = reduce(state, ControlEvent::Shutdown { confirmed: true });
        assert_eq!(commands(&effects), vec![&Command::Shutdown]);
        state = next;
    }

    let (_, effects) = reduce(state, ControlEvent::Shutdown { confirmed: false });
    assert!(effects.is_empty());
}

#[test]
fn record_toggle_twice_round_trips_with_alternating_status() {
    let (state, first) = reduce(ControlState::new(), ControlEvent::ToggleRecording);
    assert!(state.recording);
    assert_eq!(
        commands(&first),
        vec![&Command::Record(RecordingState::Start)]
    );

    let (state, second) = reduce(state, ControlEvent::ToggleRecording);
    assert!(!state.recording);
    assert_eq!(
        commands(&second),
        vec![&Command::Record(RecordingState::Stop)]
    );
    assert_eq!(state, ControlState::new());
}

#[test]
fn pad_press_and_release_mirror_key_semantics() {
    let (state, effects) = reduce(
        ControlState::new(),
        ControlEvent::PadPress {
            direction: Direction::Right,
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::Highlight(Direction::Right),
            Effect::Command(Command::Move(Direction::Right)),
        ]
    );

    let (_, effects) = reduce(state, ControlEvent::PadRelease);
    assert_eq!(
        effects,
        vec![Effect::ClearHighlight, Effect::Command(Command::Stop)]
    );
}

#[test]
fn drive_key_mapping_is_fixed() {
    assert_eq!(DriveKey::W.direction(), Direction::Forward);
    assert_eq!(DriveKey::ArrowUp.direction(), Direction::Forward);
    assert_eq!(DriveKey::S.direction(), Direction::Back);
    assert_eq!(DriveKey::ArrowDown.direction(), Direction::Back);
    assert_eq!(DriveKey::A.direction(), Direction::Left);
    assert_eq!(DriveKey::ArrowLeft.direction(), Direction::Left);
    assert_eq!(DriveKey::D.direction(), Direction::Right);
    assert_eq!(DriveKey::ArrowRight.direction(), Direction::Right);
}
