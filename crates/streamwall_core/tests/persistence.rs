use streamwall_core::{update, AppState, Effect, Msg, WallSettings};

#[test]
fn restore_before_first_render_creates_players() {
    wall_logging::initialize_for_tests();
    let persisted = vec![
        "https://x/a.m3u8".to_string(),
        "https://x/b.m3u8".to_string(),
    ];

    let (state, effects) = update(AppState::new(), Msg::RestoreUrls(persisted.clone()));

    assert_eq!(state.urls(), persisted.as_slice());
    assert_eq!(
        effects,
        vec![
            Effect::AttachPlayer {
                player_id: 1,
                url: "https://x/a.m3u8".to_string(),
            },
            Effect::AttachPlayer {
                player_id: 2,
                url: "https://x/b.m3u8".to_string(),
            },
        ]
    );
}

#[test]
fn restore_of_absent_snapshot_shows_empty_state() {
    wall_logging::initialize_for_tests();
    let (state, effects) = update(AppState::new(), Msg::RestoreUrls(Vec::new()));

    assert!(effects.is_empty());
    assert!(state.view().is_empty());
}

#[test]
fn restore_drops_repeated_addresses() {
    wall_logging::initialize_for_tests();
    let (state, _) = update(
        AppState::new(),
        Msg::RestoreUrls(vec![
            "https://x/a.m3u8".to_string(),
            "https://x/a.m3u8".to_string(),
        ]),
    );

    assert_eq!(state.urls(), ["https://x/a.m3u8"]);
    assert_eq!(state.player_count(), 1);
}

#[test]
fn disabled_auto_save_skips_snapshot_writes() {
    wall_logging::initialize_for_tests();
    let state = AppState::with_settings(WallSettings {
        auto_save: false,
        ..WallSettings::default()
    });
    let (state, _) = update(state, Msg::InputChanged("https://x/a.m3u8".to_string()));
    let (state, effects) = update(state, Msg::AddSubmitted);

    assert_eq!(state.urls(), ["https://x/a.m3u8"]);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::PersistUrls(_))));

    // Clearing always removes the snapshot.
    let (_state, effects) = update(state, Msg::ClearAllClicked);
    assert!(effects.contains(&Effect::ClearPersisted));
}
