use std::{collections::HashMap, time::Duration};

use likedradio::error::RadioError;
use likedradio::radio::{PlayerEvent, SongHandler, Tick};
use likedradio::types::{PlaybackRequest, Session, Track};
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::mpsc::{self, UnboundedReceiver};

const TOKEN: &str = "test-token";

fn track(name: &str, duration_secs: u64) -> Track {
    Track {
        uri: format!("spotify:track:{}", name),
        name: name.to_string(),
        artist: "Artist".to_string(),
        duration_secs,
    }
}

fn tracks(count: usize, duration_secs: u64) -> Vec<Track> {
    (0..count)
        .map(|i| track(&format!("t{}", i), duration_secs))
        .collect()
}

fn handler_with(tracks: Vec<Track>) -> (SongHandler, UnboundedReceiver<PlaybackRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler = SongHandler::new(Session::new(TOKEN), tracks, tx, Duration::from_secs(1));
    (handler, rx)
}

fn drain(rx: &mut UnboundedReceiver<PlaybackRequest>) -> Vec<PlaybackRequest> {
    let mut requests = Vec::new();
    while let Ok(request) = rx.try_recv() {
        requests.push(request);
    }
    requests
}

#[test]
fn test_create_song_players_partitions() {
    for n in [0usize, 1, 2, 9, 10, 11, 25] {
        for g in [1usize, 2, 3, 10] {
            let (mut handler, _rx) = handler_with(tracks(n, 5));
            let created = handler.create_song_players(g).unwrap();

            assert_eq!(created, n.div_ceil(g), "n={} g={}", n, g);
            assert_eq!(handler.players().len(), created);

            let total: usize = handler.players().iter().map(|p| p.tracks().len()).sum();
            assert_eq!(total, n);

            // indices are dense and stable
            for (i, player) in handler.players().iter().enumerate() {
                assert_eq!(player.index(), i);
                assert_eq!(player.position(), 0);
                assert_eq!(player.elapsed_secs(), 0);
                assert!(player.tracks().len() <= g);
            }
        }
    }
}

#[test]
fn test_create_song_players_rejects_zero_group_size() {
    let (mut handler, _rx) = handler_with(tracks(4, 5));

    match handler.create_song_players(0) {
        Err(RadioError::InvalidGroupSize(0)) => {}
        other => panic!("expected InvalidGroupSize, got {:?}", other),
    }
}

#[test]
fn test_shuffle_is_permutation() {
    let library = tracks(40, 5);
    let (mut handler, _rx) = handler_with(library.clone());
    handler.create_song_players(7).unwrap();

    let mut shuffled: Vec<String> = handler
        .players()
        .iter()
        .flat_map(|p| p.tracks().iter().map(|t| t.uri.clone()))
        .collect();
    let mut original: Vec<String> = library.iter().map(|t| t.uri.clone()).collect();

    shuffled.sort();
    original.sort();
    assert_eq!(shuffled, original);

    // the library itself is left untouched
    assert_eq!(handler.tracks(), library.as_slice());
}

#[test]
fn test_shuffle_is_uniform() {
    let n = 5;
    let rounds = 20_000;
    let (mut handler, _rx) = handler_with(tracks(n, 5));
    let mut rng = StdRng::seed_from_u64(7);

    // counts[track][position]
    let mut counts: HashMap<String, Vec<usize>> = HashMap::new();
    for _ in 0..rounds {
        handler.create_song_players_with_rng(n, &mut rng).unwrap();
        for (position, t) in handler.players()[0].tracks().iter().enumerate() {
            counts.entry(t.uri.clone()).or_insert_with(|| vec![0; n])[position] += 1;
        }
    }

    let expected = rounds / n;
    for (uri, positions) in counts {
        for (position, count) in positions.into_iter().enumerate() {
            let deviation = count.abs_diff(expected);
            assert!(
                deviation < expected / 10,
                "{} at position {} seen {} times, expected about {}",
                uri,
                position,
                count,
                expected
            );
        }
    }
}

#[test]
fn test_select_player_out_of_range() {
    let (mut handler, mut rx) = handler_with(Vec::new());
    handler.create_song_players(3).unwrap();

    match handler.select_player(0) {
        Err(RadioError::SelectionOutOfRange { index: 0, players: 0 }) => {}
        other => panic!("expected SelectionOutOfRange, got {:?}", other),
    }
    assert_eq!(handler.selected(), None);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_select_player_issues_one_request() {
    let (mut handler, mut rx) = handler_with(tracks(9, 10));
    handler.create_song_players(3).unwrap();
    for player in 0..3 {
        handler.on_tick(player);
    }
    // ticks before start do nothing
    assert!(handler.players().iter().all(|p| p.elapsed_secs() == 0));

    assert!(handler.select_player(2).is_ok());
    assert_eq!(handler.selected(), Some(2));

    let expected_uri = handler.players()[2].current_track().unwrap().uri.clone();
    assert_eq!(
        drain(&mut rx),
        vec![PlaybackRequest {
            token: TOKEN.to_string(),
            track_uri: expected_uri,
            offset_secs: 0,
        }]
    );

    assert!(matches!(
        handler.select_player(3),
        Err(RadioError::SelectionOutOfRange { index: 3, players: 3 })
    ));
    // a failed selection keeps the previous one
    assert_eq!(handler.selected(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_switching_selection() {
    let (mut handler, mut rx) = handler_with(tracks(4, 2));
    handler.create_song_players(2).unwrap();
    handler.start_all_song_players();

    handler.on_tick(0);
    handler.on_tick(1);

    handler.select_player(0).unwrap();
    handler.select_player(1).unwrap();

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 2);
    let current_of_1 = handler.players()[1].current_track().unwrap().uri.clone();
    assert_eq!(requests[1].track_uri, current_of_1);
    assert_eq!(requests[1].offset_secs, 1);

    // player 0 advances naturally: nothing is sent for it any more
    assert_eq!(handler.on_tick(0), Some(PlayerEvent::Advanced { position: 1 }));
    assert!(drain(&mut rx).is_empty());

    // the selected player advancing starts its next track at 0
    assert_eq!(handler.on_tick(1), Some(PlayerEvent::Advanced { position: 1 }));
    let next_of_1 = handler.players()[1].current_track().unwrap().uri.clone();
    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].track_uri, next_of_1);
    assert_eq!(requests[0].offset_secs, 0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_playback_keeps_simulating() {
    let (mut handler, mut rx) = handler_with(tracks(2, 3));
    handler.create_song_players(2).unwrap();
    handler.start_all_song_players();

    handler.on_tick(0);
    handler.select_player(0).unwrap();
    assert_eq!(drain(&mut rx).len(), 1);

    handler.pause_playback();
    assert_eq!(handler.selected(), None);
    assert_eq!(handler.players()[0].elapsed_secs(), 1);

    // the radio keeps running, silently
    assert_eq!(handler.on_tick(0), Some(PlayerEvent::TimeUpdate { elapsed_secs: 2 }));
    assert_eq!(handler.on_tick(0), Some(PlayerEvent::Advanced { position: 1 }));
    assert!(drain(&mut rx).is_empty());

    // tuning in again resumes remote playback at the simulated offset
    handler.on_tick(0);
    handler.select_player(0).unwrap();
    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].offset_secs, 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_all_schedules_every_player() {
    let (mut handler, _rx) = handler_with(tracks(5, 2));
    handler.create_song_players(2).unwrap();

    assert_eq!(handler.active_timers(), 0);
    handler.start_all_song_players();
    assert_eq!(handler.active_timers(), 3);
    assert!(handler.players().iter().all(|p| p.is_playing()));

    // the shortest group (one track of 2s) finishes and loses its timer
    let short = handler
        .players()
        .iter()
        .position(|p| p.tracks().len() == 1)
        .unwrap();
    handler.on_tick(short);
    assert_eq!(handler.on_tick(short), Some(PlayerEvent::Finished));
    assert_eq!(handler.active_timers(), 2);

    handler.stop();
    assert_eq!(handler.active_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_recreation_drops_old_generation() {
    let (mut handler, mut rx) = handler_with(tracks(6, 3));
    handler.create_song_players(3).unwrap();
    handler.start_all_song_players();
    handler.select_player(1).unwrap();
    drain(&mut rx);

    let old_generation = handler.generation();
    let stale = Tick {
        generation: old_generation,
        player: 0,
    };

    handler.create_song_players(2).unwrap();
    assert_eq!(handler.players().len(), 3);
    assert!(handler.generation() > old_generation);
    assert_eq!(handler.active_timers(), 0);
    assert_eq!(handler.selected(), None);

    // a tick scheduled for the discarded radios never reaches the new ones
    assert_eq!(handler.dispatch(stale), None);
    assert_eq!(handler.players()[0].elapsed_secs(), 0);

    handler.start_all_song_players();
    let current = Tick {
        generation: handler.generation(),
        player: 0,
    };
    assert_eq!(
        handler.dispatch(current),
        Some(PlayerEvent::TimeUpdate { elapsed_secs: 1 })
    );
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_request_playback_uses_session_token() {
    let (handler, mut rx) = handler_with(tracks(1, 1));

    handler.request_playback("spotify:track:x", 42);

    assert_eq!(handler.session(), &Session::new(TOKEN));
    assert_eq!(
        drain(&mut rx),
        vec![PlaybackRequest {
            token: TOKEN.to_string(),
            track_uri: "spotify:track:x".to_string(),
            offset_secs: 42,
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_radio_runs_to_the_end_on_real_ticks() {
    // A(3s), B(2s), C(4s) in one radio: 9 simulated seconds
    let (mut handler, mut rx) = handler_with(vec![track("A", 3), track("B", 2), track("C", 4)]);
    handler.create_song_players(3).unwrap();
    handler.start_all_song_players();
    handler.select_player(0).unwrap();

    let started = tokio::time::Instant::now();
    let mut ticks = 0;
    loop {
        let tick = tokio::time::timeout(Duration::from_secs(30), handler.next_tick())
            .await
            .expect("tick source stalled")
            .expect("tick channel closed");
        ticks += 1;
        if handler.dispatch(tick) == Some(PlayerEvent::Finished) {
            break;
        }
    }

    assert_eq!(ticks, 9);
    assert!(started.elapsed() >= Duration::from_secs(9));
    assert!(handler.players()[0].is_terminal());
    assert_eq!(handler.active_timers(), 0);

    // one request on selection, one per track change
    assert_eq!(drain(&mut rx).len(), 3);

    // no timer is left to deliver further ticks
    assert!(
        tokio::time::timeout(Duration::from_secs(5), handler.next_tick())
            .await
            .is_err()
    );
}
