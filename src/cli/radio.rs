use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{Mutex, mpsc},
};

use crate::{
    config, error, info,
    radio::{
        Gateway, PlayerEvent, PlayerState, RelayGateway, SongHandler, SpotifyGateway,
        spawn_dispatcher,
    },
    spotify::{self, SpotifyApi},
    success,
    types::{RadioTableRow, Session},
    utils, warning,
};

#[derive(Debug, Clone, Default)]
pub struct RadioOptions {
    pub group_size: Option<usize>,
    pub token: Option<String>,
    pub relay: Option<String>,
    pub tick_millis: Option<u64>,
}

/// A line typed by the listener during a session.
///
/// Radios are numbered from 1 on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCommand {
    Select(usize),
    Pause,
    Status,
    Shuffle(Option<usize>),
    Help,
    Quit,
}

impl RadioCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();

        match (cmd.to_lowercase().as_str(), arg) {
            ("select" | "s" | "tune", Some(n)) => parse_number(n).map(RadioCommand::Select),
            ("select" | "s" | "tune", None) => Err("select needs a radio number".to_string()),
            ("pause" | "p", _) => Ok(RadioCommand::Pause),
            ("status" | "ls", _) => Ok(RadioCommand::Status),
            ("shuffle", Some(n)) => parse_number(n).map(|n| RadioCommand::Shuffle(Some(n))),
            ("shuffle", None) => Ok(RadioCommand::Shuffle(None)),
            ("help" | "h" | "?", _) => Ok(RadioCommand::Help),
            ("quit" | "q" | "exit", _) => Ok(RadioCommand::Quit),
            (other, _) => match parse_number(other) {
                Ok(n) => Ok(RadioCommand::Select(n)),
                Err(_) => Err(format!("unknown command '{}'", other)),
            },
        }
    }
}

fn parse_number(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("radios are numbered from 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a number", value)),
    }
}

/// Runs an interactive radio session.
///
/// Logs in (unless a token is given), loads the liked songs, starts every
/// radio and then serves listener commands until `quit` or end of input.
pub async fn radio(options: RadioOptions) {
    let token = match options.token {
        Some(token) => token,
        None => {
            let shared_state = Arc::new(Mutex::new(None));
            match spotify::auth::login(shared_state).await {
                Ok(token) => token.access_token,
                Err(e) => error!("{}", e),
            }
        }
    };

    let api = SpotifyApi::from_config();

    match api.profile(&token).await {
        Ok(profile) => success!("Logged in as {}", profile.greeting_name()),
        Err(e) => warning!("Failed to fetch user profile: {}", e),
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching liked songs...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    let tracks = match api.liked_songs(&token).await {
        Ok(tracks) => tracks,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch liked songs: {}", e);
        }
    };
    pb.finish_and_clear();

    if tracks.is_empty() {
        warning!("No liked songs found, nothing to tune in to.");
        return;
    }
    success!("Loaded {} liked songs", tracks.len());

    let gateway = match options.relay.or_else(config::radio_relay_url) {
        Some(url) => {
            info!("Sending play commands through relay {}", url);
            Gateway::Relay(RelayGateway::new(url))
        }
        None => Gateway::Direct(SpotifyGateway::new(api.clone())),
    };
    let (requests_tx, requests_rx) = mpsc::unbounded_channel();
    let dispatcher = spawn_dispatcher(Arc::new(gateway), requests_rx);

    let tick_period = options
        .tick_millis
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or_else(config::radio_tick_period);
    let group_size = options
        .group_size
        .unwrap_or_else(config::radio_group_size);

    let mut handler = SongHandler::new(Session::new(token), tracks, requests_tx, tick_period);
    if let Err(e) = create_and_start(&mut handler, group_size) {
        error!("{}", e);
    }
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(tick) = handler.next_tick() => {
                let event = handler.dispatch(tick);
                report(&handler, tick.player, event);
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warning!("Failed to read input: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match RadioCommand::parse(&line) {
                    Ok(RadioCommand::Quit) => break,
                    Ok(command) => execute(&mut handler, command, group_size),
                    Err(e) => warning!("{}. Type 'help' for commands.", e),
                }
            }
        }
    }

    handler.stop();
    dispatcher.abort();
    success!("Bye!");
}

fn create_and_start(
    handler: &mut SongHandler,
    group_size: usize,
) -> Result<(), crate::error::RadioError> {
    let radios = handler.create_song_players(group_size)?;
    handler.start_all_song_players();
    success!(
        "Created {} radios with up to {} songs each",
        radios,
        group_size
    );
    Ok(())
}

fn execute(handler: &mut SongHandler, command: RadioCommand, group_size: usize) {
    match command {
        RadioCommand::Select(number) => match handler.select_player(number - 1) {
            Ok(()) => {
                if let Some(player) = handler.player(number - 1) {
                    match player.current_track() {
                        Some(track) => info!(
                            "Tuned in to radio {}: {} - {} at {}",
                            number,
                            track.artist,
                            track.name,
                            utils::format_secs(player.elapsed_secs())
                        ),
                        None => warning!("Radio {} has finished its songs", number),
                    }
                }
            }
            Err(e) => warning!("{}", e),
        },
        RadioCommand::Pause => {
            handler.pause_playback();
            info!("Radio paused, all stations keep running in the background");
        }
        RadioCommand::Status => print_status(handler),
        RadioCommand::Shuffle(size) => {
            if let Err(e) = create_and_start(handler, size.unwrap_or(group_size)) {
                warning!("{}", e);
            }
        }
        RadioCommand::Help => print_help(),
        RadioCommand::Quit => {}
    }
}

fn report(handler: &SongHandler, player_index: usize, event: Option<PlayerEvent>) {
    if handler.selected() != Some(player_index) {
        return;
    }

    match event {
        Some(PlayerEvent::Advanced { .. }) => {
            if let Some(track) = handler
                .player(player_index)
                .and_then(|p| p.current_track())
            {
                info!("Up next on radio {}: {} - {}", player_index + 1, track.artist, track.name);
            }
        }
        Some(PlayerEvent::Finished) => {
            warning!("Radio {} has played all of its songs", player_index + 1)
        }
        _ => {}
    }
}

fn print_status(handler: &SongHandler) {
    let selected = handler.selected();
    let rows: Vec<RadioTableRow> = handler
        .players()
        .iter()
        .map(|player| {
            let (track, artist, progress) = match player.current_track() {
                Some(track) => (
                    format!(
                        "{} ({}/{})",
                        track.name,
                        player.position() + 1,
                        player.tracks().len()
                    ),
                    track.artist.clone(),
                    format!(
                        "{} / {}",
                        utils::format_secs(player.elapsed_secs()),
                        utils::format_secs(track.duration_secs)
                    ),
                ),
                None => ("-".to_string(), "-".to_string(), "-".to_string()),
            };

            RadioTableRow {
                selected: if selected == Some(player.index()) {
                    "▶".to_string()
                } else {
                    String::new()
                },
                radio: player.index() + 1,
                track,
                artist,
                progress,
                state: match player.state() {
                    PlayerState::Idle => "idle",
                    PlayerState::Running => "playing",
                    PlayerState::Terminal => "finished",
                }
                .to_string(),
            }
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn print_help() {
    info!("Commands:");
    println!("  select <n>    tune in to radio n (or just type n)");
    println!("  pause         stop sending songs to your device");
    println!("  status        show what every radio is playing");
    println!("  shuffle [n]   reshuffle into new radios of n songs");
    println!("  help          show this help");
    println!("  quit          leave");
}
