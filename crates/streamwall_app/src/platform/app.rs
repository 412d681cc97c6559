use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use streamwall_core::{update, AppState, AppViewModel, Msg};
use streamwall_engine::{EngineHandle, FileStore, UrlSnapshot};
use wall_logging::{wall_debug, wall_info, wall_warn, LogDestination};

use super::effects::{EffectRunner, MsgSink};
use super::ui;
use super::ui::commands::Command;
use crate::config::{AppConfig, CONFIG_FILENAME};

/// Everything the main loop reacts to, from the input thread, the engine and
/// notification timers.
#[derive(Debug)]
pub enum AppEvent {
    Line(String),
    InputClosed,
    Msg(Msg),
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = AppConfig::load(&config_path)?;

    if !wall_logging::initialize(
        LogDestination::File(config.log_file.clone()),
        LevelFilter::Info,
    ) {
        eprintln!("Logging disabled: cannot open {}", config.log_file.display());
    }
    wall_info!("Starting stream wall with {}", config_path.display());

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let engine = EngineHandle::new(
        config.engine_settings(),
        Arc::new(MsgSink::new(event_tx.clone())),
    )
    .context("starting playback engine")?;
    let snapshot = UrlSnapshot::new(
        Box::new(FileStore::new(&config.data_dir)),
        config.storage_key.clone(),
    );
    let runner = EffectRunner::new(engine, snapshot, config.export_dir.clone(), event_tx.clone());

    let mut state = AppState::with_settings(config.wall_settings());
    let restored = runner.load_snapshot();
    if !restored.is_empty() {
        dispatch(&mut state, &runner, Msg::RestoreUrls(restored));
    }

    spawn_input_reader(event_tx).context("starting input reader")?;

    let mut stdout = io::stdout();
    state.consume_dirty();
    draw(&mut stdout, &state.view(), config.screen_width, None)?;

    let mut running = true;
    while running {
        let Ok(first) = event_rx.recv() else {
            break;
        };

        let mut notice = None;
        let mut prompted = false;
        // Drain whatever queued up so a burst of engine events renders once.
        for event in std::iter::once(first).chain(event_rx.try_iter()) {
            match event {
                AppEvent::Line(line) => {
                    prompted = true;
                    match handle_line(&mut state, &runner, &line) {
                        LineOutcome::Continue => {}
                        LineOutcome::Notice(text) => notice = Some(text),
                        LineOutcome::Quit => {
                            running = false;
                            break;
                        }
                    }
                }
                AppEvent::InputClosed => {
                    wall_debug!("Input closed");
                    running = false;
                    break;
                }
                AppEvent::Msg(msg) => dispatch(&mut state, &runner, msg),
            }
        }

        if !running {
            break;
        }
        if state.consume_dirty() || prompted {
            draw(&mut stdout, &state.view(), config.screen_width, notice.as_deref())?;
        }
    }

    wall_info!("Stream wall closed with {} streams", state.urls().len());
    Ok(())
}

enum LineOutcome {
    Continue,
    Notice(String),
    Quit,
}

fn handle_line(state: &mut AppState, runner: &EffectRunner, line: &str) -> LineOutcome {
    let command = match ui::commands::parse(line) {
        Ok(command) => command,
        Err(err) => return LineOutcome::Notice(err.to_string()),
    };

    match command {
        Command::Quit => LineOutcome::Quit,
        Command::Help => LineOutcome::Notice(ui::constants::HELP_TEXT.to_string()),
        command => match command.to_msgs(&state.view()) {
            Ok(msgs) => {
                for msg in msgs {
                    dispatch(state, runner, msg);
                }
                LineOutcome::Continue
            }
            Err(err) => LineOutcome::Notice(err.to_string()),
        },
    }
}

fn dispatch(state: &mut AppState, runner: &EffectRunner, msg: Msg) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.run(effects);
}

fn draw(
    out: &mut impl Write,
    view: &AppViewModel,
    width: usize,
    notice: Option<&str>,
) -> anyhow::Result<()> {
    out.write_all(ui::render::render(view, width, notice).as_bytes())?;
    out.flush()?;
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("streamwall-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(AppEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        wall_warn!("Reading input failed: {}", err);
                        break;
                    }
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}
