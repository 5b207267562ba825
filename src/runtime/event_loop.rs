use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::TransportState;
use crate::config;
use crate::library::MetadataEvent;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::ui::{self, Element, JumpPrompt, Key, UiEvent};

use super::Controller;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    pub prompt: JumpPrompt,
    /// Background tag reader; dropped once it hangs up.
    metadata: Option<Receiver<MetadataEvent>>,
    last_mpris: Option<MprisSnapshot>,
    started: Instant,
}

impl EventLoopState {
    pub fn new(metadata: Option<Receiver<MetadataEvent>>) -> Self {
        Self {
            prompt: JumpPrompt::default(),
            metadata,
            last_mpris: None,
            started: Instant::now(),
        }
    }
}

/// Main terminal event loop: feeds media, tag and input events to the
/// controller, draws the page and keeps MPRIS in sync. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.ui.tick_ms);

    loop {
        drain_metadata(controller, state);
        controller.poll_media();
        controller.tick(Instant::now());

        // Playback changes also come from auto-advance, media keys and late tags.
        let snapshot = MprisSnapshot::of(&*controller);
        if state.last_mpris.as_ref() != Some(&snapshot) {
            update_mpris(mpris, &*controller);
            state.last_mpris = Some(snapshot);
        }

        let elapsed = state.started.elapsed();
        terminal.draw(|f| ui::draw(f, controller.ui(), &state.prompt, elapsed))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                return Ok(());
            }
        }

        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, controller, state) {
                        break;
                    }
                }
                Event::Mouse(mouse) if !state.prompt.is_open() => {
                    for ev in controller.ui_mut().translate_mouse(mouse) {
                        controller.handle_event(ev);
                    }
                }
                Event::Resize(width, height) => {
                    controller.ui_mut().resize(width, height);
                    controller.handle_event(UiEvent::Resize);
                }
                _ => {}
            }
        }
    }

    info!("quit requested");
    Ok(())
}

fn drain_metadata(controller: &mut Controller, state: &mut EventLoopState) {
    let Some(rx) = state.metadata.as_ref() else {
        return;
    };
    loop {
        match rx.try_recv() {
            Ok(MetadataEvent::Loaded { index, metadata }) => {
                controller.apply_metadata(index, metadata)
            }
            Ok(MetadataEvent::Failed { index, error }) => {
                controller.metadata_failed(index, &error)
            }
            Err(mpsc::TryRecvError::Empty) => break,
            Err(mpsc::TryRecvError::Disconnected) => {
                debug!("tag reader finished");
                state.metadata = None;
                break;
            }
        }
    }
}

/// Returns `true` when the command asks the app to quit.
fn handle_control_cmd(cmd: ControlCmd, controller: &mut Controller) -> bool {
    debug!(?cmd, "MPRIS command");
    let playing = controller.state() == TransportState::Playing;
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play if !playing => controller.toggle_play(),
        ControlCmd::Pause | ControlCmd::Stop if playing => controller.toggle_play(),
        ControlCmd::Play | ControlCmd::Pause | ControlCmd::Stop => {}
        ControlCmd::PlayPause => controller.toggle_play(),
        ControlCmd::Next => controller.play_next(),
        ControlCmd::Prev => controller.play_previous(),
    }
    false
}

/// Returns `true` when the key asks the app to quit.
fn handle_key_event(key: KeyEvent, controller: &mut Controller, state: &mut EventLoopState) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.prompt.is_open() {
        handle_prompt_key(key, controller, &mut state.prompt);
        return false;
    }

    let page_rows = controller.ui().size().1 as i32 / 2;
    let scroll = |controller: &mut Controller, delta: i32| {
        for ev in controller.ui_mut().scroll_events(delta) {
            controller.handle_event(ev);
        }
    };

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => state.prompt.open(),
        KeyCode::Char('t') => controller.handle_event(UiEvent::Click(Element::TrackListToggle)),
        KeyCode::Char('j') | KeyCode::Down => scroll(controller, 1),
        KeyCode::Char('k') | KeyCode::Up => scroll(controller, -1),
        KeyCode::PageDown => scroll(controller, page_rows.max(1)),
        KeyCode::PageUp => scroll(controller, -page_rows.max(1)),
        KeyCode::Home | KeyCode::Char('g') => scroll(controller, -(u16::MAX as i32)),
        KeyCode::End | KeyCode::Char('G') => scroll(controller, u16::MAX as i32),
        code => {
            if let Some(key) = transport_key(code) {
                controller.handle_event(UiEvent::Key {
                    key,
                    text_focus: false,
                });
            }
        }
    }
    false
}

fn transport_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Key::Space),
        KeyCode::Left | KeyCode::Char('h') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Key::Right),
        _ => None,
    }
}

fn handle_prompt_key(key: KeyEvent, controller: &mut Controller, prompt: &mut JumpPrompt) {
    let titles = controller.ui().track_titles();
    let titles = || titles.iter().map(String::as_str);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => prompt.close(),
        KeyCode::Backspace => prompt.pop(),
        KeyCode::Up => prompt.step(-1, prompt.matches(titles()).len()),
        KeyCode::Down => prompt.step(1, prompt.matches(titles()).len()),
        KeyCode::Char('k') if ctrl => prompt.step(-1, prompt.matches(titles()).len()),
        KeyCode::Char('j') if ctrl => prompt.step(1, prompt.matches(titles()).len()),
        KeyCode::Enter => {
            let selection = prompt.selection(titles());
            prompt.close();
            if let Some(index) = selection {
                controller.handle_event(UiEvent::Click(Element::TrackRow(index)));
            }
        }
        // The prompt holds text focus: transport keys land in the query.
        KeyCode::Left | KeyCode::Right => {
            if let Some(key) = transport_key(key.code) {
                controller.handle_event(UiEvent::Key {
                    key,
                    text_focus: true,
                });
            }
        }
        KeyCode::Char(c) if !c.is_control() && !ctrl => prompt.push(c),
        _ => {}
    }
}
