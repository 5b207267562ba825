use std::io;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::PlayerController;
use crate::audio::RodioBackend;
use crate::library;
use crate::mpris::ControlCmd;
use crate::ui::TerminalPage;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;


/// The controller as the terminal app wires it.
pub type Controller = PlayerController<RodioBackend, TerminalPage>;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings.log);

    let dir = startup::audio_dir(&settings.library);
    let library = library::load(&dir, &settings.library);
    if library.tracks.is_empty() {
        warn!(dir = %dir.display(), "no tracks found");
    }
    let metadata = startup::spawn_enrichment(&library, &settings.library);

    let backend = RodioBackend::open(Duration::from_millis(settings.player.time_update_ms))
        .inspect_err(|e| error!(error = %e, "audio output unavailable"))?;

    let page = TerminalPage::new(
        library.tracks.len(),
        &settings.ui,
        settings.marquee.title_share_with_album,
        terminal::size()?,
    );
    let mut controller = PlayerController::new(library.tracks, backend, page, &settings);
    controller.init();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(metadata);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut controller,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("shutting down");
    run_result
}
