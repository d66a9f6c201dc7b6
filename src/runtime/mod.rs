use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::config;
use crate::media::RodioMedia;
use crate::object_url::ObjectUrls;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--print-config") {
        print!("{}", toml::to_string_pretty(&config::Settings::default())?);
        return Ok(());
    }

    let settings = settings::load_settings();
    logging::init(&settings);
    info!("starting allegro");

    let urls = ObjectUrls::new();
    let (media, events) = RodioMedia::spawn(urls.clone(), settings.audio.clone());
    let mut view = startup::build_view(&settings, media, urls);

    let paths: Vec<PathBuf> = args.iter().map(PathBuf::from).collect();
    startup::upload_paths(&mut view, &paths, &settings.library);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut view, &events);

    view.media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    view.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}
