use std::env;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Intent, PlayerView};
use crate::config;
use crate::media::{MediaEvent, RodioMedia};
use crate::runtime::startup::{expand_home, upload_paths};
use crate::ui::{self, HitAreas};

/// Main terminal event loop: drains media events, draws, and handles input.
/// Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    view: &mut PlayerView<RodioMedia>,
    events: &Receiver<MediaEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = events.try_recv() {
            view.handle_media_event(ev);
        }

        let mut hits = HitAreas::default();
        terminal.draw(|f| hits = ui::draw(f, view, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, view) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, &hits, view),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    view: &mut PlayerView<RodioMedia>,
) -> bool {
    if view.prompt.is_some() {
        match key.code {
            KeyCode::Esc => view.cancel_prompt(),
            KeyCode::Backspace => view.pop_prompt_char(),
            KeyCode::Enter => {
                if let Some(input) = view.take_prompt() {
                    let home = env::var_os("HOME").map(PathBuf::from);
                    let path = expand_home(&input, home.as_deref());
                    upload_paths(view, &[path], &settings.library);
                }
            }
            KeyCode::Char(c) if !c.is_control() => view.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    let seek_step = i16::from(settings.controls.seek_step_percent);
    let volume_step = i16::from(settings.controls.volume_step_percent);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('a') => view.open_prompt(),
        KeyCode::Char('p') | KeyCode::Char(' ') => view.apply(Intent::TogglePlayPause),
        KeyCode::Char('l') => view.apply(Intent::Next),
        KeyCode::Char('h') => view.apply(Intent::Previous),
        KeyCode::Char('L') => view.apply(Intent::SeekBy(seek_step)),
        KeyCode::Char('H') => view.apply(Intent::SeekBy(-seek_step)),
        KeyCode::Char('+') | KeyCode::Char('=') => view.apply(Intent::VolumeBy(volume_step)),
        KeyCode::Char('-') => view.apply(Intent::VolumeBy(-volume_step)),
        KeyCode::Char('j') | KeyCode::Down => view.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => view.cursor_up(),
        KeyCode::Enter => {
            if view.has_tracks() {
                view.apply(Intent::Select(view.selected));
            }
        }
        _ => {}
    }

    false
}

fn handle_mouse_event(mouse: MouseEvent, hits: &HitAreas, view: &mut PlayerView<RodioMedia>) {
    if view.prompt.is_some() {
        return;
    }
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = hits.row_at(column, row) {
                if index < view.tracks().len() {
                    view.apply(Intent::Select(index));
                }
            } else if let Some(percent) = hits.seek_percent_at(column, row) {
                view.apply(Intent::Seek(percent));
            } else if let Some(percent) = hits.volume_percent_at(column, row) {
                view.apply(Intent::Volume(percent));
            }
        }
        MouseEventKind::ScrollDown => view.cursor_down(),
        MouseEventKind::ScrollUp => view.cursor_up(),
        _ => {}
    }
}
