//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.
//! `draw` returns the screen regions the mouse can act on.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::PlayerView;
use crate::config::{ControlsSettings, UiSettings};
use crate::media::MediaHandle;
use crate::player::{Phase, format_duration, volume_to_percent};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play selected song".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L and -/+ are filled dynamically from config.
    map.insert("a".to_string(), "add files".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = ["j/k", "h/l", "H/L", "-/+", "enter", "space/p", "a", "q"];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}%", controls.seek_step_percent)),
            "-/+" => Some(format!("[-/+] volume -/+{}%", controls.volume_step_percent)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions from the last draw that respond to mouse clicks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HitAreas {
    /// Inner area of the seek gauge.
    pub seek: Option<Rect>,
    /// Inner area of the volume gauge.
    pub volume: Option<Rect>,
    /// Inner area of the playlist; its first row shows `list_offset`.
    pub list: Option<Rect>,
    pub list_offset: usize,
}

impl HitAreas {
    /// Playlist index under the cursor.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list?;
        if !area.contains(Position { x: column, y: row }) {
            return None;
        }
        Some(self.list_offset + usize::from(row - area.y))
    }

    /// Seek slider position under the cursor, 0..=100.
    pub fn seek_percent_at(&self, column: u16, row: u16) -> Option<u8> {
        fraction_at(self.seek?, column, row)
    }

    /// Volume slider position under the cursor, 0..=100.
    pub fn volume_percent_at(&self, column: u16, row: u16) -> Option<u8> {
        fraction_at(self.volume?, column, row)
    }
}

/// Horizontal position inside `area` as a percentage; the last column is 100.
fn fraction_at(area: Rect, column: u16, row: u16) -> Option<u8> {
    if !area.contains(Position { x: column, y: row }) {
        return None;
    }
    if area.width <= 1 {
        return Some(0);
    }
    let offset = u32::from(column - area.x);
    let percent = offset * 100 / u32::from(area.width - 1);
    Some(percent.min(100) as u8)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Stopped",
        Phase::Loaded => "Ready",
        Phase::Pending => "Loading",
        Phase::Playing => "Playing",
        Phase::Paused => "Paused",
    }
}

/// Visible window `[start, end)` of a list of `total` rows that keeps
/// `selected` roughly centered.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame` and report clickable regions.
pub fn draw<M: MediaHandle>(
    frame: &mut Frame,
    view: &PlayerView<M>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> HitAreas {
    let mut hits = HitAreas::default();

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" allegro ")
                .title_alignment(Alignment::Center),
        );
    let footer = Paragraph::new(controls_text(controls_settings))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });

    if !view.has_tracks() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(4),
            ])
            .split(frame.area());
        frame.render_widget(header, chunks[0]);

        let mut hint = String::from("No tracks yet. Press [a] and enter a file or folder to add music.");
        if let Some(status) = &view.status {
            hint.push_str("\n\n");
            hint.push_str(status);
        }
        let hint = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .block(padded(" upload "))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, chunks[1]);
        frame.render_widget(footer, chunks[2]);

        draw_prompt(frame, view, chunks[1]);
        return hits;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(frame.area());
    frame.render_widget(header, chunks[0]);

    let state = view.state();

    // Now playing
    let song = view
        .current_track()
        .map(|t| t.name.as_str())
        .unwrap_or("-");
    let mark = if state.is_playing { ">" } else { "||" };
    let now_playing = Paragraph::new(format!("{mark} {} • {song}", phase_label(view.phase())))
        .block(padded(" now playing "));
    frame.render_widget(now_playing, chunks[1]);

    // Seek gauge
    let elapsed = state.progress_percent / 100.0 * state.duration_seconds;
    let seek_block = Block::default().borders(Borders::ALL).title(" position ");
    hits.seek = Some(seek_block.inner(chunks[2]));
    let seek = Gauge::default()
        .block(seek_block)
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((state.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{} / {}",
            format_duration(elapsed),
            format_duration(state.duration_seconds)
        ));
    frame.render_widget(seek, chunks[2]);

    // Volume gauge
    let volume_percent = volume_to_percent(state.volume);
    let volume_block = Block::default().borders(Borders::ALL).title(" volume ");
    hits.volume = Some(volume_block.inner(chunks[3]));
    let volume = Gauge::default()
        .block(volume_block)
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(volume_percent))
        .label(format!("{volume_percent}%"));
    frame.render_widget(volume, chunks[3]);

    // Playlist
    {
        let tracks = view.tracks();
        let list_block = Block::default().borders(Borders::ALL).title(" playlist ");
        let inner = list_block.inner(chunks[4]);
        let (start, end) = visible_window(tracks.len(), inner.height as usize, view.selected);
        hits.list = Some(inner);
        hits.list_offset = start;

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let index = start + i;
                let item = ListItem::new(format!("{}. {}", index + 1, track.name));
                if state.current_track_index == Some(index) {
                    item.style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items)
            .block(list_block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if view.selected >= start && view.selected < end {
            list_state.select(Some(view.selected - start));
        }
        frame.render_stateful_widget(list, chunks[4], &mut list_state);
    }

    // Status line
    let status = Paragraph::new(view.status.clone().unwrap_or_default()).italic();
    frame.render_widget(status, chunks[5]);

    frame.render_widget(footer, chunks[6]);

    draw_prompt(frame, view, chunks[4]);
    hits
}

/// Overlay the "add path" prompt inside `area` while it is open.
fn draw_prompt<M: MediaHandle>(frame: &mut Frame, view: &PlayerView<M>, area: Rect) {
    let Some(input) = &view.prompt else {
        return;
    };
    let popup = centered_rect_sized(64, 3, area);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(format!("{input}_"))
        .block(padded(" add file or folder (enter adds, esc cancels) "));
    frame.render_widget(prompt, popup);
}
