use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs},
};

use cadence_playback::{PlayIcon, Tab, TransportView};

use super::app::App;

const HELP: &str =
    "space play/pause  ←/→ seek  +/- volume  ↑/↓ select  enter play  tab switch  q quit";

pub fn draw(f: &mut ratatui::Frame, app: &mut App) {
    let transport = app.controls.transport();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let artist = if transport.artist.is_empty() {
        "-".to_string()
    } else {
        transport.artist.clone()
    };
    let header = Paragraph::new(vec![
        Line::styled(
            transport.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(artist),
    ])
    .block(Block::default().borders(Borders::ALL).title("Now Playing"));
    f.render_widget(header, chunks[0]);

    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(app.tab.index())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, chunks[1]);

    match app.tab {
        Tab::Playlist => draw_playlist(f, app, chunks[2]),
        Tab::Lyrics => draw_placeholder(f, "Lyrics", "No lyrics available", chunks[2]),
        Tab::Bio => draw_placeholder(f, "Bio", "No artist bio available", chunks[2]),
    }

    app.seek_bar = draw_seek_bar(f, &transport, chunks[3]);
    draw_controls(f, &transport, chunks[4]);

    let status = if app.status.is_empty() {
        HELP.to_string()
    } else {
        app.status.clone()
    };
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        chunks[5],
    );
}

fn draw_playlist(f: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let playlist = app.controls.playlist();
    let title_width = playlist
        .tracks()
        .iter()
        .map(|track| track.title.chars().count())
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = if playlist.is_empty() {
        vec![ListItem::new("<empty>")]
    } else {
        playlist
            .tracks()
            .iter()
            .map(|track| {
                let marker = if track.current { "♪" } else { " " };
                let label = format!(
                    "{marker} {:<width$}  {:<20}  {}",
                    track.title,
                    track.artist,
                    track.duration,
                    width = title_width
                );
                let style = if track.current {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(label).style(style)
            })
            .collect()
    };

    app.list_state.select(playlist.cursor());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Playlist"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_placeholder(f: &mut ratatui::Frame, title: &str, body: &str, area: Rect) {
    let panel = Paragraph::new(body)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(panel, area);
}

/// Draw the seek gauge and return its inner area for pointer hit-testing
fn draw_seek_bar(f: &mut ratatui::Frame, transport: &TransportView, area: Rect) -> Rect {
    let title = if transport.dragging { "Seek (dragging)" } else { "Seek" };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let gauge_style = if transport.dragging {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(gauge_style)
        .ratio(transport.ratio())
        .label(format!("{} / {}", transport.elapsed, transport.total));
    f.render_widget(gauge, area);
    inner
}

fn draw_controls(f: &mut ratatui::Frame, transport: &TransportView, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(10)])
        .split(area);

    let button = match transport.play_icon {
        PlayIcon::Play => "▶  Play",
        PlayIcon::Pause => "⏸  Pause",
    };
    f.render_widget(
        Paragraph::new(button).block(Block::default().borders(Borders::ALL)),
        columns[0],
    );

    let volume = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Volume"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(transport.volume.min(100)) / 100.0)
        .label(format!("{}", transport.volume));
    f.render_widget(volume, columns[1]);
}

/// Map a pointer column on the seek bar to a position in `0..=max`
///
/// The first cell is 0 and the last cell is `max`; columns outside the bar
/// clamp to the nearest end.
pub fn position_for_column(bar: Rect, column: u16, max: f64) -> f64 {
    if bar.width == 0 {
        return 0.0;
    }
    let last = bar.width - 1;
    let offset = column.saturating_sub(bar.x).min(last);
    if last == 0 {
        return 0.0;
    }
    f64::from(offset) / f64::from(last) * max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock_engine::{demo_playlist, ClockEngine};
    use crate::config::EngineSettings;
    use cadence_playback::{ControlsConfig, PlayerControls};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    #[test]
    fn column_maps_across_bar() {
        let bar = Rect::new(4, 10, 11, 1);
        assert_eq!(position_for_column(bar, 4, 180.0), 0.0);
        assert_eq!(position_for_column(bar, 9, 180.0), 90.0);
        assert_eq!(position_for_column(bar, 14, 180.0), 180.0);
    }

    #[test]
    fn column_outside_bar_clamps() {
        let bar = Rect::new(4, 10, 11, 1);
        assert_eq!(position_for_column(bar, 0, 100.0), 0.0);
        assert_eq!(position_for_column(bar, 60, 100.0), 100.0);
        assert_eq!(position_for_column(Rect::default(), 3, 100.0), 0.0);
        assert_eq!(position_for_column(Rect::new(0, 0, 1, 1), 0, 100.0), 0.0);
    }

    #[tokio::test]
    async fn frame_shows_placeholder_and_records_seek_bar() {
        let engine = Arc::new(ClockEngine::new(demo_playlist(3), &EngineSettings::default()));
        let mut controls =
            PlayerControls::mount(engine.clone(), engine.as_ref(), ControlsConfig::default())
                .unwrap();
        for _ in 0..2 {
            controls.next_activity().await.unwrap();
        }
        let mut app = App::new(controls);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Nothing playing"));
        assert!(text.contains("Come Alive"));
        assert!(text.contains("0:00 / 0:00"));
        assert!(app.seek_bar.width > 0);
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
