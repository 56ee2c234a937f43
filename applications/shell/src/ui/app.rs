use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use cadence_playback::{Activity, Ingested, PlayerControls, Resolution, Tab, UserIntent};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::ListState, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::render;

/// Whether the UI loop keeps going after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Step {
    Input(Option<CEvent>),
    Activity(Option<Activity>),
}

/// Run the terminal UI until the user quits, then unmount the controls.
pub async fn run(controls: PlayerControls) -> Result<()> {
    let mut app = App::new(controls);
    let (input_tx, mut inputs) = mpsc::unbounded_channel();
    std::thread::spawn(move || read_input(&input_tx));

    let mut terminal = init_terminal()?;
    let result = ui_loop(&mut terminal, &mut app, &mut inputs).await;
    restore_terminal(&mut terminal)?;

    app.into_controls().unmount();
    result
}

/// Forward terminal input until the UI loop goes away.
fn read_input(tx: &mpsc::UnboundedSender<CEvent>) {
    loop {
        match event::poll(Duration::from_millis(250)) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read terminal input: {}", e);
                    break;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to poll terminal input: {}", e);
                break;
            }
        }
    }
}

async fn ui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    inputs: &mut mpsc::UnboundedReceiver<CEvent>,
) -> Result<()> {
    let mut controls_open = true;

    loop {
        terminal.draw(|f| render::draw(f, app)).context("draw frame")?;

        let step = tokio::select! {
            input = inputs.recv() => Step::Input(input),
            activity = app.controls.next_activity(), if controls_open => Step::Activity(activity),
        };

        match step {
            Step::Input(None) => break,
            Step::Input(Some(ev)) => {
                if app.on_terminal_event(ev) == Flow::Quit {
                    break;
                }
            }
            Step::Activity(Some(activity)) => app.on_activity(activity),
            Step::Activity(None) => {
                debug!("Engine event stream closed");
                controls_open = false;
            }
        }
    }

    Ok(())
}

/// Shell state around the mounted controls.
pub struct App {
    pub(crate) controls: PlayerControls,
    pub(crate) tab: Tab,
    pub(crate) list_state: ListState,
    pub(crate) status: String,
    /// Inner area of the seek gauge from the last frame
    pub(crate) seek_bar: Rect,
    pointer_dragging: bool,
}

impl App {
    pub fn new(controls: PlayerControls) -> Self {
        Self {
            controls,
            tab: Tab::default(),
            list_state: ListState::default(),
            status: String::new(),
            seek_bar: Rect::default(),
            pointer_dragging: false,
        }
    }

    pub fn controls(&self) -> &PlayerControls {
        &self.controls
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn into_controls(self) -> PlayerControls {
        self.controls
    }

    pub fn on_terminal_event(&mut self, ev: CEvent) -> Flow {
        match ev {
            CEvent::Key(key) => self.on_key(key),
            CEvent::Mouse(mouse) => {
                self.on_mouse(mouse);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }

        let seek_step = self.controls.config().seek_step_seconds;
        let result = match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Char(' ') => self.controls.handle(UserIntent::TogglePlayback),
            KeyCode::Char('+' | '=') => self.controls.step_volume(true),
            KeyCode::Char('-') => self.controls.step_volume(false),
            KeyCode::Right | KeyCode::Char(']') => self.controls.seek_by(seek_step),
            KeyCode::Left | KeyCode::Char('[') => self.controls.seek_by(-seek_step),
            KeyCode::Up | KeyCode::Char('k') => {
                self.controls.playlist_mut().cursor_up();
                Ok(())
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.controls.playlist_mut().cursor_down();
                Ok(())
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.controls.playlist_mut().cursor_first();
                Ok(())
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.controls.playlist_mut().cursor_last();
                Ok(())
            }
            KeyCode::Enter if self.tab == Tab::Playlist => {
                match self.controls.playlist().cursor_track().map(|track| track.id) {
                    Some(id) => self.controls.handle(UserIntent::SelectTrack(id)),
                    None => Ok(()),
                }
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                Ok(())
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                Ok(())
            }
            KeyCode::Esc => {
                self.pointer_dragging = false;
                self.controls.handle(UserIntent::DragCancel)
            }
            _ => Ok(()),
        };

        self.report(result);
        Flow::Continue
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let on_bar = self.is_on_seek_bar(mouse.column, mouse.row);
        let result = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if on_bar => {
                let target = self.position_at(mouse.column);
                self.controls.handle(UserIntent::DragStart).and_then(|()| {
                    self.pointer_dragging = true;
                    self.controls.handle(UserIntent::DragMove(target))
                })
            }
            MouseEventKind::Drag(MouseButton::Left) if self.pointer_dragging => {
                let target = self.position_at(mouse.column);
                self.controls.handle(UserIntent::DragMove(target))
            }
            MouseEventKind::Up(MouseButton::Left) if self.pointer_dragging => {
                self.pointer_dragging = false;
                if on_bar {
                    self.controls.handle(UserIntent::DragCommit)
                } else {
                    self.controls.handle(UserIntent::DragCancel)
                }
            }
            MouseEventKind::ScrollUp => self.controls.step_volume(true),
            MouseEventKind::ScrollDown => self.controls.step_volume(false),
            _ => Ok(()),
        };
        self.report(result);
    }

    pub fn on_activity(&mut self, activity: Activity) {
        match activity {
            Activity::Resolved(Resolution::Rejected { action, error }) => {
                self.status = format!("{:?} failed: {}", action, error);
            }
            Activity::Ingested(Ingested::PlaybackEnded) => {
                self.status = "Playback finished".to_string();
            }
            Activity::Ingested(Ingested::TrackChanged(_)) => {
                if let Some(track) = &self.controls.session().current_track {
                    self.status = format!("Now playing {} - {}", track.artist, track.title);
                }
            }
            _ => {}
        }
    }

    fn report(&mut self, result: cadence_playback::Result<()>) {
        if let Err(e) = result {
            warn!("{}", e);
            self.status = e.to_string();
        }
    }

    fn is_on_seek_bar(&self, column: u16, row: u16) -> bool {
        let bar = self.seek_bar;
        bar.width > 0
            && column >= bar.x
            && column < bar.x + bar.width
            && row >= bar.y
            && row < bar.y + bar.height
    }

    fn position_at(&self, column: u16) -> f64 {
        let max = self.controls.transport().slider_max;
        render::position_for_column(self.seek_bar, column, max)
    }
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("create terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    Ok(())
}
