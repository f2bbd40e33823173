//! Input handling for the Abacus TUI.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use abacus_engine::{Action, App, Operator, ViewState};

use crate::{frame_layout, history_index_at, keypad};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024;
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Unblock a reader stuck on a full channel before joining it.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if the caller exits early; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input into `app`. Returns `true` once the app wants to quit.
///
/// `area` is the terminal size the last frame was drawn at; mouse clicks are
/// resolved against it.
pub fn handle_events(app: &mut App, input: &mut InputPump, area: Rect) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        processed += 1;

        let action = match ev {
            Event::Key(key) => action_for_key(key, app.view()),
            Event::Mouse(mouse) => action_for_mouse(mouse, app, area),
            _ => None,
        };
        if let Some(action) = action {
            tracing::trace!(?action, "Input");
            app.dispatch(action);
        }
        if app.should_quit() {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

/// Keyboard map. Pure, so it is tested without a terminal.
#[must_use]
pub fn action_for_key(key: KeyEvent, view: &ViewState) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'C') => Some(Action::Quit),
            _ => None,
        };
    }

    if view.confirm_clear {
        return match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmClearHistory),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::CancelClearHistory),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char(ch @ ('0'..='9' | '.')) => Action::Insert(ch),
        KeyCode::Char('+') => Action::Operator(Operator::Add),
        KeyCode::Char('-') => Action::Operator(Operator::Subtract),
        KeyCode::Char('*') => Action::Operator(Operator::Multiply),
        KeyCode::Char('/') => Action::Operator(Operator::Divide),
        KeyCode::Char('s') => Action::Operator(Operator::Sin),
        KeyCode::Char('o') => Action::Operator(Operator::Cos),
        KeyCode::Char('t') => Action::Operator(Operator::Tan),
        KeyCode::Char('k') => Action::Operator(Operator::Cot),
        KeyCode::Char('l') => Action::Operator(Operator::Log),
        KeyCode::Char('^') => Action::Operator(Operator::Power),
        KeyCode::Char('%') => Action::Operator(Operator::Mod),
        KeyCode::Char('p') => Action::Pi,
        KeyCode::Char('n') => Action::ToggleSign,
        KeyCode::Char('=') | KeyCode::Enter => Action::Evaluate,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Esc | KeyCode::Char('c' | 'C') => Action::Clear,
        KeyCode::Tab => Action::ToggleKeypad,
        KeyCode::Char('h') => Action::ToggleHistoryPanel,
        KeyCode::Up => Action::SelectHistoryUp,
        KeyCode::Down => Action::SelectHistoryDown,
        KeyCode::Char('u') => Action::ReplaySelected,
        KeyCode::Char('x') => Action::RequestClearHistory,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Left clicks on keypad buttons and history rows.
#[must_use]
pub fn action_for_mouse(mouse: MouseEvent, app: &App, area: Rect) -> Option<Action> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || app.view().confirm_clear {
        return None;
    }
    let layout = frame_layout(area, app.view());

    if let Some(key) = keypad::key_at(layout.keypad, app.view().keypad, mouse.column, mouse.row)
    {
        return Some(key.action);
    }
    layout
        .history
        .and_then(|history| history_index_at(app, history, mouse.column, mouse.row))
        .map(Action::ReplayHistory)
}
