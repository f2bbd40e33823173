//! TUI rendering for Abacus using ratatui.

mod input;
pub mod keypad;
mod theme;

pub use input::{InputPump, action_for_key, action_for_mouse, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use abacus_engine::{App, ServiceStatus, ViewState, format_value};

use self::keypad::KeyRole;

const DISPLAY_HEIGHT: u16 = 4;
const HISTORY_WIDTH: u16 = 34;

/// Where each part of the screen goes. Rendering and hit-testing share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub display: Rect,
    pub keypad: Rect,
    pub history: Option<Rect>,
    pub status: Rect,
}

#[must_use]
pub fn frame_layout(area: Rect, view: &ViewState) -> FrameLayout {
    let [body, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
        .margin(1)
        .areas(area);

    let (main, history) = if view.history_open {
        let [main, history] =
            Layout::horizontal([Constraint::Min(24), Constraint::Length(HISTORY_WIDTH)])
                .spacing(1)
                .areas(body);
        (main, Some(history))
    } else {
        (body, None)
    };

    let [display, keypad] =
        Layout::vertical([Constraint::Length(DISPLAY_HEIGHT), Constraint::Min(5)])
            .spacing(1)
            .areas(main);

    FrameLayout {
        display,
        keypad,
        history,
        status,
    }
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let layout = frame_layout(frame.area(), app.view());
    draw_display(frame, app, layout.display, &palette, &glyphs);
    draw_keypad(frame, app, layout.keypad, &palette, &glyphs);
    if let Some(area) = layout.history {
        draw_history(frame, app, area, &palette, &glyphs);
    }
    draw_status_bar(frame, app, layout.status, &palette, &glyphs);

    if app.view().confirm_clear {
        draw_confirm_clear(frame, &palette);
    }
}

/// Swap the operator symbols for the active glyph set.
fn with_glyphs(text: &str, glyphs: &Glyphs) -> String {
    text.replace('×', glyphs.multiply)
        .replace('÷', glyphs.divide)
}

fn draw_display(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let operator_style = if app.error_message().is_some() {
        styles::error(palette)
    } else {
        styles::operator_line(palette)
    };

    let lines = vec![
        Line::from(Span::styled(
            with_glyphs(&app.operator_line(), glyphs),
            operator_style,
        )),
        Line::from(Span::styled(app.display(), styles::display(palette))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Line::from(" Abacus ").left_aligned())
        .title(Line::from(format!(" {} ", app.view().keypad.label())).right_aligned())
        .style(Style::default().bg(palette.bg_panel));

    let display = Paragraph::new(lines)
        .alignment(Alignment::Right)
        .block(block);
    frame.render_widget(display, area);
}

fn draw_keypad(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    for (rect, key) in keypad::key_rects(area, app.view().keypad) {
        let fg = match key.role {
            KeyRole::Digit => palette.text_primary,
            KeyRole::Operator => palette.operator,
            KeyRole::Control => palette.control,
            KeyRole::Equals => palette.equals,
        };
        let style = styles::key(palette, fg);
        frame.render_widget(Block::default().style(style), rect);

        let label_area = Rect {
            y: rect.y + rect.height.saturating_sub(1) / 2,
            height: rect.height.min(1),
            ..rect
        };
        let label = Paragraph::new(key.label(glyphs))
            .alignment(Alignment::Center)
            .style(style);
        frame.render_widget(label, label_area);
    }
}

/// First visible history row so that `selected` stays on screen.
fn history_offset(selected: Option<usize>, visible: usize) -> usize {
    match selected {
        Some(index) if visible > 0 && index >= visible => index + 1 - visible,
        _ => 0,
    }
}

fn history_block(palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(" History ")
        .style(Style::default().bg(palette.bg_panel))
}

/// History index shown at screen row `row`, if any.
#[must_use]
pub fn history_index_at(app: &App, area: Rect, column: u16, row: u16) -> Option<usize> {
    let inner = history_block(&palette(app.ui_options())).inner(area);
    if !inner.contains(ratatui::layout::Position::new(column, row)) {
        return None;
    }
    let offset = history_offset(app.view().selected, usize::from(inner.height));
    let index = offset + usize::from(row - inner.y);
    (index < app.history().len()).then_some(index)
}

fn draw_history(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = history_block(palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let history = app.history();
    if history.is_empty() {
        let empty = Paragraph::new("No calculations yet").style(styles::key_hint(palette));
        frame.render_widget(empty, inner);
        return;
    }

    let selected = app.view().selected;
    let visible = usize::from(inner.height);
    let offset = history_offset(selected, visible);

    let lines: Vec<Line> = history
        .entries()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, entry)| {
            let is_selected = selected == Some(index);
            let pointer = if is_selected { glyphs.selected } else { " " };
            let text = format!(
                "{pointer} {} = {}",
                with_glyphs(&entry.operation_label, glyphs),
                format_value(entry.result)
            );
            if is_selected {
                Line::from(Span::styled(text, styles::selected_row(palette)))
            } else {
                Line::from(Span::styled(text, Style::default().fg(palette.text_primary)))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let options = app.ui_options();
    let url = app.service_url().unwrap_or("service");

    let (status_text, status_color) = if app.is_calculating() {
        let spinner = spinner_frame(app.tick_count(), options);
        (format!("{spinner} Calculating..."), palette.accent)
    } else {
        match app.service_status() {
            ServiceStatus::Unknown => (String::new(), palette.text_muted),
            ServiceStatus::Checking => {
                let spinner = spinner_frame(app.tick_count(), options);
                (format!("{spinner} Checking {url}"), palette.text_muted)
            }
            ServiceStatus::Online { version } => {
                let version = version
                    .as_deref()
                    .map(|v| format!(" v{v}"))
                    .unwrap_or_default();
                (
                    format!("{} Connected to {url}{version}", glyphs.online),
                    palette.success,
                )
            }
            ServiceStatus::Unhealthy(status) => (
                format!("{} Service reports {status:?}", glyphs.offline),
                palette.warning,
            ),
            ServiceStatus::Offline => (
                format!("{} Service unreachable at {url}", glyphs.offline),
                palette.error,
            ),
        }
    };

    let hints = Line::from(vec![
        Span::styled("Tab", styles::key_highlight(palette)),
        Span::styled(" keypad  ", styles::key_hint(palette)),
        Span::styled("h", styles::key_highlight(palette)),
        Span::styled(" history  ", styles::key_hint(palette)),
        Span::styled("q", styles::key_highlight(palette)),
        Span::styled(" quit ", styles::key_hint(palette)),
    ]);
    #[allow(clippy::cast_possible_truncation)]
    let hints_width = (hints.width() as u16).min(area.width);

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status_text, Style::default().fg(status_color)),
    ]));
    frame.render_widget(status, left);
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), right);
}

fn draw_confirm_clear(frame: &mut Frame, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(
            "Clear all history?",
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", styles::key_highlight(palette)),
            Span::styled(" confirm  ", styles::key_hint(palette)),
            Span::styled("n/Esc", styles::key_highlight(palette)),
            Span::styled(" cancel", styles::key_hint(palette)),
        ]),
    ];

    let area = frame.area();
    let width = 30.min(area.width);
    let height = 5.min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.warning))
        .style(Style::default().bg(palette.bg_panel));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}
