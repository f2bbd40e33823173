//! Keypad layout shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Layout, Position, Rect};

use abacus_engine::{Action, KeypadMode, Operator};

use crate::theme::Glyphs;

/// Visual group a key belongs to; picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Digit,
    Operator,
    Control,
    Equals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub action: Action,
    pub role: KeyRole,
}

const fn digit(ch: char) -> Key {
    Key {
        action: Action::Insert(ch),
        role: KeyRole::Digit,
    }
}

const fn op(operator: Operator) -> Key {
    Key {
        action: Action::Operator(operator),
        role: KeyRole::Operator,
    }
}

const fn control(action: Action) -> Key {
    Key {
        action,
        role: KeyRole::Control,
    }
}

const EQUALS: Key = Key {
    action: Action::Evaluate,
    role: KeyRole::Equals,
};

const SCIENTIFIC_ROWS: &[&[Key]] = &[
    &[
        op(Operator::Sin),
        op(Operator::Cos),
        op(Operator::Tan),
        op(Operator::Cot),
    ],
    &[op(Operator::Log), op(Operator::Power), op(Operator::Mod)],
];

const BASIC_ROWS: &[&[Key]] = &[
    &[
        control(Action::Clear),
        control(Action::Backspace),
        control(Action::ToggleSign),
        op(Operator::Divide),
    ],
    &[digit('7'), digit('8'), digit('9'), op(Operator::Multiply)],
    &[digit('4'), digit('5'), digit('6'), op(Operator::Subtract)],
    &[digit('1'), digit('2'), digit('3'), op(Operator::Add)],
    &[digit('0'), digit('.'), control(Action::Pi), EQUALS],
];

/// Rows top to bottom for `mode`.
pub fn rows(mode: KeypadMode) -> impl Iterator<Item = &'static [Key]> {
    let scientific: &'static [&'static [Key]] = match mode {
        KeypadMode::Basic => &[],
        KeypadMode::Scientific => SCIENTIFIC_ROWS,
    };
    scientific.iter().chain(BASIC_ROWS).copied()
}

impl Key {
    #[must_use]
    pub fn label(self, glyphs: &Glyphs) -> &'static str {
        match self.action {
            Action::Insert(ch) => DIGIT_LABELS
                .iter()
                .find(|(c, _)| *c == ch)
                .map_or("?", |(_, label)| label),
            Action::Operator(Operator::Multiply) => glyphs.multiply,
            Action::Operator(Operator::Divide) => glyphs.divide,
            Action::Operator(Operator::Power) => "x^y",
            Action::Operator(operator) => operator.as_str(),
            Action::Clear => "C",
            Action::Backspace => glyphs.backspace,
            Action::ToggleSign => glyphs.sign,
            Action::Pi => glyphs.pi,
            Action::Evaluate => "=",
            _ => "",
        }
    }
}

const DIGIT_LABELS: &[(char, &str)] = &[
    ('0', "0"),
    ('1', "1"),
    ('2', "2"),
    ('3', "3"),
    ('4', "4"),
    ('5', "5"),
    ('6', "6"),
    ('7', "7"),
    ('8', "8"),
    ('9', "9"),
    ('.', "."),
];

/// Screen rectangle of every key in `area`.
#[must_use]
pub fn key_rects(area: Rect, mode: KeypadMode) -> Vec<(Rect, Key)> {
    let rows: Vec<&[Key]> = rows(mode).collect();
    if rows.is_empty() || area.is_empty() {
        return Vec::new();
    }

    #[allow(clippy::cast_possible_truncation)]
    let row_count = rows.len() as u32;
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, row_count); rows.len()]).split(area);

    let mut rects = Vec::new();
    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        #[allow(clippy::cast_possible_truncation)]
        let key_count = row.len() as u32;
        let key_areas = Layout::horizontal(vec![Constraint::Ratio(1, key_count); row.len()])
            .spacing(1)
            .split(*row_area);
        rects.extend(key_areas.iter().copied().zip(row.iter().copied()));
    }
    rects
}

/// Key under a click at `(column, row)`.
#[must_use]
pub fn key_at(area: Rect, mode: KeypadMode, column: u16, row: u16) -> Option<Key> {
    let position = Position::new(column, row);
    key_rects(area, mode)
        .into_iter()
        .find(|(rect, _)| rect.contains(position))
        .map(|(_, key)| key)
}
