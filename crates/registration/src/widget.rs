//! Focusable form widgets shared by every screen.

use crate::screen::Command;

/// Keyboard input after the client has mapped its toolkit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Tab,
    Escape,
    F5,
    F12,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub label: &'static str,
    text: String,
}

impl TextInput {
    pub fn new(label: &'static str) -> Self {
        Self::with_text(label, "")
    }

    pub fn with_text(label: &'static str, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    /// Text as typed, for drawing.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text with surrounding whitespace removed, for validation.
    pub fn value(&self) -> &str {
        self.text.trim()
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub command: Command,
}

impl Button {
    pub fn new(label: &'static str, command: Command) -> Self {
        Self { label, command }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    TextInput(TextInput),
    Button(Button),
}

/// Widgets of one screen in tab order, exactly one of them focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRing {
    widgets: Vec<Widget>,
    focus: usize,
}

impl FocusRing {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self { widgets, focus: 0 }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.widgets.len() {
            self.focus = index;
        }
    }

    pub fn focus_next(&mut self) {
        if !self.widgets.is_empty() {
            self.focus = (self.focus + 1) % self.widgets.len();
        }
    }

    /// Trimmed text of the input at `index`, or `""` for anything else.
    pub fn value(&self, index: usize) -> &str {
        match self.widgets.get(index) {
            Some(Widget::TextInput(input)) => input.value(),
            _ => "",
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.widgets.get_mut(self.focus) {
            Some(Widget::TextInput(input)) => Some(input),
            _ => None,
        }
    }

    /// Apply a key to the focused widget. Returns the command of a button
    /// activated by Enter.
    pub fn key(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::Tab => self.focus_next(),
            Key::Enter => match self.widgets.get(self.focus) {
                Some(Widget::Button(button)) => return Some(button.command.clone()),
                Some(Widget::TextInput(_)) => self.focus_next(),
                None => {}
            },
            Key::Char(c) => {
                if let Some(input) = self.focused_input() {
                    input.push(c);
                }
            }
            Key::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.backspace();
                }
            }
            Key::Escape | Key::F5 | Key::F12 => {}
        }
        None
    }

    /// Focus the widget at `index` as a pointer click would, returning its
    /// command when it is a button.
    pub fn activate(&mut self, index: usize) -> Option<Command> {
        self.set_focus(index);
        match self.widgets.get(index) {
            Some(Widget::Button(button)) => Some(button.command.clone()),
            _ => None,
        }
    }
}
