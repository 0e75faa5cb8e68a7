//! Single-line find prompt shown in the status row

use crate::parser::{Command, InputEvent};

/// Longest search term accepted, in bytes
pub const MAX_TERM_LEN: usize = 63;

const LABEL: &str = "search: ";

/// What the prompt wants after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// Still editing
    Pending,
    /// Enter pressed with this input
    Submit(String),
    /// Escape pressed
    Cancel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindPrompt {
    input: String,
}

impl FindPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Text for the status row
    pub fn status(&self) -> String {
        format!("{}{}", LABEL, self.input)
    }

    pub fn handle(&mut self, event: InputEvent) -> PromptAction {
        match event {
            InputEvent::InsertChar(c) => {
                if self.input.len() + c.len_utf8() <= MAX_TERM_LEN {
                    self.input.push(c);
                }
                PromptAction::Pending
            }
            InputEvent::Command(Command::Backspace) => {
                self.input.pop();
                PromptAction::Pending
            }
            InputEvent::Command(Command::NewLine) => {
                PromptAction::Submit(std::mem::take(&mut self.input))
            }
            InputEvent::Escape => PromptAction::Cancel,
            _ => PromptAction::Pending,
        }
    }
}
