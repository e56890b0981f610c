use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{ServiceItem, SongRecord};

/// Form state for song creation/editing. The metadata fields are single-line
/// text inputs; the body is edited line-by-line as the raw delimited song
/// text, so saving re-serializes the whole body at once.
#[derive(Clone)]
pub(crate) struct SongForm {
    pub(crate) name: String,
    pub(crate) author: String,
    pub(crate) path: String,
    /// Raw body split into lines for editing; joined with newlines on save.
    pub(crate) body: Vec<String>,
    /// Which body line the cursor sits on while the body field is active.
    pub(crate) body_line: usize,
    pub(crate) active: SongField,
    pub(crate) error: Option<String>,
}

/// Enumerates the fields within the song form to drive focus management.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum SongField {
    Name,
    Author,
    Path,
    Body,
}

impl Default for SongForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            path: String::new(),
            body: vec![String::new()],
            body_line: 0,
            active: SongField::Name,
            error: None,
        }
    }
}

impl SongForm {
    /// Populate the form from an existing library record when entering edit
    /// mode.
    pub(crate) fn from_record(record: &SongRecord) -> Self {
        let body: Vec<String> = record.full_text.split('\n').map(str::to_string).collect();
        Self {
            name: record.name.clone(),
            author: record.author.clone(),
            path: record.path.clone(),
            body,
            body_line: 0,
            active: SongField::Name,
            error: None,
        }
    }

    /// Cycle focus across the form fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            SongField::Name => SongField::Author,
            SongField::Author => SongField::Path,
            SongField::Path => SongField::Body,
            SongField::Body => SongField::Name,
        };
    }

    /// Insert a character at the end of the active field (or of the active
    /// body line).
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SongField::Name => self.name.push(ch),
            SongField::Author => self.author.push(ch),
            SongField::Path => self.path.push(ch),
            SongField::Body => {
                if let Some(line) = self.body.get_mut(self.body_line) {
                    line.push(ch);
                }
            }
        }
        true
    }

    /// Remove the last character of the active field. In the body, deleting
    /// past the start of an empty line removes the line itself.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            SongField::Name => {
                self.name.pop();
            }
            SongField::Author => {
                self.author.pop();
            }
            SongField::Path => {
                self.path.pop();
            }
            SongField::Body => {
                let Some(line) = self.body.get_mut(self.body_line) else {
                    return;
                };
                if line.pop().is_none() && self.body.len() > 1 {
                    self.body.remove(self.body_line);
                    self.body_line = self.body_line.saturating_sub(1);
                }
            }
        }
    }

    /// Open a new body line beneath the cursor. Only meaningful while the
    /// body field is active.
    pub(crate) fn insert_line(&mut self) {
        if self.active == SongField::Body {
            self.body.insert(self.body_line + 1, String::new());
            self.body_line += 1;
        }
    }

    /// Move the body cursor up or down, clamped to the existing lines.
    pub(crate) fn move_body_line(&mut self, offset: isize) {
        if self.active != SongField::Body || self.body.is_empty() {
            return;
        }
        let last = (self.body.len() - 1) as isize;
        let target = (self.body_line as isize + offset).clamp(0, last);
        self.body_line = target as usize;
    }

    /// Validate and normalize form inputs before they are written to the
    /// database. Returns `(name, author, path, full_text)`.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Song title is required."));
        }
        Ok((
            name.to_string(),
            self.author.trim().to_string(),
            self.path.trim().to_string(),
            self.body.join("\n"),
        ))
    }

    /// Render a styled line for one of the single-line metadata fields.
    pub(crate) fn build_line(&self, field_name: &str, field: SongField) -> Line<'static> {
        let (value, placeholder) = match field {
            SongField::Name => (&self.name, "<required>"),
            SongField::Author => (&self.author, "<optional>"),
            SongField::Path => (&self.path, "<optional, e.g. hymns/advent>"),
            // The body renders through `body_lines`, not as a one-line field.
            SongField::Body => return Line::from("Body:"),
        };
        let is_active = self.active == field;

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Render the body lines, highlighting the cursor line while the body is
    /// active.
    pub(crate) fn body_lines(&self) -> Vec<Line<'static>> {
        self.body
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if self.active == SongField::Body && index == self.body_line {
                    Line::styled(text.clone(), Style::default().fg(Color::Yellow))
                } else {
                    Line::from(text.clone())
                }
            })
            .collect()
    }

    /// Character count of the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: SongField) -> usize {
        match field {
            SongField::Name => self.name.chars().count(),
            SongField::Author => self.author.chars().count(),
            SongField::Path => self.path.chars().count(),
            SongField::Body => self
                .body
                .get(self.body_line)
                .map(|line| line.chars().count())
                .unwrap_or(0),
        }
    }
}

/// Confirmation state before permanently deleting a library song.
#[derive(Clone)]
pub(crate) struct ConfirmDeleteSong {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl ConfirmDeleteSong {
    pub(crate) fn from(record: &SongRecord) -> Self {
        Self {
            id: record.id,
            name: record.display_title(),
        }
    }
}

/// Confirmation state before removing one entry from the service list.
#[derive(Clone)]
pub(crate) struct ConfirmRemoveItem {
    pub(crate) item_id: i64,
    pub(crate) name: String,
}

impl ConfirmRemoveItem {
    pub(crate) fn from(item: &ServiceItem) -> Self {
        Self {
            item_id: item.id,
            name: item.song.display_title(),
        }
    }
}
