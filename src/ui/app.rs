use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::config::{self, Config};
use crate::db::{
    add_to_service, clear_service, create_song, delete_song, fetch_service, fetch_songs,
    move_service_item, remove_from_service, update_song,
};
use crate::models::{ServiceItem, SlideSize, SongRecord};
use crate::presentation::SlideRef;

use super::forms::{ConfirmDeleteSong, ConfirmRemoveItem, SongField, SongForm};
use super::helpers::{centered_rect, path_label, slide_lines, surface_error};
use super::screens::{LibraryScreen, LiveScreen, ServiceScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the next-slide preview pane on the live screen.
const PREVIEW_HEIGHT: u16 = 7;

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what keyboard shortcuts should
/// do.
enum Screen {
    Library(LibraryScreen),
    Service(ServiceScreen),
    Live(LiveScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    Searching(SearchState),
    CreatingSong(SongForm),
    EditingSong { id: i64, form: SongForm },
    ConfirmDeleteSong(ConfirmDeleteSong),
    ConfirmRemoveItem(ConfirmRemoveItem),
    ConfirmClearService,
}

/// State for an active inline search over the library.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    data_dir: PathBuf,
    config: Config,
    songs: Vec<SongRecord>,
    service: Vec<ServiceItem>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(
        conn: Connection,
        data_dir: PathBuf,
        config: Config,
        songs: Vec<SongRecord>,
        service: Vec<ServiceItem>,
    ) -> Self {
        let library = LibraryScreen::new(&songs);
        Self {
            conn,
            data_dir,
            config,
            songs,
            service,
            screen: Screen::Library(library),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Dispatch one keypress. Returns `true` when the application should
    /// exit.
    pub(crate) fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::CreatingSong(form) => self.handle_create_song(code, form)?,
            Mode::EditingSong { id, form } => self.handle_edit_song(code, id, form)?,
            Mode::ConfirmDeleteSong(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::ConfirmRemoveItem(confirm) => self.handle_confirm_remove(code, confirm)?,
            Mode::ConfirmClearService => self.handle_confirm_clear(code)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Library(_) => self.handle_library_key(code, exit),
            Screen::Service(_) => self.handle_service_key(code, exit),
            Screen::Live(_) => self.handle_live_key(code),
        }
    }

    fn handle_library_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let Screen::Library(library) = &mut self.screen else {
            return Ok(Mode::Normal);
        };

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab => {
                let mut service = ServiceScreen::default();
                service.ensure_in_bounds(self.service.len());
                self.clear_status();
                self.screen = Screen::Service(service);
            }
            KeyCode::Up => library.move_selection(-1),
            KeyCode::Down => library.move_selection(1),
            KeyCode::PageUp => library.move_selection(-5),
            KeyCode::PageDown => library.move_selection(5),
            KeyCode::Home => library.select_first(),
            KeyCode::End => library.select_last(),
            KeyCode::Char('f') | KeyCode::Char('/') => {
                let query = library.filter.clone().unwrap_or_default();
                self.clear_status();
                return Ok(Mode::Searching(SearchState { query }));
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::CreatingSong(SongForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(record) = library.current().cloned() {
                    self.clear_status();
                    return Ok(Mode::EditingSong {
                        id: record.id,
                        form: SongForm::from_record(&record),
                    });
                } else {
                    self.set_status("No song selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') => {
                if let Some(record) = library.current() {
                    let confirm = ConfirmDeleteSong::from(record);
                    self.clear_status();
                    return Ok(Mode::ConfirmDeleteSong(confirm));
                } else {
                    self.set_status("No song selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Enter => {
                if let Some(record) = library.current().cloned() {
                    add_to_service(&self.conn, record.id)?;
                    self.reload_service()?;
                    self.set_status(
                        format!("Added {} to the service.", record.display_title()),
                        StatusKind::Info,
                    );
                } else {
                    self.set_status("No song selected.", StatusKind::Error);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_service_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let len = self.service.len();
        let Screen::Service(service) = &mut self.screen else {
            return Ok(Mode::Normal);
        };

        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc | KeyCode::Tab => {
                self.clear_status();
                self.screen = Screen::Library(LibraryScreen::new(&self.songs));
            }
            KeyCode::Up => service.move_selection(-1, len),
            KeyCode::Down => service.move_selection(1, len),
            KeyCode::Char('u') | KeyCode::Char('U') => {
                let selected = service.selected;
                if let Some(item) = self.service.get(selected).cloned() {
                    if move_service_item(&self.conn, item.id, -1)? {
                        self.reload_service()?;
                        if let Screen::Service(service) = &mut self.screen {
                            service.selected = selected.saturating_sub(1);
                        }
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                let selected = service.selected;
                if let Some(item) = self.service.get(selected).cloned() {
                    if move_service_item(&self.conn, item.id, 1)? {
                        self.reload_service()?;
                        if let Screen::Service(service) = &mut self.screen {
                            service.selected = (selected + 1).min(len.saturating_sub(1));
                        }
                    }
                }
            }
            KeyCode::Char('-') => {
                let selected = service.selected;
                if let Some(item) = self.service.get(selected) {
                    let confirm = ConfirmRemoveItem::from(item);
                    self.clear_status();
                    return Ok(Mode::ConfirmRemoveItem(confirm));
                } else {
                    self.set_status("No entry selected to remove.", StatusKind::Error);
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if self.service.is_empty() {
                    self.set_status("Service list is already empty.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Ok(Mode::ConfirmClearService);
                }
            }
            KeyCode::Enter => {
                let selected = service.selected;
                if let Some(item) = self.service.get(selected).cloned() {
                    self.clear_status();
                    self.screen = Screen::Live(LiveScreen::open(
                        selected,
                        &item.song,
                        self.config.slide_size,
                    ));
                } else {
                    self.set_status("No song selected to present.", StatusKind::Error);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_live_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Live(live) = &mut self.screen else {
            return Ok(Mode::Normal);
        };

        match code {
            KeyCode::Esc => {
                let selected = live.item_index;
                let mut service = ServiceScreen { selected };
                service.ensure_in_bounds(self.service.len());
                self.clear_status();
                self.screen = Screen::Service(service);
            }
            KeyCode::Char(' ') | KeyCode::Right | KeyCode::Down | KeyCode::PageDown => {
                live.advance()
            }
            KeyCode::Left | KeyCode::Up | KeyCode::PageUp => live.retreat(),
            KeyCode::Home => live.at = SlideRef::reset(),
            KeyCode::Char('1') => self.set_slide_size(SlideSize::Single),
            KeyCode::Char('2') => self.set_slide_size(SlideSize::Double),
            KeyCode::Char('4') => self.set_slide_size(SlideSize::Quad),
            KeyCode::Tab => {
                let next = live.item_index + 1;
                if let Some(item) = self.service.get(next).cloned() {
                    self.screen =
                        Screen::Live(LiveScreen::open(next, &item.song, self.config.slide_size));
                } else {
                    self.set_status("Already at the last service song.", StatusKind::Error);
                }
            }
            KeyCode::BackTab => {
                if live.item_index == 0 {
                    self.set_status("Already at the first service song.", StatusKind::Error);
                } else {
                    let previous = live.item_index - 1;
                    if let Some(item) = self.service.get(previous).cloned() {
                        self.screen = Screen::Live(LiveScreen::open(
                            previous,
                            &item.song,
                            self.config.slide_size,
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                if let Screen::Library(library) = &mut self.screen {
                    library.set_filter(None, &self.songs);
                }
                Ok(Mode::Normal)
            }
            KeyCode::Enter => Ok(Mode::Normal),
            KeyCode::Backspace => {
                state.query.pop();
                self.apply_filter(&state);
                Ok(Mode::Searching(state))
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
                self.apply_filter(&state);
                Ok(Mode::Searching(state))
            }
            _ => Ok(Mode::Searching(state)),
        }
    }

    fn apply_filter(&mut self, state: &SearchState) {
        if let Screen::Library(library) = &mut self.screen {
            let filter = if state.query.is_empty() {
                None
            } else {
                Some(state.query.clone())
            };
            library.set_filter(filter, &self.songs);
        }
    }

    fn handle_create_song(&mut self, code: KeyCode, mut form: SongForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Tab => {
                form.toggle_field();
                Ok(Mode::CreatingSong(form))
            }
            KeyCode::Enter if form.active == SongField::Body => {
                form.insert_line();
                Ok(Mode::CreatingSong(form))
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((name, author, path, full_text)) => {
                    match create_song(&self.conn, &name, &author, &path, &full_text) {
                        Ok(record) => {
                            self.reload_songs()?;
                            self.set_status(
                                format!("Created {}.", record.display_title()),
                                StatusKind::Info,
                            );
                            Ok(Mode::Normal)
                        }
                        Err(err) => {
                            form.error = Some(surface_error(&err));
                            Ok(Mode::CreatingSong(form))
                        }
                    }
                }
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::CreatingSong(form))
                }
            },
            KeyCode::Up => {
                form.move_body_line(-1);
                Ok(Mode::CreatingSong(form))
            }
            KeyCode::Down => {
                form.move_body_line(1);
                Ok(Mode::CreatingSong(form))
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::CreatingSong(form))
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Ok(Mode::CreatingSong(form))
            }
            _ => Ok(Mode::CreatingSong(form)),
        }
    }

    fn handle_edit_song(&mut self, code: KeyCode, id: i64, mut form: SongForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Tab => {
                form.toggle_field();
                Ok(Mode::EditingSong { id, form })
            }
            KeyCode::Enter if form.active == SongField::Body => {
                form.insert_line();
                Ok(Mode::EditingSong { id, form })
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((name, author, path, full_text)) => {
                    match update_song(&self.conn, id, &name, &author, &path, &full_text) {
                        Ok(()) => {
                            self.reload_songs()?;
                            self.reload_service()?;
                            self.set_status(format!("Saved {name}."), StatusKind::Info);
                            Ok(Mode::Normal)
                        }
                        Err(err) => {
                            form.error = Some(surface_error(&err));
                            Ok(Mode::EditingSong { id, form })
                        }
                    }
                }
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::EditingSong { id, form })
                }
            },
            KeyCode::Up => {
                form.move_body_line(-1);
                Ok(Mode::EditingSong { id, form })
            }
            KeyCode::Down => {
                form.move_body_line(1);
                Ok(Mode::EditingSong { id, form })
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::EditingSong { id, form })
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Ok(Mode::EditingSong { id, form })
            }
            _ => Ok(Mode::EditingSong { id, form }),
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDeleteSong) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match delete_song(&self.conn, confirm.id) {
                    Ok(()) => {
                        self.reload_songs()?;
                        // Deleting a song cascades out of the service list.
                        self.reload_service()?;
                        self.set_status(format!("Deleted {}.", confirm.name), StatusKind::Info);
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmDeleteSong(confirm)),
        }
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemoveItem) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match remove_from_service(&self.conn, confirm.item_id) {
                    Ok(()) => {
                        self.reload_service()?;
                        self.set_status(
                            format!("Removed {} from the service.", confirm.name),
                            StatusKind::Info,
                        );
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmRemoveItem(confirm)),
        }
    }

    fn handle_confirm_clear(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                clear_service(&self.conn)?;
                self.reload_service()?;
                self.set_status("Service list cleared.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmClearService),
        }
    }

    fn set_slide_size(&mut self, size: SlideSize) {
        self.config.slide_size = size;
        if let Err(err) = config::store(&self.data_dir, self.config) {
            tracing::warn!(error = %err, "failed to persist configuration");
            self.set_status(
                format!("Could not save config: {}", surface_error(&err)),
                StatusKind::Error,
            );
        } else {
            self.set_status(format!("Slide size set to {size}."), StatusKind::Info);
        }
        if let Screen::Live(live) = &mut self.screen {
            live.set_size(size);
        }
    }

    fn reload_songs(&mut self) -> Result<()> {
        self.songs = fetch_songs(&self.conn)?;
        if let Screen::Library(library) = &mut self.screen {
            library.refresh(&self.songs);
        }
        Ok(())
    }

    fn reload_service(&mut self) -> Result<()> {
        self.service = fetch_service(&self.conn)?;
        if let Screen::Service(service) = &mut self.screen {
            service.ensure_in_bounds(self.service.len());
        }
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Library(library) => self.draw_library(frame, content_area, library),
            Screen::Service(service) => self.draw_service(frame, content_area, service),
            Screen::Live(live) => self.draw_live(frame, content_area, live),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::CreatingSong(form) => self.draw_song_form(frame, area, "New Song", form),
            Mode::EditingSong { form, .. } => self.draw_song_form(frame, area, "Edit Song", form),
            Mode::ConfirmDeleteSong(confirm) => self.draw_confirm(
                frame,
                area,
                "Confirm Deletion",
                &format!("Delete {} from the library?", confirm.name),
                "The song also disappears from the service list.",
            ),
            Mode::ConfirmRemoveItem(confirm) => self.draw_confirm(
                frame,
                area,
                "Confirm Removal",
                &format!("Remove {} from the service?", confirm.name),
                "The song stays in the library.",
            ),
            Mode::ConfirmClearService => self.draw_confirm(
                frame,
                area,
                "Confirm Clear",
                "Clear the whole service list?",
                "All entries are removed; library songs are untouched.",
            ),
            Mode::Normal => {}
        }
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect, library: &LibraryScreen) {
        let title = match &library.filter {
            Some(query) if !query.trim().is_empty() => format!("Library - \"{query}\""),
            _ => "Library".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.songs.is_empty() {
            let message = Paragraph::new("No songs yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }
        if library.filtered.is_empty() {
            let message = Paragraph::new("No songs match the current search.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = library
            .filtered
            .iter()
            .map(|record| {
                let mut spans = vec![Span::raw(record.display_title())];
                if let Some(path) = path_label(&record.path) {
                    spans.push(path);
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(library.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_service(&self, frame: &mut Frame, area: Rect, service: &ServiceScreen) {
        let block = Block::default().borders(Borders::ALL).title("Service");

        if self.service.is_empty() {
            let message =
                Paragraph::new("Service list is empty. Add songs from the library (Tab).")
                    .alignment(Alignment::Center)
                    .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .service
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut spans = vec![Span::raw(format!(
                    "{:2}. {}",
                    index + 1,
                    item.song.display_title()
                ))];
                if let Some(path) = path_label(&item.song.path) {
                    spans.push(path);
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(service.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_live(&self, frame: &mut Frame, area: Rect, live: &LiveScreen) {
        let preview_height = PREVIEW_HEIGHT.min(area.height / 3);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(preview_height),
            ])
            .split(area);

        let mut header_title = live.song.title.clone();
        if let Some(author) = &live.song.author {
            header_title = format!("{header_title} - {author}");
        }
        let header_line = Line::from(vec![
            Span::styled(
                live.part_title().unwrap_or("-").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(live.position_label(), Style::default().fg(Color::DarkGray)),
            Span::raw("   "),
            Span::styled(
                self.config.slide_size.to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let header = Paragraph::new(header_line)
            .block(Block::default().borders(Borders::ALL).title(header_title));
        frame.render_widget(header, chunks[0]);

        let current = match live.plan.current(live.at) {
            Some(slide) => slide_lines(slide, Style::default().add_modifier(Modifier::BOLD)),
            None => vec![Line::styled(
                "Nothing to show.",
                Style::default().fg(Color::DarkGray),
            )],
        };
        let slide = Paragraph::new(current)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(slide, chunks[1]);

        let next = match live.plan.peek_next(live.at) {
            Some(slide) => slide_lines(slide, Style::default().fg(Color::DarkGray)),
            None => vec![Line::styled(
                "End of song.",
                Style::default().fg(Color::DarkGray),
            )],
        };
        let preview = Paragraph::new(next)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Next"));
        frame.render_widget(preview, chunks[2]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = match (&self.mode, &self.screen) {
            (Mode::Searching(_), _) => "Type to filter | Enter keep | Esc clear",
            (Mode::CreatingSong(_) | Mode::EditingSong { .. }, _) => {
                "Tab switch field | Enter save (newline in body) | Esc cancel"
            }
            (
                Mode::ConfirmDeleteSong(_) | Mode::ConfirmRemoveItem(_) | Mode::ConfirmClearService,
                _,
            ) => "Y confirm | N / Esc cancel",
            (Mode::Normal, Screen::Library(_)) => {
                "Enter add to service | Tab service | f search | + new | e edit | - delete | q quit"
            }
            (Mode::Normal, Screen::Service(_)) => {
                "Enter go live | u/d reorder | - remove | c clear | Tab library | q quit"
            }
            (Mode::Normal, Screen::Live(_)) => {
                "Space next | Left previous | 1/2/4 slide size | Tab next song | Esc back"
            }
        };
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &SongForm) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Title", SongField::Name),
            form.build_line("Author", SongField::Author),
            form.build_line("Path", SongField::Path),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "Body:",
            if form.active == SongField::Body {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            },
        )));
        let body_start = lines.len();
        lines.extend(form.body_lines());

        // Keep the active body line visible inside the popup.
        let visible = inner.height as usize;
        let cursor_row = body_start + form.body_line;
        let scroll = if form.active == SongField::Body {
            cursor_row.saturating_sub(visible.saturating_sub(1))
        } else {
            0
        };

        let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
        frame.render_widget(paragraph, inner);

        let cursor = match form.active {
            SongField::Name => Some((("Title: ".len()) as u16, 0u16)),
            SongField::Author => Some((("Author: ".len()) as u16, 1)),
            SongField::Path => Some((("Path: ".len()) as u16, 2)),
            SongField::Body => None,
        };
        if let Some((prefix, row)) = cursor {
            let x = inner.x + prefix + form.value_len(form.active) as u16;
            frame.set_cursor_position((x, inner.y + row));
        }
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, question: &str, note: &str) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(question.to_string()),
            Line::from(note.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
