use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::AppConfig;
use crate::error::Result;
use crate::events::{PanelMessage, PanelReply};
use crate::models::Snippet;
use crate::panel::Panel;
use crate::repository::{JsonSettingsRepository, SnippetRepository};
use crate::storage::SnippetStore;
use crate::tree::{tree_items, SnippetItem};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use std::io::{self, stdout};
use std::time::Duration;
use tracing::debug;

/// How long to wait for input before re-reading the settings file.
const IDLE_REFRESH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Form input; `cursor` counts characters, not bytes.
    Form { input: String, cursor: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// State of the terminal panel between frames.
#[derive(Debug)]
pub struct PanelView {
    items: Vec<SnippetItem>,
    selected: usize,
    offset: usize,
    mode: Mode,
    editing: Option<usize>,
    status: Option<String>,
}

impl Default for PanelView {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelView {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            offset: 0,
            mode: Mode::Browse,
            editing: None,
            status: None,
        }
    }

    pub fn items(&self) -> &[SnippetItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Re-read the list from the panel without touching the form.
    pub fn reload<R: SnippetRepository, C: Clipboard>(&mut self, panel: &Panel<R, C>) -> Result<()> {
        if let PanelReply::Refresh { snippets, editing } = panel.refresh()? {
            self.set_entries(&snippets);
            self.editing = editing;
        }
        Ok(())
    }

    pub fn handle_key<R: SnippetRepository, C: Clipboard>(
        &mut self,
        panel: &mut Panel<R, C>,
        key: KeyEvent,
    ) -> Result<Flow> {
        if key.kind != KeyEventKind::Press {
            return Ok(Flow::Continue);
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Flow::Exit);
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(panel, key.code),
            Mode::Form { .. } => self.handle_form_key(panel, key.code),
        }
    }

    fn handle_browse_key<R: SnippetRepository, C: Clipboard>(
        &mut self,
        panel: &mut Panel<R, C>,
        code: KeyCode,
    ) -> Result<Flow> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(item) = self.items.get(self.selected) {
                    let reply = item.activate(panel)?;
                    self.apply(reply);
                }
            }
            KeyCode::Char('a') => {
                panel.cancel_edit();
                self.editing = None;
                self.status = None;
                self.mode = Mode::Form {
                    input: String::new(),
                    cursor: 0,
                };
            }
            KeyCode::Char('e') => {
                if !self.items.is_empty() {
                    let reply = panel.handle(PanelMessage::LoadSnippet {
                        index: self.selected,
                    })?;
                    self.apply(reply);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if !self.items.is_empty() {
                    let reply = panel.handle(PanelMessage::DeleteSnippet {
                        index: self.selected,
                    })?;
                    self.apply(reply);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Flow::Exit),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn handle_form_key<R: SnippetRepository, C: Clipboard>(
        &mut self,
        panel: &mut Panel<R, C>,
        code: KeyCode,
    ) -> Result<Flow> {
        let Mode::Form { input, cursor } = &mut self.mode else {
            return Ok(Flow::Continue);
        };

        match code {
            KeyCode::Enter => {
                let value = input.clone();
                let reply = panel.handle(PanelMessage::AddSnippet { value })?;
                self.apply(reply);
                self.editing = panel.session().editing();
            }
            KeyCode::Esc => {
                panel.cancel_edit();
                self.editing = None;
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                if *cursor > 0 {
                    *cursor -= 1;
                    let at = byte_index(input, *cursor);
                    input.remove(at);
                }
            }
            KeyCode::Delete => {
                if *cursor < input.chars().count() {
                    let at = byte_index(input, *cursor);
                    input.remove(at);
                }
            }
            KeyCode::Left => *cursor = cursor.saturating_sub(1),
            KeyCode::Right => *cursor = (*cursor + 1).min(input.chars().count()),
            KeyCode::Home => *cursor = 0,
            KeyCode::End => *cursor = input.chars().count(),
            KeyCode::Char(c) => {
                let at = byte_index(input, *cursor);
                input.insert(at, c);
                *cursor += 1;
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, reply: PanelReply) {
        self.status = reply.status_message();
        match reply {
            PanelReply::Refresh { snippets, editing } => {
                self.set_entries(&snippets);
                self.editing = editing;
                if matches!(self.mode, Mode::Form { .. }) && editing.is_none() {
                    self.mode = Mode::Browse;
                    self.status = Some("Saved".to_string());
                }
            }
            PanelReply::Load { index, value } => {
                self.editing = Some(index);
                self.mode = Mode::Form {
                    cursor: value.chars().count(),
                    input: value,
                };
            }
            PanelReply::Copied { .. } | PanelReply::Ignored { .. } => {}
        }
    }

    fn set_entries(&mut self, snippets: &[Snippet]) {
        self.items = tree_items(snippets);
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn render_rows(&mut self, visible: usize) -> Vec<ListItem<'static>> {
        self.offset = scroll_offset(self.selected, self.offset, visible);
        let end = self.items.len().min(self.offset + visible);

        self.items[self.offset..end]
            .iter()
            .map(|item| {
                let is_selected = item.index == self.selected;
                let highlight_symbol = if is_selected {
                    Span::styled(
                        "> ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let marker = if Some(item.index) == self.editing {
                    Span::styled("* ", Style::default().fg(Color::Magenta))
                } else {
                    Span::raw("  ")
                };

                let line = Line::from(vec![
                    highlight_symbol,
                    Span::styled(format!("{:>3}", item.index), Style::default().fg(Color::Green)),
                    Span::raw(" "),
                    marker,
                    Span::styled(item.label.clone(), Style::default().fg(Color::White)),
                ]);

                if is_selected {
                    ListItem::new(line).style(Style::default().bg(Color::DarkGray))
                } else {
                    ListItem::new(line)
                }
            })
            .collect()
    }
}

/// First visible row so that `selected` stays on screen.
pub fn scroll_offset(selected: usize, offset: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    if selected >= offset + visible {
        selected + 1 - visible
    } else if selected < offset {
        selected
    } else {
        offset
    }
}

/// Horizontal scroll and cursor column for a one-line input `width` cells wide,
/// keeping the cursor inside the box.
pub fn form_viewport(cursor: usize, width: u16) -> (u16, u16) {
    let width = usize::from(width.max(1));
    let scroll = cursor.saturating_sub(width - 1);
    let clamp = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
    (clamp(scroll), clamp(cursor - scroll))
}

fn byte_index(input: &str, chars: usize) -> usize {
    input
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(input.len())
}

/// Open the snippet panel on the configured settings file.
pub fn display_snippet_panel(config: &AppConfig) -> Result<()> {
    let store = SnippetStore::new(JsonSettingsRepository::new(&config.settings_path));
    let mut panel = Panel::new(store, SystemClipboard::new());
    let mut view = PanelView::new();
    view.reload(&panel)?;

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let result = match Terminal::new(backend) {
        Ok(mut terminal) => run_ui(&mut terminal, &mut panel, &mut view),
        Err(e) => Err(e.into()),
    };

    // Clean up terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

/// Main UI loop
fn run_ui<R: SnippetRepository, C: Clipboard>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    panel: &mut Panel<R, C>,
    view: &mut PanelView,
) -> Result<()> {
    loop {
        draw(terminal, view)?;

        if !event::poll(IDLE_REFRESH)? {
            // pick up edits made to the settings file by someone else
            view.reload(panel)?;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if view.handle_key(panel, key)? == Flow::Exit {
                debug!("closing snippet panel");
                return Ok(());
            }
        }
    }
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, view: &mut PanelView) -> Result<()> {
    terminal.draw(|f| {
        let size = f.size();
        let form_height = if matches!(view.mode, Mode::Form { .. }) { 3 } else { 0 };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Min(3),
                    Constraint::Length(form_height),
                    Constraint::Length(1),
                    Constraint::Length(2),
                ]
                .as_ref(),
            )
            .split(size);

        // Account for borders
        let visible = layout[0].height.saturating_sub(2) as usize;
        let title = match view.editing {
            Some(index) => format!(" Snippets (editing {}) ", index),
            None => " Snippets ".to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().bg(Color::Black).fg(Color::White));

        if view.items.is_empty() {
            let message = Paragraph::new(Line::from(vec![
                Span::raw("No snippets yet. Press "),
                Span::styled("a", Style::default().fg(Color::Yellow)),
                Span::raw(" to add one."),
            ]))
            .block(block);
            f.render_widget(message, layout[0]);
        } else {
            let list = List::new(view.render_rows(visible)).block(block);
            f.render_widget(list, layout[0]);
        }

        if let Mode::Form { input, cursor } = &view.mode {
            let form_title = match view.editing {
                Some(index) => format!(" Edit snippet {} ", index),
                None => " New snippet ".to_string(),
            };
            let area = layout[1];
            let (scroll, column) = form_viewport(*cursor, area.width.saturating_sub(2));
            let form = Paragraph::new(input.as_str())
                .scroll((0, scroll))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(form_title)
                        .style(Style::default().fg(Color::Cyan)),
                );
            f.render_widget(form, area);
            f.set_cursor(
                area.x.saturating_add(1).saturating_add(column),
                area.y.saturating_add(1),
            );
        }

        let status = Paragraph::new(view.status.clone().unwrap_or_default())
            .style(Style::default().fg(Color::Green));
        f.render_widget(status, layout[2]);

        let help = match view.mode {
            Mode::Browse => help_line(&[
                ("↑/↓", "Navigate"),
                ("Enter", "Copy"),
                ("a", "Add"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("Esc", "Exit"),
            ]),
            Mode::Form { .. } => help_line(&[("Enter", "Save"), ("Esc", "Cancel")]),
        };
        let help = Paragraph::new(help)
            .block(Block::default().borders(Borders::TOP))
            .style(Style::default().bg(Color::Black));
        f.render_widget(help, layout[3]);
    })?;
    Ok(())
}

fn help_line(keys: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, action) in keys {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(": {}  ", action)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::repository::MemoryRepository;

    type TestPanel = Panel<MemoryRepository, MemoryClipboard>;

    fn setup(texts: &[&str]) -> (TestPanel, PanelView) {
        let panel = Panel::new(
            SnippetStore::new(MemoryRepository::with_snippets(texts.iter().copied())),
            MemoryClipboard::new(),
        );
        let mut view = PanelView::new();
        view.reload(&panel).unwrap();
        (panel, view)
    }

    fn press(view: &mut PanelView, panel: &mut TestPanel, code: KeyCode) -> Flow {
        view.handle_key(panel, KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_text(view: &mut PanelView, panel: &mut TestPanel, text: &str) {
        for c in text.chars() {
            press(view, panel, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_copies_selected_row() {
        let (mut panel, mut view) = setup(&["one", "two"]);
        press(&mut view, &mut panel, KeyCode::Down);
        press(&mut view, &mut panel, KeyCode::Enter);

        assert_eq!(panel.clipboard().contents(), Some("two"));
        assert_eq!(view.status(), Some("Copied: two"));
    }

    #[test]
    fn add_through_form() {
        let (mut panel, mut view) = setup(&["one"]);
        press(&mut view, &mut panel, KeyCode::Char('a'));
        type_text(&mut view, &mut panel, "two");
        press(&mut view, &mut panel, KeyCode::Enter);

        assert_eq!(panel.store().repository().texts(), vec!["one", "two"]);
        assert_eq!(view.mode(), &Mode::Browse);
        assert_eq!(view.items().len(), 2);
        assert_eq!(view.status(), Some("Saved"));
    }

    #[test]
    fn edit_prefills_and_updates() {
        let (mut panel, mut view) = setup(&["a", "b"]);
        press(&mut view, &mut panel, KeyCode::Down);
        press(&mut view, &mut panel, KeyCode::Char('e'));
        assert_eq!(
            view.mode(),
            &Mode::Form {
                input: "b".into(),
                cursor: 1
            }
        );

        press(&mut view, &mut panel, KeyCode::Backspace);
        type_text(&mut view, &mut panel, "c");
        press(&mut view, &mut panel, KeyCode::Enter);

        assert_eq!(panel.store().repository().texts(), vec!["a", "c"]);
        assert_eq!(view.mode(), &Mode::Browse);
    }

    #[test]
    fn empty_submit_keeps_form_open() {
        let (mut panel, mut view) = setup(&[]);
        press(&mut view, &mut panel, KeyCode::Char('a'));
        press(&mut view, &mut panel, KeyCode::Enter);

        assert!(matches!(view.mode(), Mode::Form { .. }));
        assert_eq!(view.status(), Some("Snippet text is empty"));
        assert!(panel.store().repository().texts().is_empty());
    }

    #[test]
    fn escape_in_form_cancels_edit() {
        let (mut panel, mut view) = setup(&["a"]);
        press(&mut view, &mut panel, KeyCode::Char('e'));
        press(&mut view, &mut panel, KeyCode::Esc);

        assert_eq!(view.mode(), &Mode::Browse);
        assert_eq!(panel.session().editing(), None);
    }

    #[test]
    fn delete_clamps_selection() {
        let (mut panel, mut view) = setup(&["a", "b"]);
        press(&mut view, &mut panel, KeyCode::Down);
        press(&mut view, &mut panel, KeyCode::Char('d'));

        assert_eq!(panel.store().repository().texts(), vec!["a"]);
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn cursor_editing_handles_multibyte_text() {
        let (mut panel, mut view) = setup(&[]);
        press(&mut view, &mut panel, KeyCode::Char('a'));
        type_text(&mut view, &mut panel, "héllo");
        press(&mut view, &mut panel, KeyCode::Home);
        press(&mut view, &mut panel, KeyCode::Right);
        press(&mut view, &mut panel, KeyCode::Delete);
        press(&mut view, &mut panel, KeyCode::End);
        type_text(&mut view, &mut panel, "!");

        assert_eq!(
            view.mode(),
            &Mode::Form {
                input: "hllo!".into(),
                cursor: 5
            }
        );
    }

    #[test]
    fn quit_keys_exit() {
        let (mut panel, mut view) = setup(&[]);
        assert_eq!(press(&mut view, &mut panel, KeyCode::Char('q')), Flow::Exit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(view.handle_key(&mut panel, ctrl_c).unwrap(), Flow::Exit);
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let (mut panel, mut view) = setup(&["a"]);
        let _ = panel.store_mut().add("b").unwrap();
        view.reload(&panel).unwrap();
        assert_eq!(view.items().len(), 2);
    }

    #[test]
    fn scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 0, 5), 0);
        assert_eq!(scroll_offset(7, 0, 5), 3);
        assert_eq!(scroll_offset(2, 3, 5), 2);
        assert_eq!(scroll_offset(4, 2, 5), 2);
    }

    #[test]
    fn form_viewport_scrolls_long_input() {
        assert_eq!(form_viewport(3, 10), (0, 3));
        assert_eq!(form_viewport(9, 10), (0, 9));
        assert_eq!(form_viewport(25, 10), (16, 9));
        assert_eq!(form_viewport(4, 0), (4, 0));
    }

    #[test]
    fn form_viewport_handles_huge_cursor() {
        let (scroll, column) = form_viewport(100_000, 78);
        assert_eq!(scroll, u16::MAX);
        assert_eq!(column, 77);

        let (scroll, column) = form_viewport(usize::MAX, u16::MAX);
        assert_eq!(scroll, u16::MAX);
        assert_eq!(column, u16::MAX - 1);
    }
}
