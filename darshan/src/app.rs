//! Main application state and logic

use std::path::PathBuf;

use darshan_core::scene::SceneEvent;
use darshan_core::{catalog, GuideSession};

use crate::ui::theme::GuideTheme;
use crate::ui::{FocusedPanel, Overlay};

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - free text chat input
    Insert,
    /// Command mode - entering : commands
    Command,
}

/// Main application state
pub struct App {
    pub session: GuideSession,

    /// Base directory the model assets are probed under.
    pub models_dir: PathBuf,

    // UI state
    pub theme: GuideTheme,
    pub focused_panel: FocusedPanel,
    overlay: Option<Overlay>,
    pub transcript_scroll: usize,
    pub scroll_locked_to_bottom: bool,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    // Chat submitted but not yet sent; the main loop awaits it
    pub pending_chat: Option<String>,
    pub chat_pending: bool,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: GuideSession, models_dir: PathBuf) -> Self {
        let mut app = Self {
            session,
            models_dir,
            theme: GuideTheme::default(),
            focused_panel: FocusedPanel::default(),
            overlay: None,
            transcript_scroll: 0,
            scroll_locked_to_bottom: true,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            pending_chat: None,
            chat_pending: false,
            status_message: None,
            should_quit: false,
        };

        app.set_status("Press 1-4 to view a monument, 'i' to chat, '?' for help");
        app
    }

    /// Select a site and stand in for the rendering library's asset
    /// fetch: a missing .glb on disk becomes a model-error event.
    pub fn select_site(&mut self, id: &str) {
        self.session.select_site(id);

        let Some(record) = self.session.current_site() else {
            return;
        };
        if record.id != id {
            // Selection was rejected (unknown id); leave the old attachment alone.
            return;
        }

        if self.models_dir.join(record.model.path).exists() {
            self.set_status(format!("{} model attached", record.name));
        } else {
            self.session.scene_event(SceneEvent::ModelError);
            self.set_status(format!("{} model missing, showing fallback shape", record.name));
        }
    }

    /// Select the nth site from the catalog (1-based hotkey index).
    pub fn select_site_index(&mut self, index: usize) {
        match catalog::sites().get(index.wrapping_sub(1)) {
            Some(record) => {
                let id = record.id;
                self.select_site(id);
            }
            None => self.set_status(format!("No site at position {index}")),
        }
    }

    /// Prefill the chat input with a suggested question about the
    /// current site and switch to insert mode.
    pub fn prefill_site_question(&mut self) {
        let Some(record) = self.session.current_site() else {
            self.set_status("Select a site first (1-4)");
            return;
        };
        let name = record.name;
        self.enter_insert_mode();
        self.set_input(format!("Tell me about the {name}"));
    }

    /// Enter insert mode; stale status hints are dropped so the line
    /// does not compete with the active input.
    pub fn enter_insert_mode(&mut self) {
        self.input_mode = InputMode::Insert;
        self.clear_status();
    }

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        if self.input_buffer.starts_with(':') {
            self.clear_input();
        }
    }

    /// Submit current input; returns the submitted text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.is_empty() {
            return None;
        }
        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;
        Some(input)
    }

    /// Process a colon command.
    pub fn process_command(&mut self, command: &str) {
        let cmd = command.trim_start_matches(':');
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        match parts.first().copied() {
            Some("q" | "quit" | "exit") => self.should_quit = true,
            Some("help" | "h") => self.toggle_help(),
            Some("hide") => self.session.hide_panel(),
            Some("site") => match parts.get(1) {
                Some(id) => {
                    let id = id.to_string();
                    self.select_site(&id);
                }
                None => self.set_status("Usage: :site <id>"),
            },
            Some(other) => self.set_status(format!("Unknown command: {other}")),
            None => {}
        }
    }

    // =========================================================================
    // Transcript scrolling
    // =========================================================================

    /// Scroll transcript to bottom and lock to bottom
    pub fn scroll_to_bottom(&mut self) {
        self.transcript_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    /// Estimate max scroll assuming ~60 char effective width
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let estimated_lines: usize = self
            .session
            .chat_history()
            .iter()
            .map(|turn| {
                turn.text
                    .lines()
                    .map(|line| (line.len() / ESTIMATED_WIDTH).max(1))
                    .sum::<usize>()
                    + 1
            })
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    /// Scroll transcript up (unlocks from bottom)
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.transcript_scroll > max_scroll {
            self.transcript_scroll = max_scroll;
        }
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    /// Scroll transcript down
    pub fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
        let max_scroll = self.estimate_max_scroll();
        self.transcript_scroll = self.transcript_scroll.min(max_scroll + 100);
    }

    // =========================================================================
    // Input editing (unicode-safe)
    // =========================================================================

    /// Handle a typed character
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    pub fn set_input(&mut self, content: impl Into<String>) {
        self.input_buffer = content.into();
        self.cursor_position = self.input_buffer.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Overlay and status
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Transcript => FocusedPanel::Sites,
            FocusedPanel::Sites => FocusedPanel::Transcript,
        };
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}
