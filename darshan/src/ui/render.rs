//! Render orchestration for the guide TUI

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use darshan_core::scene::EntityKind;
use darshan_core::{catalog, AttachmentState, TurnRole};

use crate::app::{App, InputMode};
use crate::ui::theme::GuideTheme;

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Transcript,
    Sites,
}

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [title_area, main_area, status_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(area);

    let [sidebar_area, transcript_area] =
        Layout::horizontal([Constraint::Length(36), Constraint::Min(0)]).areas(main_area);

    let sites_height = catalog::sites().len() as u16 + 2;
    let [sites_area, scene_area] =
        Layout::vertical([Constraint::Length(sites_height), Constraint::Min(0)])
            .areas(sidebar_area);

    render_title_bar(frame, app, title_area);
    render_sites(frame, app, sites_area);
    render_scene(frame, app, scene_area);
    render_transcript(frame, app, transcript_area);
    render_status_bar(frame, app, status_area);
    render_input(frame, app, input_area);

    // The info panel sits above the page content when visible
    if app.session.panel().is_visible() {
        render_info_panel(frame, app, area);
    }

    if let Some(overlay) = app.overlay() {
        match overlay {
            Overlay::Help => render_help_overlay(frame, app, area),
        }
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let site = app
        .session
        .current_site()
        .map(|r| r.name)
        .unwrap_or("no site selected");

    let line = Line::from(Span::styled(
        format!(" Darshan - Indian Heritage AR Guide | {site} "),
        Style::default()
            .fg(app.theme.foreground)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the site selector list
fn render_sites(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.session.current_site().map(|r| r.id);

    let lines: Vec<Line> = catalog::sites()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let marker = if current == Some(record.id) { ">" } else { " " };
            let style = if current == Some(record.id) {
                Style::default()
                    .fg(app.theme.site_name)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.foreground)
            };
            Line::from(Span::styled(
                format!("{marker}{}. {}", i + 1, record.name),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .title(" Monuments [1-4] ")
        .borders(Borders::ALL)
        .border_style(
            app.theme
                .border_style(matches!(app.focused_panel, FocusedPanel::Sites)),
        );

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the marker scene state
fn render_scene(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let loader = app.session.loader();

    let mut lines: Vec<Line> = Vec::new();
    match loader.attachment() {
        Some(entity) => {
            match &entity.kind {
                EntityKind::Model { src } => {
                    lines.push(Line::from(Span::styled(
                        "3D model",
                        Style::default().fg(theme.model_ok),
                    )));
                    lines.push(Line::from(format!("  src: {src}")));
                }
                EntityKind::Primitive { shape, color } => {
                    lines.push(Line::from(Span::styled(
                        "fallback shape",
                        Style::default().fg(theme.fallback),
                    )));
                    lines.push(Line::from(vec![
                        Span::raw(format!("  {} ", shape.as_str())),
                        Span::styled(
                            color.clone(),
                            Style::default().fg(GuideTheme::hex_color(color)),
                        ),
                    ]));
                }
            }
            lines.push(Line::from(format!("  scale: {}", entity.scale)));
            lines.push(Line::from(format!("  position: {}", entity.position)));
            lines.push(Line::from(format!("  rotation: {}", entity.rotation)));
            lines.push(Line::from(Span::styled(
                format!(
                    "  spinning 360° / {}s",
                    entity.animation.dur_ms / 1000
                ),
                theme.system_style(),
            )));
            lines.push(Line::from(Span::styled(
                "  Enter: tap for info",
                theme.system_style(),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "marker empty",
                theme.system_style(),
            )));
            lines.push(Line::from(Span::styled(
                "press 1-4 to attach a monument",
                theme.system_style(),
            )));
        }
    }

    let state = match loader.state() {
        AttachmentState::Empty => " Marker ",
        AttachmentState::ModelAttached => " Marker [model] ",
        AttachmentState::PrimitiveAttached => " Marker [fallback] ",
    };

    let block = Block::default()
        .title(state)
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the chat transcript
fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let mut lines: Vec<Line> = Vec::new();
    if app.session.chat_history().is_empty() {
        lines.push(Line::from(Span::styled(
            "Ask the guide anything about Indian heritage and culture.",
            theme.system_style(),
        )));
    }
    for turn in app.session.chat_history() {
        let (prefix, style) = match turn.role {
            TurnRole::User => ("You: ", theme.user_style()),
            TurnRole::Assistant => ("Guide: ", theme.assistant_style()),
        };
        let mut first = true;
        for text_line in turn.text.lines() {
            if first {
                lines.push(Line::from(vec![
                    Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
                    Span::styled(text_line.to_string(), style),
                ]));
                first = false;
            } else {
                lines.push(Line::from(Span::styled(text_line.to_string(), style)));
            }
        }
        lines.push(Line::from(""));
    }
    if app.chat_pending {
        lines.push(Line::from(Span::styled(
            "Guide is typing...",
            theme.system_style(),
        )));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    let scroll = if app.scroll_locked_to_bottom {
        max_scroll
    } else {
        app.transcript_scroll.min(max_scroll)
    };

    let title = if matches!(app.focused_panel, FocusedPanel::Transcript) {
        " Guide Chat [j/k scroll] "
    } else {
        " Guide Chat "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(
            theme.border_style(matches!(app.focused_panel, FocusedPanel::Transcript)),
        );

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Insert => "INSERT",
        InputMode::Command => "COMMAND",
    };

    let mut spans = vec![
        Span::styled(
            format!(" {mode} "),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(" "),
    ];
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(message.to_string(), app.theme.system_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the input area
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = matches!(app.input_mode, InputMode::Insert | InputMode::Command);

    let placeholder = if app.chat_pending {
        "Waiting for the guide..."
    } else if matches!(app.input_mode, InputMode::Command) {
        ""
    } else {
        "Press 'i' and ask a question..."
    };

    let text = if app.input_buffer().is_empty() && !is_active {
        Span::styled(placeholder, app.theme.system_style())
    } else {
        Span::styled(
            app.input_buffer().to_string(),
            Style::default().fg(app.theme.foreground),
        )
    };

    let block = Block::default()
        .title(" Ask the Guide ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(is_active));

    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if is_active {
        frame.set_cursor_position((
            area.x + 1 + app.cursor_position() as u16,
            area.y + 1,
        ));
    }
}

/// Render the site info panel overlay
fn render_info_panel(frame: &mut Frame, app: &App, area: Rect) {
    let panel = app.session.panel();
    let popup_area = centered_rect_fixed(64, 16, area);

    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = panel
        .lines()
        .iter()
        .map(|l| Line::from(l.clone()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc or x to close",
        app.theme.system_style(),
    )));

    let block = Block::default()
        .title(format!(" {} ", panel.title()))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 20, area);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            " Darshan - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Monuments:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  1-4     View a monument on the marker"),
        Line::from("  Enter   Tap the model (reopen info)"),
        Line::from("  Esc/x   Dismiss the info panel"),
        Line::from(""),
        Line::from(Span::styled(
            "Chat:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  i       Type a question, Enter to send"),
        Line::from("  t       Ask about the current monument"),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  j/k     Scroll the chat transcript"),
        Line::from("  g/G     Jump to top/bottom"),
        Line::from("  Tab     Cycle panel focus"),
        Line::from(""),
        Line::from(Span::styled(
            "Commands:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  :q      Quit    :site <id>   :hide"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// A centered rect of fixed size, clamped to the containing area
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
