//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads the final
//! state: the view flags, the filtered list and the search term.
//!
//! ## For contributors
//!
//! * The layout is a vertical split: title, search box, an optional error
//!   line, the story list (or a loading message) and a one-line status bar.
//! * Colours and styles are defined inline.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

const TITLE: &str = "My Hacker Stories";
const ERROR_TEXT: &str = "Something went wrong ...";
const LOADING_TEXT: &str = "Loading ...";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let error_height = u16::from(app.view().is_error);
    let [title_area, search_area, error_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(error_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Paragraph::new(Span::styled(
        TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, title_area);

    draw_search_box(app, frame, search_area);

    if app.view().is_error {
        let error = Paragraph::new(Span::styled(ERROR_TEXT, Style::default().fg(Color::Red)));
        frame.render_widget(error, error_area);
    }

    if app.view().is_loading {
        let loading = Paragraph::new(LOADING_TEXT)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, main_area);
    } else {
        draw_story_list(app, frame, main_area);
    }

    draw_status_bar(app, frame, status_area);
}

/// Render the search input, placing the cursor in it while focused.
fn draw_search_box(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.mode == InputMode::Search;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(app.search_term()).block(
        Block::default()
            .title(" Search: ")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    if focused {
        let width = u16::try_from(app.search_term().chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Render the filtered, scrollable story list.
fn draw_story_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .visible_stories()
        .into_iter()
        .map(|story| {
            let line = Line::from(vec![
                Span::styled(story.title.clone(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(story.url.clone(), Style::default().fg(Color::Blue)),
                Span::raw("  "),
                Span::styled(story.author.clone(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(
                    format!("{} comments", story.num_comments),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{} points", story.points),
                    Style::default().fg(Color::Green),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(" Stories ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.mode {
        InputMode::Search => "  type to search  Enter/Esc: list",
        InputMode::Browse => "  q: quit  ↑/↓: move  d: dismiss  /: search  r: reload",
    };
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{}/{} stories", app.visible_stories().len(), app.view().data.len()),
            Style::default().fg(Color::Green),
        ),
    ];
    if !app.search_is_persistent() {
        spans.push(Span::styled(
            "  (search not saved)",
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::raw(help));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests (rendering smoke tests)
// ---------------------------------------------------------------------------
