use chrono::{Local, TimeZone};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Wrap,
    },
};
use survey::form::{NUMBER_PLACEHOLDER, SELECT_SENTINEL, TEXT_PLACEHOLDER};
use survey::page::LOADING;
use survey::review::{EMPTY_ANSWER, REVIEW_HEADING, format_timestamp};
use survey::{PageState, Question, QuestionKind, StoredResponse, SurveyForm, SurveyPage};

use crate::Theme;
use crate::state::{Focus, FormState, choices};

/// Blank rows between two questions.
const FIELD_SPACING: u16 = 1;

const FORM_HELP: &str =
    "Tab: Next  ↑/↓: Navigate  Space/Enter: Select  Ctrl+S/F10: Submit  Esc: Quit";
const DONE_HELP: &str = "Esc/Enter: Quit";

pub(crate) fn draw_page(
    frame: &mut Frame,
    page: &SurveyPage,
    view: &mut FormState,
    theme: &Theme,
    title: &str,
) {
    match page.state() {
        PageState::Loading => draw_message(frame, title, LOADING, theme.text, "", theme),
        PageState::Error(message) => {
            draw_message(frame, title, message, theme.error, DONE_HELP, theme)
        }
        PageState::FormActive(form) => draw_form(frame, form, view, theme),
        PageState::ReviewActive(response) => draw_review(frame, response, &Local, theme),
    }
}

fn header(text: String, theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        )
}

fn help_bar(text: &'static str, theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(text).style(Style::default().fg(theme.border))
}

fn draw_message(
    frame: &mut Frame,
    title: &str,
    message: &str,
    color: Color,
    help: &'static str,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(header(title.to_string(), theme), chunks[0]);
    frame.render_widget(
        Paragraph::new(message.to_string())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
    frame.render_widget(help_bar(help, theme), chunks[2]);
}

fn draw_form(frame: &mut Frame, form: &SurveyForm, view: &mut FormState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Questions
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Hint or submit error
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let survey = form.definition().survey();
    let title = match &survey.description {
        Some(description) => format!("{}\n{description}", survey.title),
        None => survey.title.clone(),
    };
    frame.render_widget(header(title, theme), chunks[0]);

    draw_questions(frame, form, view, chunks[1], theme);

    let focused = view.focus() == Focus::Submit;
    let label = form.submit_label();
    let color = if form.can_submit() {
        theme.primary
    } else {
        theme.border
    };
    let submit_style = if focused {
        Style::default()
            .fg(theme.text)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    };
    let submit_text = if focused {
        format!("  [ {label} ]  ")
    } else {
        format!("    {label}    ")
    };
    let submit_button = Paragraph::new(submit_text)
        .style(submit_style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { color } else { theme.border })),
        );
    frame.render_widget(submit_button, chunks[2]);

    let status = if let Some(error) = form.submit_error() {
        Paragraph::new(format!("⚠ {error}")).style(Style::default().fg(theme.error))
    } else if let Some(hint) = form.hint() {
        Paragraph::new(hint).style(Style::default().fg(theme.highlight))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(status.alignment(Alignment::Center), chunks[3]);

    frame.render_widget(help_bar(FORM_HELP, theme), chunks[4]);
}

fn draw_questions(
    frame: &mut Frame,
    form: &SurveyForm,
    view: &mut FormState,
    area: Rect,
    theme: &Theme,
) {
    let questions = form.questions();
    let heights: Vec<u16> = questions.iter().map(field_height).collect();

    let mut tops = Vec::with_capacity(heights.len());
    let mut total: u16 = 0;
    for (idx, height) in heights.iter().enumerate() {
        if idx > 0 {
            total += FIELD_SPACING;
        }
        tops.push(total);
        total += height;
    }

    let viewport_height = area.height;
    if let Focus::Field(idx) = view.focus()
        && let (Some(top), Some(height)) = (tops.get(idx), heights.get(idx))
    {
        view.scroll_to(*top, top + height, viewport_height);
    }
    let scroll_offset = view.scroll_offset;

    // 1 column margin on the left, 1 for the scrollbar
    let content_width = area.width.saturating_sub(2);

    for (idx, question) in questions.iter().enumerate() {
        let top = tops[idx];
        // Fields cut off at the top are skipped, they look weird
        if top < scroll_offset {
            continue;
        }
        if top >= scroll_offset + viewport_height {
            break;
        }

        let visible_top = top - scroll_offset;
        let field_area = Rect {
            x: area.x + 1,
            y: area.y + visible_top,
            width: content_width,
            height: heights[idx].min(viewport_height - visible_top),
        };
        draw_field(frame, form, view, idx, question, field_area, theme);
    }

    if total > viewport_height {
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y,
            width: 1,
            height: viewport_height,
        };

        let mut scrollbar_state = ScrollbarState::new(total as usize)
            .position(scroll_offset as usize)
            .viewport_content_length(viewport_height as usize);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn field_height(question: &Question) -> u16 {
    let description = u16::from(question.description().is_some());
    let body = match question.kind() {
        QuestionKind::Text | QuestionKind::Number => 1,
        kind @ (QuestionKind::Select(_) | QuestionKind::Radio(_)) => choices(kind).len() as u16,
        QuestionKind::Unknown(_) => 0,
    };
    2 + description + body
}

fn draw_field(
    frame: &mut Frame,
    form: &SurveyForm,
    view: &FormState,
    idx: usize,
    question: &Question,
    area: Rect,
    theme: &Theme,
) {
    let is_focused = view.is_focused(idx);
    let value = form.value(question.id());
    let error = form.error(question.id());

    let border_color = if error.is_some() {
        theme.error
    } else if is_focused {
        theme.primary
    } else {
        theme.border
    };

    let mut title = vec![Span::raw(format!(" {}", question.title()))];
    if question.is_required() {
        title.push(Span::styled(" *", Style::default().fg(theme.error)));
    }
    title.push(Span::raw(" "));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(title))
        .title_style(Style::default().fg(if is_focused {
            theme.highlight
        } else {
            theme.text
        }));

    let mut inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(description) = question.description()
        && inner.height > 0
    {
        let line = Rect { height: 1, ..inner };
        frame.render_widget(
            Paragraph::new(description.to_string()).style(
                Style::default()
                    .fg(theme.border)
                    .add_modifier(Modifier::ITALIC),
            ),
            line,
        );
        inner.y += 1;
        inner.height -= 1;
    }

    match question.kind() {
        QuestionKind::Text | QuestionKind::Number => {
            let text = if value.is_empty() {
                let placeholder = if matches!(question.kind(), QuestionKind::Number) {
                    NUMBER_PLACEHOLDER
                } else {
                    TEXT_PLACEHOLDER
                };
                Paragraph::new(placeholder).style(Style::default().fg(theme.border))
            } else {
                Paragraph::new(value.to_string()).style(Style::default().fg(theme.text))
            };
            frame.render_widget(text, inner);

            if is_focused && inner.height > 0 {
                let cursor_x = inner.x + view.cursor(idx) as u16;
                if cursor_x < inner.x + inner.width {
                    frame.set_cursor_position((cursor_x, inner.y));
                }
            }
        }
        kind @ (QuestionKind::Select(_) | QuestionKind::Radio(_)) => {
            let items: Vec<ListItem> = choices(kind)
                .into_iter()
                .enumerate()
                .map(|(choice_idx, choice)| {
                    let selected = choice == value;
                    let marker = if selected { "(●)" } else { "( )" };
                    let label = if choice.is_empty() {
                        SELECT_SENTINEL
                    } else {
                        choice
                    };
                    let style = if is_focused && choice_idx == view.highlight(idx) {
                        Style::default()
                            .fg(theme.text)
                            .bg(theme.selected_bg)
                            .add_modifier(Modifier::BOLD)
                    } else if selected {
                        Style::default().fg(theme.highlight)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    ListItem::new(format!("{marker} {label}")).style(style)
                })
                .collect();
            frame.render_widget(List::new(items), inner);
        }
        QuestionKind::Unknown(_) => {}
    }

    if let Some(error) = error
        && area.height > 0
    {
        let error_area = Rect {
            x: area.x + 1,
            y: area.y + area.height - 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(format!("⚠ {error}")).style(Style::default().fg(theme.error)),
            error_area,
        );
    }
}

fn draw_review<Tz>(frame: &mut Frame, response: &StoredResponse, tz: &Tz, theme: &Theme)
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(header(REVIEW_HEADING.to_string(), theme), chunks[0]);

    let mut lines = Vec::new();
    for answer in &response.answers {
        lines.push(Line::styled(
            answer.question_title.clone(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ));
        lines.push(if answer.value.is_empty() {
            Line::styled(
                format!("  {EMPTY_ANSWER}"),
                Style::default()
                    .fg(theme.border)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Line::styled(format!("  {}", answer.value), Style::default().fg(theme.text))
        });
        lines.push(Line::default());
    }
    lines.push(Line::styled(
        format!(
            "Submitted at: {}",
            format_timestamp(&response.created_at, tz)
        ),
        Style::default().fg(theme.success),
    ));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        chunks[1],
    );
    frame.render_widget(help_bar(DONE_HELP, theme), chunks[2]);
}
