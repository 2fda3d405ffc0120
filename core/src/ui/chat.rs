/// Rendering for the conversation list, message thread, and composer
use crate::types::{DeliveryStatus, Message, MessageDirection};
use crate::ui::app::{App, ChatFocus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let area = f.size();
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(area);

    render_sidebar(f, app, panes[0]);
    render_thread(f, app, panes[1]);
    crate::ui::auth::render_status(f, app, area);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let chat = &app.chat;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // signed-in user
            Constraint::Length(3), // search box
            Constraint::Length(1), // filter/sort state
            Constraint::Min(0),    // conversation list
            Constraint::Length(1), // hints
        ])
        .split(area);

    let who = app
        .user
        .as_ref()
        .map(|u| format!(" {} <{}>", u.name, u.email))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(who).style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    let search_border = if chat.focus == ChatFocus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut term = chat.search_input.clone();
    if chat.focus == ChatFocus::Search {
        term.push('▏');
    }
    f.render_widget(
        Paragraph::new(term).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search")
                .border_style(search_border),
        ),
        rows[1],
    );

    let mode = format!(
        " {} · sorted by {}",
        chat.list.filter().label(),
        chat.list.sort().label()
    );
    f.render_widget(
        Paragraph::new(mode).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );

    let visible = chat.list.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|c| {
            let star = if chat.list.is_favorite(&c.id) { "★ " } else { "" };
            let tag = if c.is_group() { "# " } else { "" };
            let mut spans = vec![
                Span::styled(
                    format!("{}{}{}", star, tag, c.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ];
            if c.unread_count > 0 {
                spans.push(Span::styled(
                    format!(" ({})", c.unread_count),
                    Style::default().fg(Color::Cyan),
                ));
            }
            if c.online {
                spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
            }
            let preview = Span::styled(
                format!("  {}", c.last_message),
                Style::default().fg(Color::DarkGray),
            );
            ListItem::new(vec![Line::from(spans), Line::from(preview)])
        })
        .collect();

    let list_border = if chat.focus == ChatFocus::Sidebar {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if chat.loading_list {
        " Conversations (loading...) "
    } else {
        " Conversations "
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(list_border),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(chat.cursor.min(visible.len() - 1)));
    }
    f.render_stateful_widget(list, rows[3], &mut state);

    render_hints(f, rows[4], "↑↓ move · Enter open · f filter · s sort · * fav · / search");
}

fn render_thread(f: &mut Frame, app: &App, area: Rect) {
    let chat = &app.chat;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // messages
            Constraint::Length(1), // reply preview / typing
            Constraint::Length(3), // composer
            Constraint::Length(1), // hints
        ])
        .split(area);

    let header = match chat.list.selected() {
        Some(c) => {
            let presence = if c.is_group() {
                format!("{} members", c.members.len())
            } else if c.online {
                "online".to_string()
            } else {
                c.last_seen
                    .clone()
                    .map(|seen| format!("last seen {}", seen))
                    .unwrap_or_else(|| "offline".to_string())
            };
            format!(" {} · {}", c.name, presence)
        }
        None => " Select a conversation".to_string(),
    };
    f.render_widget(
        Paragraph::new(header).style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    render_messages(f, chat, rows[1]);

    if chat.thread.is_typing() {
        let name = chat.list.selected().map(|c| c.name.as_str()).unwrap_or("…");
        f.render_widget(
            Paragraph::new(format!(" {} is typing...", name))
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)),
            rows[2],
        );
    } else if let Some(reply) = chat.thread.replying_to() {
        f.render_widget(
            Paragraph::new(format!(" ↪ Replying to {}: {}", reply.sender, reply.preview))
                .style(Style::default().fg(Color::DarkGray)),
            rows[2],
        );
    }

    let composer_border = if chat.focus == ChatFocus::Composer {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut draft = chat.composer.clone();
    if chat.focus == ChatFocus::Composer {
        draft.push('▏');
    }
    f.render_widget(
        Paragraph::new(draft).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Message")
                .border_style(composer_border),
        ),
        rows[3],
    );

    render_hints(
        f,
        rows[4],
        "Enter send · ^R reply · ^G react · Tab panes · ^L sign out · ^C quit",
    );
}

fn render_messages(f: &mut Frame, chat: &crate::ui::app::ChatState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if chat.loading_thread {
        lines.push(Line::from(Span::styled(
            "Loading messages...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for message in chat.thread.messages() {
        push_message_lines(&mut lines, message);
    }

    let offset = lines.len().saturating_sub(area.height as usize) as u16;
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::NONE))
        .scroll((offset, 0));
    f.render_widget(body, area);
}

fn push_message_lines(lines: &mut Vec<Line<'_>>, message: &Message) {
    match message.direction {
        MessageDirection::System => {
            lines.push(Line::from(Span::styled(
                format!("— {} —", message.body),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        MessageDirection::Sent | MessageDirection::Received => {
            let sent = message.direction == MessageDirection::Sent;
            let name = if sent { "you" } else { message.sender.as_str() };
            let name_color = if sent { Color::Cyan } else { Color::Magenta };
            lines.push(Line::from(vec![
                Span::styled(
                    name.to_string(),
                    Style::default().fg(name_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", message.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            if let Some(reply) = &message.reply_to {
                lines.push(Line::from(Span::styled(
                    format!("  ↪ {}: {}", reply.sender, reply.preview),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            let mut body_spans = vec![Span::raw(format!("  {}", message.body))];
            if sent {
                body_spans.push(Span::styled(
                    format!(" {}", status_tick(message.status)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(body_spans));
            if !message.reactions.is_empty() {
                lines.push(Line::from(Span::raw(format!(
                    "    {}",
                    message.reactions.join(" ")
                ))));
            }
        }
    }
    lines.push(Line::from(""));
}

fn status_tick(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Sending => "○ sending",
        DeliveryStatus::Delivered => "✓ delivered",
        DeliveryStatus::Read => "✓✓ read",
    }
}

fn render_hints(f: &mut Frame, area: Rect, hints: &str) {
    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
