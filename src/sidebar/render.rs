//! Terminal rendering of the sidebar.

use crate::api::ConversationMessage;
use crate::sidebar::state::SidebarState;
use colored::Colorize;
use prettytable::{format, Table};

/// Renders the session list.
///
/// A collapsed sidebar shows only its header; an expanded one lists the
/// sessions with the current selection marked.
pub fn render_sidebar(state: &SidebarState, current_session_id: Option<i64>) -> String {
    let mut out = format!("Chats ({})\n", state.sessions.len());

    if let Some(error) = &state.error {
        out.push_str(&format!("{}\n", error.red()));
    }

    if !state.expanded {
        return out;
    }

    if state.loading && state.sessions.is_empty() {
        out.push_str(&format!("{}\n", "Loading sessions...".dimmed()));
        return out;
    }

    if state.is_empty() {
        if state.error.is_none() {
            out.push_str(&format!("{}\n", "No chat sessions yet.".yellow()));
        }
        return out;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "",
        "ID".bold(),
        "Title".bold(),
        "Created".bold()
    ]);

    for session in &state.sessions {
        let marker = if Some(session.session_id) == current_session_id {
            "▶"
        } else {
            ""
        };
        let created = session
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(prettytable::row![
            marker.green(),
            session.session_id.to_string().cyan(),
            session.display_title(),
            created
        ]);
    }

    out.push_str(&table.to_string());
    if state.creating {
        out.push_str(&format!("{}\n", "Creating session...".dimmed()));
    }
    out
}

/// Renders a conversation, one message per block.
pub fn render_conversation(session_id: i64, messages: &[ConversationMessage]) -> String {
    let mut out = format!("Session {}\n", session_id.to_string().cyan());
    if messages.is_empty() {
        out.push_str(&format!("{}\n", "(empty conversation)".dimmed()));
        return out;
    }
    for message in messages {
        let role = match message.role.as_str() {
            "user" => message.role.green().bold(),
            "assistant" => message.role.blue().bold(),
            _ => message.role.normal().bold(),
        };
        out.push_str(&format!("\n{}:\n{}\n", role, message.text));
    }
    out
}
