//! Chat CLI commands: send, session, recent, translate.
//!
//! Each command calls the same conversation-service operation the HTTP
//! adapter uses, then renders styled text or JSON.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use lingochat_core::repository::speaker::SpeakerRepository;
use lingochat_types::chat::{ChatMessage, Sender, speaker_id_from_session_id};

use crate::state::AppState;

fn print_message(message: &ChatMessage, speaker_name: &str) {
    let who = match message.sender {
        Sender::User => style("You".to_string()).green().bold(),
        Sender::Speaker => style(speaker_name.to_string()).cyan().bold(),
    };
    println!(
        "  {} {} {}",
        style(format!("#{}", message.id)).dim(),
        who,
        style(message.timestamp.format("%H:%M").to_string()).dim()
    );
    println!("    {}", message.text);
}

/// Send one message and print the reply.
pub async fn send(
    state: &AppState,
    session_id: &str,
    text: &str,
    user_id: Option<&str>,
    json: bool,
) -> Result<()> {
    let outcome = state
        .conversations
        .handle_inbound_message(session_id, user_id, text)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let speaker_name = state
        .conversations
        .speakers()
        .find_by_id(speaker_id_from_session_id(session_id))
        .await
        .ok()
        .flatten()
        .map(|s| s.name)
        .unwrap_or_else(|| "Speaker".to_string());

    println!();
    println!("  {} {}", style("You:").green().bold(), outcome.echo.your_message);
    println!();
    print_message(&outcome.assistant_reply, &speaker_name);
    println!();
    Ok(())
}

/// Print a session's speaker card and transcript.
pub async fn show_session(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let view = state.conversations.get_session(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let speaker = &view.speaker;
    println!();
    println!(
        "  {} {}",
        style(&speaker.name).cyan().bold(),
        style(&speaker.description).dim()
    );
    println!("  {} {}", style("Personality:").dim(), speaker.personality.join(", "));
    println!("  {} {}", style("Interests:").dim(), speaker.interests.join(", "));
    println!();

    if view.messages.is_empty() {
        println!(
            "  {} No messages yet. Start with: {}",
            style("i").blue().bold(),
            style(format!("lingochat send {session_id} \"...\"")).yellow()
        );
    } else {
        for message in &view.messages {
            print_message(message, &speaker.name);
        }
    }
    println!();
    Ok(())
}

/// Table of a user's most recently active chats.
pub async fn recent(state: &AppState, user_id: &str, json: bool) -> Result<()> {
    let chats = state.conversations.list_recent_sessions(user_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "recentChats": chats }))?
        );
        return Ok(());
    }

    if chats.is_empty() {
        println!();
        println!(
            "  {} No chats found for '{}'",
            style("i").blue().bold(),
            style(user_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Speaker").fg(Color::White),
        Cell::new("Chat").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
        Cell::new("When").fg(Color::White),
    ]);

    for chat in &chats {
        let preview: String = if chat.last_message.chars().count() > 40 {
            let head: String = chat.last_message.chars().take(37).collect();
            format!("{head}...")
        } else {
            chat.last_message.clone()
        };
        table.add_row(vec![
            Cell::new(format!("{} {}", chat.flag_emoji, chat.name)).fg(Color::Cyan),
            Cell::new(&chat.chat_id),
            Cell::new(preview),
            Cell::new(&chat.timestamp).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Translate a word and list the results.
pub async fn translate(
    state: &AppState,
    word: &str,
    from: &str,
    to: &[String],
    json: bool,
) -> Result<()> {
    let translations = state.conversations.translate_word(word, from, to).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "translations": translations }))?
        );
        return Ok(());
    }

    println!();
    for t in &translations {
        println!(
            "  {:<12} {}",
            style(&t.language).dim(),
            style(&t.word).cyan().bold()
        );
    }
    println!();
    Ok(())
}
