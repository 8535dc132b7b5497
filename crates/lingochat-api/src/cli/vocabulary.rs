//! Vocabulary CLI commands: save, list, dictionaries, forget.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use lingochat_types::speaker::SpeakerColor;

use crate::state::AppState;

fn table_color(color: SpeakerColor) -> Color {
    match color {
        SpeakerColor::Teal | SpeakerColor::Emerald | SpeakerColor::Green => Color::Green,
        SpeakerColor::Pink | SpeakerColor::Rose | SpeakerColor::Red => Color::Red,
        SpeakerColor::Yellow | SpeakerColor::Orange => Color::Yellow,
        SpeakerColor::Blue | SpeakerColor::Sky | SpeakerColor::Indigo => Color::Blue,
        SpeakerColor::Purple => Color::Magenta,
    }
}

pub async fn save(state: &AppState, user_id: &str, word: &str, language: &str, json: bool) -> Result<()> {
    let saved = state.vocabulary.save_word(user_id, word, language).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Saved {} to your {} dictionary",
        style("✓").green().bold(),
        style(&saved.word).cyan().bold(),
        saved.source_language
    );
    println!("  {} {}", style("id:").dim(), style(saved.id).dim());
    println!();
    Ok(())
}

pub async fn list_words(state: &AppState, user_id: &str, language: &str, json: bool) -> Result<()> {
    let words = state.vocabulary.list_words(user_id, language).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "words": words }))?
        );
        return Ok(());
    }

    if words.is_empty() {
        println!();
        println!(
            "  {} No {} words saved yet",
            style("i").blue().bold(),
            style(language).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Word").fg(Color::White),
        Cell::new("Translations").fg(Color::White),
        Cell::new("Id").fg(Color::White),
    ]);

    for word in &words {
        let translations = if word.translated {
            word.translations
                .iter()
                .map(|t| format!("{}: {}", t.language, t.word))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(&word.word).fg(table_color(word.color)),
            Cell::new(translations),
            Cell::new(word.id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

pub async fn dictionaries(state: &AppState, user_id: &str, json: bool) -> Result<()> {
    let dictionaries = state.vocabulary.list_dictionaries(user_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "dictionaries": dictionaries }))?
        );
        return Ok(());
    }

    println!();
    if dictionaries.is_empty() {
        println!(
            "  {} No dictionaries for '{}'",
            style("i").blue().bold(),
            style(user_id).cyan()
        );
    }
    for d in &dictionaries {
        println!(
            "  {:<12} {} words",
            style(&d.language).cyan().bold(),
            d.word_count
        );
    }
    println!();
    Ok(())
}

pub async fn forget(state: &AppState, user_id: &str, word_id: &str, json: bool) -> Result<()> {
    state.vocabulary.forget_word(user_id, word_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "message": "Word removed successfully",
            }))?
        );
        return Ok(());
    }

    println!();
    println!("  {} Word removed", style("✓").green().bold());
    println!();
    Ok(())
}
