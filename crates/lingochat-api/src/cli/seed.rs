//! `lingochat seed`: load the speaker catalog.

use anyhow::Result;
use console::style;

use lingochat_infra::seed::seed_speakers;

use crate::state::AppState;

pub async fn seed(state: &AppState, json: bool) -> Result<()> {
    let count = seed_speakers(state.conversations.speakers()).await?;

    if json {
        println!("{}", serde_json::json!({ "seeded": count }));
    } else {
        println!();
        println!(
            "  {} Seeded {} speakers",
            style("✓").green().bold(),
            style(count).cyan()
        );
        println!();
    }
    Ok(())
}
