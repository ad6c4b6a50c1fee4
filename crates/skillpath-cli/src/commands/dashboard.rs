//! The `skillpath dashboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(
    email: String,
    format: String,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = super::open_store(store_path, config_path)?;
    let user = store.require_user(&email)?;
    let dashboard = store.dashboard(&user);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("{} <{}>", dashboard.user.name, dashboard.user.email);

    if dashboard.results.is_empty() {
        println!("No results yet. Run `skillpath submit` to take the quiz.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Result", "Date", "Score", "Prediction", "Roadmap"]);
        for result in &dashboard.results {
            table.add_row(vec![
                Cell::new(result.id),
                Cell::new(result.created_at.format("%Y-%m-%d %H:%M")),
                Cell::new(result.score),
                Cell::new(result.prediction.as_deref().unwrap_or("-")),
                Cell::new(result.roadmap.source()),
            ]);
        }
        println!("{table}");
        if let Some(latest) = dashboard.results.first() {
            super::submit::print_roadmap(&latest.roadmap);
        }
    }

    if !dashboard.feedbacks.is_empty() {
        println!("\nFeedback:");
        for feedback in &dashboard.feedbacks {
            let target = feedback
                .result_id
                .map(|id| format!("result {id}"))
                .unwrap_or_else(|| "general".to_string());
            println!(
                "  [{}] {}/5 on {target}{}",
                feedback.id,
                feedback.rating,
                feedback
                    .comment
                    .as_deref()
                    .map(|c| format!(": {c}"))
                    .unwrap_or_default()
            );
        }
    }

    Ok(())
}
