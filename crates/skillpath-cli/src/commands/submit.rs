//! The `skillpath submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use skillpath_core::{Roadmap, Submission};
use skillpath_providers::create_pipeline;

pub async fn execute(
    email: String,
    answers_str: String,
    gemini_key: Option<String>,
    format: String,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let answers = parse_answers(&answers_str)?;

    let (config, mut store) = super::open_store(store_path, config_path)?;
    let user = store.require_user(&email)?;
    let pipeline = create_pipeline(&config)?;

    let submission = pipeline
        .submit(&user, &answers, gemini_key.as_deref())
        .await
        .context("submission rejected")?;
    let stored = store.save_result(&user, &answers, &submission)?;
    tracing::info!(
        result = stored.id,
        score = submission.total_score,
        roadmap = submission.roadmap.source(),
        "result saved to {}",
        store.path().display()
    );

    if format == "json" {
        let body = serde_json::json!({
            "result_id": stored.id,
            "total_score": submission.total_score,
            "prediction": submission.prediction,
            "roadmap": submission.roadmap,
            "per_question": submission.per_question,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print_submission(stored.id, &submission);
    }

    Ok(())
}

fn parse_answers(s: &str) -> Result<Vec<i64>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("invalid answer index: '{}'", part.trim()))
        })
        .collect()
}

fn print_submission(result_id: u64, submission: &Submission) {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Your answer", "Correct", "Points"]);
    for entry in &submission.per_question {
        let correct = if entry.is_correct {
            "yes".to_string()
        } else {
            format!("no ({})", entry.correct_text)
        };
        table.add_row(vec![
            Cell::new(&entry.question),
            Cell::new(&entry.chosen_text),
            Cell::new(correct),
            Cell::new(entry.score_for_choice),
        ]);
    }
    println!("{table}");
    println!("Total score: {}", submission.total_score);
    if let Some(prediction) = &submission.prediction {
        println!("Model assessment: {}", prediction.label);
    }

    print_roadmap(&submission.roadmap);
    println!("\nSaved as result {result_id}");
}

pub(crate) fn print_roadmap(roadmap: &Roadmap) {
    println!("\nRoadmap ({}): {}", roadmap.source(), roadmap.summary());
    for week in roadmap.weeks() {
        println!("  Week {}: {}", week.week, week.goal);
        for activity in &week.activities {
            println!("    - {activity}");
        }
    }
    if !roadmap.resources().is_empty() {
        println!("  Resources:");
        for resource in roadmap.resources() {
            println!("    {} <{}> {}", resource.title, resource.url, resource.why);
        }
    }
}
