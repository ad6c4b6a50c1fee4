//! The `skillpath questions` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillpath_core::QuestionBank;

pub fn execute(format: String) -> Result<()> {
    let bank = QuestionBank::standard();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(bank.questions())?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Options"]);
    for (i, question) in bank.iter().enumerate() {
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(j, o)| format!("{j}: {o}"))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&question.text),
            Cell::new(options),
        ]);
    }
    println!("{table}");
    println!("{} questions", bank.len());

    Ok(())
}
