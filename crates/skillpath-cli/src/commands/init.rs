//! The `skillpath init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("skillpath.toml").exists() {
        println!("skillpath.toml already exists, skipping.");
    } else {
        std::fs::write("skillpath.toml", SAMPLE_CONFIG)?;
        println!("Created skillpath.toml");
    }

    std::fs::create_dir_all("models")?;

    println!("\nNext steps:");
    println!("  1. Set GEMINI_API_KEY (or edit skillpath.toml) for generated roadmaps");
    println!("  2. Optionally drop a classifier at models/xgb_model.json");
    println!("  3. Run: skillpath register --name <name> --email <email>");
    println!("  4. Run: skillpath submit --email <email> --answers 2,1,2,...");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillpath configuration

model_path = "./models/xgb_model.json"
store_path = "./skillpath-data.json"

[generation]
endpoint = "https://api.generativeai.example/v1/generate"
api_key = "${GEMINI_API_KEY}"
service_name = "Gemini"
timeout_secs = 20
max_output_tokens = 800
temperature = 0.2
"#;
