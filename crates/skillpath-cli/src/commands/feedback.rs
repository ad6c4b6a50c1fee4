//! The `skillpath feedback` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(
    email: String,
    result_id: Option<u64>,
    rating: u8,
    comment: Option<String>,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, mut store) = super::open_store(store_path, config_path)?;
    let user = store.require_user(&email)?;
    let feedback = store.save_feedback(&user, result_id, rating, comment)?;
    println!("Feedback saved (id {})", feedback.id);
    Ok(())
}
