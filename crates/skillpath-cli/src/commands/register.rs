//! The `skillpath register` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(
    name: String,
    email: String,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "name must not be empty");
    anyhow::ensure!(email.contains('@'), "invalid email: {email}");

    let (_, mut store) = super::open_store(store_path, config_path)?;
    let user = store.register(name.trim(), email.trim())?;
    println!("Registered {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}
