//! Config command handlers.

use anyhow::{bail, Result};
use skein_core::config::{paths, Config};
use skein_core::thread::ViewMode;

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let path = paths::config_path();
    Config::init(&path)?;
    println!("Created config at {}", path.display());
    Ok(())
}

pub fn set_view_mode(tag: &str) -> Result<()> {
    let Some(mode) = ViewMode::from_tag(tag) else {
        bail!("Unknown view mode '{tag}'. Expected \"full\" or \"linear\".");
    };
    Config::save_view_mode(mode)?;
    println!("Default view mode set to {}", mode.as_tag());
    Ok(())
}
