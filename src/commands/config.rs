use anyhow::Result;
use owo_colors::OwoColorize;
use workly_core::preferences::Preferences;
use workly_core::workly_config::WorklyConfig;

use super::App;

pub fn run(app: App) -> Result<()> {
    let config_path = WorklyConfig::config_path()?;
    let prefs_path = Preferences::default_path()?;

    println!("{} {}", "config:".dimmed(), config_path.display());
    println!("{} {}", "preferences:".dimmed(), prefs_path.display());
    println!();
    println!("{} {}", "data_dir:".dimmed(), app.config.data_path().display());
    println!("{} {}", "first_weekday:".dimmed(), app.config.first_weekday()?);
    println!("{} {:?}", "backend:".dimmed(), app.config.backend);

    match &app.prefs.session {
        Some(session) => println!("{} {}", "signed in:".dimmed(), session.email),
        None => println!("{} {}", "signed in:".dimmed(), "no".dimmed()),
    }
    Ok(())
}
