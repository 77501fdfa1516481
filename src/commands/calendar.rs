use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::App;
use crate::render::Render;

pub async fn new(mut app: App, name: String, description: Option<String>) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.workly.create_calendar(&user, &name, description).await?;

    // The first calendar becomes the default for later commands
    if app.prefs.last_calendar.is_none() {
        app.prefs.last_calendar = Some(calendar.id.clone());
        app.save_prefs()?;
    }

    println!("{}", format!("  Created calendar: {}", calendar.name).green());
    Ok(())
}

pub async fn list(app: App) -> Result<()> {
    let user = app.require_user().await?;
    let calendars = app.workly.calendars(&user).await?;

    if calendars.is_empty() {
        println!("{}", "  No calendars yet".dimmed());
        return Ok(());
    }

    for calendar in calendars {
        let current = app.prefs.last_calendar.as_deref() == Some(calendar.id.as_str());
        let marker = if current { "*" } else { " " };
        let role = if calendar.is_owner(&user.id) { " (owner)" } else { "" };
        println!("{} {}{}", marker.green(), calendar.render(), role.dimmed());
    }
    Ok(())
}

pub async fn use_calendar(mut app: App, calendar: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.workly.find_calendar(&user, &calendar).await?;

    app.prefs.last_calendar = Some(calendar.id.clone());
    app.save_prefs()?;

    println!("  Using {}", calendar.render());
    Ok(())
}

pub async fn rename(mut app: App, calendar: Option<String>, name: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let renamed = app.workly.rename_calendar(&user, &calendar.id, &name).await?;

    println!(
        "{}",
        format!("  Renamed {} → {}", calendar.name, renamed.name).green()
    );
    Ok(())
}

pub async fn delete(mut app: App, calendar: Option<String>, yes: bool) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "  Delete '{}' and all of its events?",
                calendar.name
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "  Cancelled".dimmed());
            return Ok(());
        }
    }

    app.workly.delete_calendar(&user, &calendar.id).await?;

    if app.prefs.last_calendar.as_deref() == Some(calendar.id.as_str()) {
        app.prefs.last_calendar = None;
        app.save_prefs()?;
    }

    println!("{}", format!("  Deleted calendar: {}", calendar.name).red());
    Ok(())
}
