use anyhow::Result;
use owo_colors::OwoColorize;

use super::App;
use crate::render::Render;

pub async fn invite(mut app: App, calendar: Option<String>, email: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let invitee = app.workly.invite_member(&user, &calendar.id, &email).await?;

    println!(
        "{}",
        format!("  Added {} to {}", invitee.display_name, calendar.name).green()
    );
    Ok(())
}

pub async fn list(mut app: App, calendar: Option<String>) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let members = app.workly.members(&user, &calendar.id).await?;

    println!("{}", calendar.render());
    for member in members {
        let role = if calendar.is_owner(&member.id) { " (owner)" } else { "" };
        println!("   {}{}", member.render(), role.dimmed());
    }
    Ok(())
}

pub async fn remove(mut app: App, calendar: Option<String>, email: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let member = app.workly.user_by_email(&email).await?;

    app.workly
        .remove_member(&user, &calendar.id, &member.id)
        .await?;

    println!(
        "{}",
        format!("  Removed {} from {}", member.display_name, calendar.name).red()
    );
    Ok(())
}
