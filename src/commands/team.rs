use anyhow::Result;
use owo_colors::OwoColorize;
use workly_core::calendar::{Calendar, Team};

use super::App;
use crate::render::Render;

fn find_team<'a>(calendar: &'a Calendar, team: &str) -> Result<&'a Team> {
    match calendar.find_team(team) {
        Some(t) => Ok(t),
        None => {
            let available: Vec<_> = calendar.teams.iter().map(|t| t.name.clone()).collect();
            anyhow::bail!(
                "Team '{}' not found in {}. Available: {}",
                team,
                calendar.name,
                if available.is_empty() { "(none)".to_string() } else { available.join(", ") }
            );
        }
    }
}

pub async fn new(
    mut app: App,
    calendar: Option<String>,
    name: String,
    member_emails: Vec<String>,
) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;

    let mut member_ids = Vec::with_capacity(member_emails.len());
    for email in &member_emails {
        member_ids.push(app.workly.user_by_email(email).await?.id);
    }

    let team = app
        .workly
        .create_team(&user, &calendar.id, &name, member_ids)
        .await?;

    println!(
        "{}",
        format!("  Created team {} in {}", team.name, calendar.name).green()
    );
    Ok(())
}

pub async fn list(mut app: App, calendar: Option<String>) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let members = app.workly.members(&user, &calendar.id).await?;

    if calendar.teams.is_empty() {
        println!("{}", "  No teams yet".dimmed());
        return Ok(());
    }

    for team in &calendar.teams {
        println!("{}", team.render());
        for id in &team.member_ids {
            match members.iter().find(|m| &m.id == id) {
                Some(member) => println!("   {}", member.render()),
                None => println!("   {}", id.dimmed()),
            }
        }
    }
    Ok(())
}

pub async fn add(mut app: App, calendar: Option<String>, team: String, email: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let team = find_team(&calendar, &team)?;
    let member = app.workly.user_by_email(&email).await?;

    app.workly
        .add_team_member(&user, &calendar.id, &team.id, &member.id)
        .await?;

    println!(
        "{}",
        format!("  Added {} to team {}", member.display_name, team.name).green()
    );
    Ok(())
}

pub async fn remove(mut app: App, calendar: Option<String>, team: String, email: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let team = find_team(&calendar, &team)?;
    let member = app.workly.user_by_email(&email).await?;

    app.workly
        .remove_team_member(&user, &calendar.id, &team.id, &member.id)
        .await?;

    println!(
        "{}",
        format!("  Removed {} from team {}", member.display_name, team.name).red()
    );
    Ok(())
}

pub async fn delete(mut app: App, calendar: Option<String>, team: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let team = find_team(&calendar, &team)?;

    app.workly
        .delete_team(&user, &calendar.id, &team.id)
        .await?;

    println!("{}", format!("  Deleted team {}", team.name).red());
    Ok(())
}
