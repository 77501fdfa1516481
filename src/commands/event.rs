use anyhow::Result;
use chrono::{DateTime, Duration, Local, Utc};
use owo_colors::OwoColorize;
use workly_core::calendar::Calendar;
use workly_core::date_range::DateRange;
use workly_core::event::{Assignee, Event, EventDraft};
use workly_core::user::User;

use super::{App, parse_datetime, short_id};
use crate::render::{Render, render_assignee};

/// Optional event fields shared by `event new` and `event edit`.
pub struct EventFields {
    pub description: Option<String>,
    pub location: Option<String>,
    pub assign: Option<String>,
}

/// End time when none is given: one day for all-day starts, otherwise one hour.
fn default_end(start: DateTime<Utc>, date_only: bool) -> DateTime<Utc> {
    if date_only {
        start + Duration::days(1)
    } else {
        start + Duration::hours(1)
    }
}

/// Field changes requested by `event edit`, with times already parsed.
#[derive(Debug, Default)]
struct EventPatch {
    title: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    description: Option<String>,
    location: Option<String>,
}

impl EventPatch {
    /// Moving the start keeps the duration unless an end is given too.
    fn apply(self, draft: &mut EventDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(start) = self.start {
            let duration = draft.end - draft.start;
            draft.start = start;
            draft.end = start + duration;
        }
        if let Some(end) = self.end {
            draft.end = end;
        }
        if let Some(description) = self.description {
            draft.description = Some(description);
        }
        if let Some(location) = self.location {
            draft.location = Some(location);
        }
    }
}

/// Resolve `--assign`: "team:<name>" for a team, otherwise a member's email.
async fn resolve_assignee(app: &App, calendar: &Calendar, spec: &str) -> Result<Assignee> {
    if let Some(team_name) = spec.strip_prefix("team:") {
        let Some(team) = calendar.find_team(team_name) else {
            anyhow::bail!("Team '{}' not found in {}", team_name, calendar.name);
        };
        return Ok(Assignee::Team {
            team_id: team.id.clone(),
        });
    }

    let member = app.workly.user_by_email(spec).await?;
    Ok(Assignee::Member { user_id: member.id })
}

/// Find an event in the calendar by id or unique id prefix.
async fn resolve_event(app: &App, user: &User, calendar: &Calendar, id: &str) -> Result<Event> {
    let events = app
        .workly
        .events(user, &calendar.id, &DateRange::all())
        .await?;
    let mut matches = events.into_iter().filter(|e| e.id.starts_with(id.trim()));

    match (matches.next(), matches.next()) {
        (Some(event), None) => Ok(event),
        (Some(_), Some(_)) => anyhow::bail!("Event id '{}' is ambiguous. Use more characters", id),
        (None, _) => anyhow::bail!("Event '{}' not found in {}", id, calendar.name),
    }
}

pub async fn new(
    mut app: App,
    calendar: Option<String>,
    title: String,
    start: String,
    end: Option<String>,
    fields: EventFields,
) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;

    let (start, date_only) = parse_datetime(&start, &Local)?;
    let end = match end {
        Some(e) => parse_datetime(&e, &Local)?.0,
        None => default_end(start, date_only),
    };

    let assignee = match fields.assign.as_deref() {
        Some(spec) => Some(resolve_assignee(&app, &calendar, spec).await?),
        None => None,
    };

    let draft = EventDraft {
        title,
        description: fields.description,
        start,
        end,
        location: fields.location,
        assignee,
    };

    let event = app.workly.create_event(&user, &calendar.id, draft).await?;

    println!("{}", format!("  Created: {}", event.title).green());
    println!("   {}", event.render());
    Ok(())
}

pub async fn list(
    mut app: App,
    calendar: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let today = Local::now().date_naive();
    let range = DateRange::from_args(from.as_deref(), to.as_deref(), today, &Local)?;

    let events = app.workly.events(&user, &calendar.id, &range).await?;
    let members = app.workly.members(&user, &calendar.id).await?;

    println!("{}", calendar.render());
    if events.is_empty() {
        println!("{}", "   No events".dimmed());
        return Ok(());
    }

    for event in events {
        let mut line = format!("   {}", event.render());
        if let Some(assignee) = &event.assignee {
            let who = render_assignee(assignee, &calendar, &members);
            line.push_str(&format!(" {}", format!("→ {}", who).yellow()));
        }
        println!("{}", line);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn edit(
    mut app: App,
    calendar: Option<String>,
    id: String,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    fields: EventFields,
    unassign: bool,
) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let event = resolve_event(&app, &user, &calendar, &id).await?;

    let patch = EventPatch {
        title,
        start: start.map(|s| parse_datetime(&s, &Local)).transpose()?.map(|(dt, _)| dt),
        end: end.map(|e| parse_datetime(&e, &Local)).transpose()?.map(|(dt, _)| dt),
        description: fields.description,
        location: fields.location,
    };

    let mut draft = event.to_draft();
    patch.apply(&mut draft);
    if unassign {
        draft.assignee = None;
    } else if let Some(spec) = fields.assign.as_deref() {
        draft.assignee = Some(resolve_assignee(&app, &calendar, spec).await?);
    }

    let updated = app.workly.update_event(&user, &event.id, draft).await?;

    println!("{}", format!("  Updated: {}", updated.title).yellow());
    println!("   {}", updated.render());
    Ok(())
}

pub async fn delete(mut app: App, calendar: Option<String>, id: String) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;
    let event = resolve_event(&app, &user, &calendar, &id).await?;

    app.workly.delete_event(&user, &event.id).await?;

    println!(
        "{}",
        format!("  Deleted: {} ({})", event.title, short_id(&event.id)).red()
    );
    Ok(())
}
