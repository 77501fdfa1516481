//! TUI rendering traits for Workly types.
//!
//! Extension traits that add colored terminal rendering to workly-core types
//! using owo_colors.

use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use workly_core::AgendaDay;
use workly_core::calendar::{Calendar, Team};
use workly_core::event::{Assignee, Event};
use workly_core::month_grid::YearMonth;
use workly_core::user::User;

use crate::commands::short_id;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Calendar {
    fn render(&self) -> String {
        let members = format!(
            "{} {}",
            self.member_ids.len(),
            pluralize("member", self.member_ids.len())
        );
        format!(
            "📅 {} {} {}",
            self.name.bold(),
            short_id(&self.id).dimmed(),
            members.dimmed()
        )
    }
}

impl Render for User {
    fn render(&self) -> String {
        format!("{} {}", self.display_name, format!("<{}>", self.email).dimmed())
    }
}

impl Render for Team {
    fn render(&self) -> String {
        let members = format!(
            "{} {}",
            self.member_ids.len(),
            pluralize("member", self.member_ids.len())
        );
        format!("👥 {} {}", self.name.bold(), members.dimmed())
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            short_id(&self.id).dimmed(),
            render_event_time(self).cyan(),
            self.title.bold()
        );
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
        }
        line
    }
}

/// Start and end in local time, collapsing the end date when it's the same day.
pub fn render_event_time(event: &Event) -> String {
    let start = event.start.with_timezone(&Local);
    let end = event.end.with_timezone(&Local);

    if start.date_naive() == end.date_naive() {
        format!("{} – {}", start.format("%a %b %-d %H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{} – {}",
            start.format("%a %b %-d %H:%M"),
            end.format("%a %b %-d %H:%M")
        )
    }
}

/// Describe an assignee using the calendar's members and teams.
pub fn render_assignee(assignee: &Assignee, calendar: &Calendar, members: &[User]) -> String {
    match assignee {
        Assignee::Member { user_id } => members
            .iter()
            .find(|u| &u.id == user_id)
            .map(|u| u.display_name.clone())
            .unwrap_or_else(|| "(former member)".to_string()),
        Assignee::Team { team_id } => calendar
            .team(team_id)
            .map(|t| format!("team {}", t.name))
            .unwrap_or_else(|| "(deleted team)".to_string()),
    }
}

/// Width of a month grid cell, including padding
const CELL_WIDTH: usize = 5;

/// Render a month as a 7-column grid. Days with events show a count marker.
pub fn render_month(month: YearMonth, labels: &[String], days: &[AgendaDay], today: NaiveDate) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{}", month.name().bold()));
    lines.push(
        labels
            .iter()
            .map(|l| format!("{:>width$}", l, width = CELL_WIDTH))
            .collect::<String>()
            .dimmed()
            .to_string(),
    );

    for week in days.chunks(7) {
        let row: String = week.iter().map(|day| render_cell(day, today)).collect();
        lines.push(row);
    }

    lines.join("\n")
}

fn render_cell(day: &AgendaDay, today: NaiveDate) -> String {
    use chrono::Datelike;

    let marker = match day.events.len() {
        0 => " ".to_string(),
        n if n < 10 => n.to_string(),
        _ => "+".to_string(),
    };
    let text = format!("{:>3}{}", day.date.day(), marker);
    let cell = format!("{:>width$}", text, width = CELL_WIDTH);

    if !day.in_month {
        cell.dimmed().to_string()
    } else if day.date == today {
        cell.reversed().to_string()
    } else if !day.events.is_empty() {
        cell.green().to_string()
    } else {
        cell
    }
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
