use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use workly_core::month_grid::{MonthGrid, YearMonth};

use super::App;
use crate::render::{Render, render_month};

pub async fn run(mut app: App, calendar: Option<String>, month: Option<String>, agenda: bool) -> Result<()> {
    let user = app.require_user().await?;
    let calendar = app.resolve_calendar(&user, calendar.as_deref()).await?;

    let today = Local::now().date_naive();
    let month = match month {
        Some(m) => m.parse::<YearMonth>()?,
        None => YearMonth::from_date(today)?,
    };
    let first_weekday = app.config.first_weekday()?;

    let days = app
        .workly
        .month_agenda(&user, &calendar.id, month, first_weekday, &Local)
        .await?;
    let labels = MonthGrid::new(month, first_weekday).weekday_labels();

    println!("{}", calendar.render());
    println!();
    println!("{}", render_month(month, &labels, &days, today));

    if agenda {
        println!();
        for day in days.iter().filter(|d| d.in_month && !d.events.is_empty()) {
            println!("{}", day.date.format("%a %b %-d").to_string().bold());
            for event in &day.events {
                println!("   {}", event.render());
            }
        }
    }
    Ok(())
}
