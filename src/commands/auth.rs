use anyhow::{Context, Result};
use dialoguer::Input;
use owo_colors::OwoColorize;
use workly_core::auth::SignUp;
use workly_core::validation::{validate_email, validate_not_empty};

use super::App;
use crate::render::Render;

fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// Ask until the validator accepts the input.
fn prompt_validated<F>(prompt: &str, validate: F) -> Result<String>
where
    F: Fn(&str) -> workly_core::validation::ValidationResult,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match validate(&input).message() {
            None => return Ok(input),
            Some(msg) => eprintln!("  {}", msg.red()),
        }
    }
}

pub async fn signup(mut app: App, name: Option<String>, email: Option<String>) -> Result<()> {
    let display_name = match name {
        Some(n) => n,
        None => prompt_validated("  Name", |s| validate_not_empty("Name", s))?,
    };
    let email = match email {
        Some(e) => e,
        None => prompt_validated("  Email", validate_email)?,
    };
    let password = prompt_password("  Password: ")?;
    let confirmation = prompt_password("  Confirm password: ")?;

    let user = app
        .workly
        .sign_up(SignUp {
            display_name,
            email,
            password,
            confirmation,
        })
        .await?;

    app.prefs.sign_in(&user);
    app.save_prefs()?;

    println!("{}", format!("  Welcome, {}!", user.display_name).green());
    Ok(())
}

pub async fn login(mut app: App, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt_validated("  Email", validate_email)?,
    };
    let password = prompt_password("  Password: ")?;

    let user = app.workly.sign_in(&email, &password).await?;

    app.prefs.sign_in(&user);
    app.save_prefs()?;

    println!("{}", format!("  Signed in as {}", user.email).green());
    Ok(())
}

pub fn logout(mut app: App) -> Result<()> {
    match app.prefs.sign_out() {
        Some(session) => {
            app.save_prefs()?;
            println!("  Signed out {}", session.email);
        }
        None => println!("{}", "  Not signed in".dimmed()),
    }
    Ok(())
}

pub async fn whoami(app: App) -> Result<()> {
    let user = app.require_user().await?;
    println!("{}", user.render());
    Ok(())
}
