mod commands;
mod logging;
mod render;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::App;
use commands::event::EventFields;

#[derive(Parser)]
#[command(name = "workly")]
#[command(about = "Shared calendars, teams and events")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign in to an existing account
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage calendars
    Calendar {
        #[command(subcommand)]
        command: CalendarCommands,
    },
    /// Manage calendar members
    Member {
        /// Calendar id or name (defaults to the calendar in use)
        #[arg(short, long, global = true)]
        calendar: Option<String>,

        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Manage teams within a calendar
    Team {
        /// Calendar id or name (defaults to the calendar in use)
        #[arg(short, long, global = true)]
        calendar: Option<String>,

        #[command(subcommand)]
        command: TeamCommands,
    },
    /// Manage events
    Event {
        /// Calendar id or name (defaults to the calendar in use)
        #[arg(short, long, global = true)]
        calendar: Option<String>,

        #[command(subcommand)]
        command: EventCommands,
    },
    /// Show a month grid with event counts
    Month {
        /// Month to show (YYYY-MM, defaults to the current month)
        month: Option<String>,

        /// Calendar id or name (defaults to the calendar in use)
        #[arg(short, long)]
        calendar: Option<String>,

        /// List the month's events below the grid
        #[arg(short, long)]
        agenda: bool,
    },
    /// Show configuration paths and values
    Config,
}

#[derive(Subcommand)]
enum CalendarCommands {
    /// Create a calendar you own
    New {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// List calendars you belong to
    List,
    /// Make a calendar the default for other commands
    Use { calendar: String },
    /// Rename a calendar (owner only)
    Rename {
        name: String,

        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Delete a calendar and its events (owner only)
    Delete {
        #[arg(short, long)]
        calendar: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Add a registered user to the calendar (owner only)
    Invite { email: String },
    /// List the calendar's members
    List,
    /// Remove a member from the calendar (owner only)
    Remove { email: String },
}

#[derive(Subcommand)]
enum TeamCommands {
    /// Create a team (owner only)
    New {
        name: String,

        /// Member email to add (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// List teams and their members
    List,
    /// Add a member to a team
    Add { team: String, email: String },
    /// Remove a member from a team
    Remove { team: String, email: String },
    /// Delete a team
    Delete { team: String },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Create an event
    New {
        title: String,

        /// Start date/time (e.g., "2025-03-20" or "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time (defaults to one hour, or one day for dates)
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Member email, or "team:<name>"
        #[arg(short, long)]
        assign: Option<String>,
    },
    /// List events
    List {
        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Change an event
    Edit {
        /// Event id (or a unique prefix)
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Member email, or "team:<name>"
        #[arg(short, long, conflicts_with = "unassign")]
        assign: Option<String>,

        /// Remove the current assignee
        #[arg(long)]
        unassign: bool,
    },
    /// Delete an event
    Delete {
        /// Event id (or a unique prefix)
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let app = App::load()?;

    match cli.command {
        Commands::Signup { name, email } => commands::auth::signup(app, name, email).await,
        Commands::Login { email } => commands::auth::login(app, email).await,
        Commands::Logout => commands::auth::logout(app),
        Commands::Whoami => commands::auth::whoami(app).await,
        Commands::Calendar { command } => match command {
            CalendarCommands::New { name, description } => {
                commands::calendar::new(app, name, description).await
            }
            CalendarCommands::List => commands::calendar::list(app).await,
            CalendarCommands::Use { calendar } => {
                commands::calendar::use_calendar(app, calendar).await
            }
            CalendarCommands::Rename { name, calendar } => {
                commands::calendar::rename(app, calendar, name).await
            }
            CalendarCommands::Delete { calendar, yes } => {
                commands::calendar::delete(app, calendar, yes).await
            }
        },
        Commands::Member { calendar, command } => match command {
            MemberCommands::Invite { email } => {
                commands::member::invite(app, calendar, email).await
            }
            MemberCommands::List => commands::member::list(app, calendar).await,
            MemberCommands::Remove { email } => {
                commands::member::remove(app, calendar, email).await
            }
        },
        Commands::Team { calendar, command } => match command {
            TeamCommands::New { name, members } => {
                commands::team::new(app, calendar, name, members).await
            }
            TeamCommands::List => commands::team::list(app, calendar).await,
            TeamCommands::Add { team, email } => {
                commands::team::add(app, calendar, team, email).await
            }
            TeamCommands::Remove { team, email } => {
                commands::team::remove(app, calendar, team, email).await
            }
            TeamCommands::Delete { team } => commands::team::delete(app, calendar, team).await,
        },
        Commands::Event { calendar, command } => match command {
            EventCommands::New {
                title,
                start,
                end,
                description,
                location,
                assign,
            } => {
                let fields = EventFields {
                    description,
                    location,
                    assign,
                };
                commands::event::new(app, calendar, title, start, end, fields).await
            }
            EventCommands::List { from, to } => {
                commands::event::list(app, calendar, from, to).await
            }
            EventCommands::Edit {
                id,
                title,
                start,
                end,
                description,
                location,
                assign,
                unassign,
            } => {
                let fields = EventFields {
                    description,
                    location,
                    assign,
                };
                commands::event::edit(app, calendar, id, title, start, end, fields, unassign).await
            }
            EventCommands::Delete { id } => commands::event::delete(app, calendar, id).await,
        },
        Commands::Month {
            month,
            calendar,
            agenda,
        } => commands::month::run(app, calendar, month, agenda).await,
        Commands::Config => commands::config::run(app),
    }
}
