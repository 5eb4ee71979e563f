mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gymdesk_core::models::GroupBy;
use gymdesk_core::{ApiClient, ApiError, GymdeskConfig, OfficeBookingFilter};
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, fmt};

use commands::classes::NewClass;
use commands::offices::BookOffice;
use commands::records::{ResourceKind, parse_filters};
use commands::reservations::NewReservation;

#[derive(Parser)]
#[command(name = "gymdesk")]
#[command(about = "Manage members, classes, bookings and revenue of your club")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session locally
    Login {
        #[arg(short, long)]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a dashboard account
    Register {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Me,
    /// Change your password
    ChangePassword,
    /// List records of a collection
    List {
        resource: ResourceKind,

        /// Backend filter, e.g. --filter status=confirmed (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },
    /// Show one record
    Show { resource: ResourceKind, id: String },
    /// Delete one or more records
    Delete {
        resource: ResourceKind,

        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Fitness classes
    Classes {
        #[command(subcommand)]
        command: ClassCommands,
    },
    /// Offices and office bookings
    Offices {
        #[command(subcommand)]
        command: OfficeCommands,
    },
    /// Restaurant reservations
    Reservations {
        #[command(subcommand)]
        command: ReservationCommands,
    },
    /// Revenue analytics
    Revenue {
        /// Start date (YYYY-MM-DD). Defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today
        #[arg(long)]
        to: Option<String>,

        #[arg(long, value_enum, default_value_t = GroupByArg::Day)]
        group_by: GroupByArg,
    },
    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ClassCommands {
    /// Create a class, or a recurring series with --days
    New {
        #[arg(long)]
        name: String,

        #[arg(long)]
        instructor: String,

        /// YYYY-MM-DD; with --days, the series starts after this date
        #[arg(long)]
        date: String,

        /// HH:MM
        #[arg(long)]
        start: String,

        /// HH:MM
        #[arg(long)]
        end: String,

        #[arg(long, default_value_t = 20)]
        capacity: i64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        club: Option<String>,

        /// Weekdays to repeat on, e.g. "Monday,Wednesday"
        #[arg(long)]
        days: Option<String>,

        /// Number of weeks to repeat for (1-52)
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=52))]
        weeks: u32,
    },
    /// Show a class with its enrolled members and wait list
    Details { id: String },
    /// Enroll members; full classes put them on the wait list
    Enroll {
        class: String,

        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Remove a member from a class
    Unenroll { class: String, member: String },
    /// Cancel a class booking
    CancelBooking { id: String },
}

#[derive(Subcommand)]
enum OfficeCommands {
    /// Book an office; prints the cost before creating
    Book {
        office: String,

        #[arg(long)]
        member: String,

        #[arg(long)]
        start_date: String,

        #[arg(long)]
        start_time: String,

        #[arg(long)]
        end_date: String,

        #[arg(long)]
        end_time: String,

        #[arg(long)]
        notes: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List office bookings
    Bookings {
        #[arg(long)]
        office: Option<String>,

        #[arg(long)]
        member: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReservationCommands {
    /// Reserve a table
    New {
        restaurant: String,

        #[arg(long)]
        guest_name: String,

        #[arg(long)]
        party_size: i64,

        /// YYYY-MM-DDTHH:MM (local) or RFC 3339
        #[arg(long)]
        date_time: String,

        #[arg(long)]
        member: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        requests: Option<String>,
    },
    /// List reservations of a restaurant
    List { restaurant: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default config file
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupByArg {
    Day,
    Month,
}

impl From<GroupByArg> for GroupBy {
    fn from(arg: GroupByArg) -> Self {
        match arg {
            GroupByArg::Day => GroupBy::Day,
            GroupByArg::Month => GroupBy::Month,
        }
    }
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::SessionExpired)) {
            eprintln!("Run `gymdesk login` to sign in again.");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Writing the config file must work even when the current one is broken.
    if let Commands::Config {
        command: Some(ConfigCommands::Init { force }),
    } = cli.command
    {
        return commands::config::init(force);
    }

    let config = GymdeskConfig::load()?;
    let client = ApiClient::from_config(&config)?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&client, email, password).await,
        Commands::Register { name, email } => commands::auth::register(&client, name, email).await,
        Commands::Logout => commands::auth::logout(&client).await,
        Commands::Me => commands::auth::me(&client).await,
        Commands::ChangePassword => commands::auth::change_password(&client).await,
        Commands::List { resource, filters } => {
            let filters = parse_filters(&filters)?;
            commands::records::list(&client, resource, filters).await
        }
        Commands::Show { resource, id } => commands::records::show(&client, resource, &id).await,
        Commands::Delete { resource, ids } => commands::records::delete(&client, resource, &ids).await,
        Commands::Classes { command } => match command {
            ClassCommands::New {
                name,
                instructor,
                date,
                start,
                end,
                capacity,
                description,
                club,
                days,
                weeks,
            } => {
                let args = NewClass {
                    name,
                    instructor,
                    date,
                    start,
                    end,
                    capacity,
                    description,
                    club,
                    days,
                    weeks,
                };
                commands::classes::create(&client, args).await
            }
            ClassCommands::Details { id } => commands::classes::details(&client, &id).await,
            ClassCommands::Enroll { class, members } => {
                commands::classes::enroll(&client, &class, &members).await
            }
            ClassCommands::Unenroll { class, member } => {
                commands::classes::unenroll(&client, &class, &member).await
            }
            ClassCommands::CancelBooking { id } => {
                commands::classes::cancel_booking(&client, &id).await
            }
        },
        Commands::Offices { command } => match command {
            OfficeCommands::Book {
                office,
                member,
                start_date,
                start_time,
                end_date,
                end_time,
                notes,
                yes,
            } => {
                let args = BookOffice {
                    office_id: office,
                    member_id: member,
                    start_date,
                    start_time,
                    end_date,
                    end_time,
                    notes,
                    yes,
                };
                commands::offices::book(&client, args).await
            }
            OfficeCommands::Bookings {
                office,
                member,
                status,
            } => {
                let filter = OfficeBookingFilter {
                    office_id: office,
                    member_id: member,
                    status,
                };
                commands::offices::bookings(&client, filter).await
            }
        },
        Commands::Reservations { command } => match command {
            ReservationCommands::New {
                restaurant,
                guest_name,
                party_size,
                date_time,
                member,
                email,
                phone,
                requests,
            } => {
                let args = NewReservation {
                    restaurant_id: restaurant,
                    guest_name,
                    party_size,
                    date_time,
                    member,
                    email,
                    phone,
                    requests,
                };
                commands::reservations::create(&client, args).await
            }
            ReservationCommands::List { restaurant } => {
                commands::reservations::for_restaurant(&client, &restaurant).await
            }
        },
        Commands::Revenue { from, to, group_by } => {
            commands::revenue::run(&client, from, to, group_by.into()).await
        }
        Commands::Config { command: None } => commands::config::show(&config),
        Commands::Config { command: Some(ConfigCommands::Init { .. }) } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recurring_class() {
        let cli = Cli::try_parse_from([
            "gymdesk", "classes", "new", "--name", "HIIT", "--instructor", "Jo", "--date",
            "2025-03-05", "--start", "07:00", "--end", "07:45", "--days", "Monday,Wednesday",
            "--weeks", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Classes {
                command: ClassCommands::New { days, weeks, capacity, .. },
            } => {
                assert_eq!(days.as_deref(), Some("Monday,Wednesday"));
                assert_eq!(weeks, 2);
                assert_eq!(capacity, 20);
            }
            _ => panic!("expected classes new"),
        }
    }

    #[test]
    fn weeks_outside_the_form_range_are_rejected() {
        for weeks in ["0", "53", "20000000"] {
            let parsed = Cli::try_parse_from([
                "gymdesk", "classes", "new", "--name", "HIIT", "--instructor", "Jo", "--date",
                "2025-03-05", "--start", "07:00", "--end", "07:45", "--days", "Monday",
                "--weeks", weeks,
            ]);
            assert!(parsed.is_err(), "--weeks {} should be rejected", weeks);
        }
    }

    #[test]
    fn list_accepts_kebab_case_resources() {
        let cli = Cli::try_parse_from([
            "gymdesk", "list", "office-bookings", "--filter", "status=confirmed",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::List { resource: ResourceKind::OfficeBookings, ref filters } if filters.len() == 1
        ));
    }
}
