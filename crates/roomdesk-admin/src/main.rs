//! `roomdesk` administration CLI
//!
//! Lists rooms and bookings held by the booking API and drives the same
//! create/edit/delete, approve/reject and history views an operator would use
//! in the web front-end.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use roomdesk_admin::{
    AppError, AppResult, AppState, DeleteTarget, Event, OutputFormat, Tab, exit_code, render,
    update,
};
use roomdesk_client::{Gateway, HttpGateway, InMemoryGateway};
use roomdesk_core::{
    BookingId, BookingStatus, Config, RoomId, SortDirection,
    config::LogFormat,
    forms::{BookingField, RoomField},
};
use serde::Serialize;
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{debug, info};

/// Command line interface for the room booking administration tool
#[derive(Parser, Debug)]
#[command(
    name = "roomdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Room booking administration tool",
    long_about = "Lists, creates, edits and deletes rooms and bookings through the booking REST API, approves or rejects pending bookings and shows their status history."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (overrides configuration)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log format (overrides configuration)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatArg>,

    /// Booking API base URL (overrides configuration)
    #[arg(long, env = "ROOMDESK_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Use built-in sample data instead of the API
    #[arg(long, global = true)]
    demo: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output: OutputFormat,

    /// Subcommand (defaults to `stats`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show dashboard statistics
    Stats,

    /// Manage rooms
    Rooms {
        #[command(subcommand)]
        action: RoomCommands,
    },

    /// Manage bookings
    Bookings {
        #[command(subcommand)]
        action: BookingCommands,
    },

    /// Browse booking status history
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Show the resolved configuration
    Config,
}

/// Search, sort and paging shared by the list commands
#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive search text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort direction (asc, desc); defaults per list
    #[arg(long)]
    sort: Option<SortDirection>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page (one of the configured options)
    #[arg(long)]
    page_size: Option<usize>,
}

/// Room commands
#[derive(Subcommand, Debug)]
enum RoomCommands {
    /// List rooms by name
    List(ListArgs),

    /// Create a room
    Create {
        /// Room name
        #[arg(long)]
        name: String,
        /// Capacity
        #[arg(long)]
        capacity: String,
        /// Description (configured default when omitted)
        #[arg(long)]
        description: Option<String>,
    },

    /// Update a room; omitted fields keep their value
    Update {
        /// Room id
        id: RoomId,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New capacity
        #[arg(long)]
        capacity: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a room; its bookings stay
    Delete {
        /// Room id
        id: RoomId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Booking commands
#[derive(Subcommand, Debug)]
enum BookingCommands {
    /// List bookings by start time
    List(ListArgs),

    /// Create a booking
    Create {
        /// Room id
        #[arg(long)]
        room: String,
        /// Borrower name
        #[arg(long)]
        borrower: String,
        /// Start, e.g. 2025-01-10T09:00
        #[arg(long)]
        start: String,
        /// End, e.g. 2025-01-10T11:00
        #[arg(long)]
        end: String,
    },

    /// Update a booking; omitted fields keep their value
    Update {
        /// Booking id
        id: BookingId,
        /// New room id
        #[arg(long)]
        room: Option<String>,
        /// New borrower name
        #[arg(long)]
        borrower: Option<String>,
        /// New start
        #[arg(long)]
        start: Option<String>,
        /// New end
        #[arg(long)]
        end: Option<String>,
    },

    /// Approve a pending booking
    Approve {
        /// Booking id
        id: BookingId,
    },

    /// Reject a pending booking
    Reject {
        /// Booking id
        id: BookingId,
    },

    /// Delete a booking
    Delete {
        /// Booking id
        id: BookingId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// History commands
#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// Last status change of every booking
    List(ListArgs),

    /// Every status change of one booking
    Show {
        /// Booking id
        id: BookingId,
    },
}

/// Main entry point for the administration tool
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(exit_code(&error))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    roomdesk_core::init_logging(&config.logging.level, config.logging.format)
        .map_err(AppError::from)
        .context("failed to initialise logging")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        demo = cli.demo,
        "roomdesk starting"
    );

    let command = cli.command.unwrap_or(Commands::Stats);
    if matches!(command, Commands::Config) {
        let shown = render::json(&redacted(&config)).map_err(AppError::from)?;
        println!("{shown}");
        return Ok(());
    }

    let gateway: Box<dyn Gateway> = if cli.demo {
        Box::new(InMemoryGateway::demo())
    } else {
        Box::new(HttpGateway::from_config(&config.api).map_err(AppError::from)?)
    };
    let gateway = gateway.as_ref();

    let mut state = AppState::new(&config)?;
    update(&mut state, gateway, Event::Refresh).await?;

    match command {
        Commands::Stats | Commands::Config => {
            emit(cli.output, &state.dashboard(), render::dashboard)
        }
        Commands::Rooms { action } => rooms(&mut state, gateway, action, cli.output).await,
        Commands::Bookings { action } => bookings(&mut state, gateway, action, cli.output).await,
        Commands::History { action } => history(&mut state, gateway, action, cli.output).await,
    }
}

/// Load configuration and apply command line overrides
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_from(path)?,
        None => Config::load().map_err(AppError::from)?,
    };

    if let Some(ref base_url) = cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }

    config.validate().map_err(AppError::from)?;
    Ok(config)
}

fn load_from(path: &Path) -> anyhow::Result<Config> {
    Config::load_from(path)
        .map_err(AppError::from)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.api.api_key.is_some() {
        shown.api.api_key = Some("***".to_string());
    }
    shown
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let out = match format {
        OutputFormat::Table => text(value),
        OutputFormat::Json => render::json(value).map_err(AppError::from)? + "\n",
    };
    print!("{out}");
    Ok(())
}

fn done(message: &str) {
    println!("{message}");
}

async fn open_list(
    state: &mut AppState,
    gateway: &dyn Gateway,
    tab: Tab,
    args: ListArgs,
) -> AppResult<()> {
    update(state, gateway, Event::SwitchTab(tab)).await?;
    if let Some(size) = args.page_size {
        update(state, gateway, Event::SetPageSize(size)).await?;
    }
    if !args.search.is_empty() {
        update(state, gateway, Event::Search(args.search)).await?;
    }
    if let Some(direction) = args.sort {
        update(state, gateway, Event::SetSort(direction)).await?;
    }
    update(state, gateway, Event::GoToPage(args.page)).await
}

async fn confirm_delete(
    state: &mut AppState,
    gateway: &dyn Gateway,
    target: DeleteTarget,
    prompt: &str,
    yes: bool,
) -> anyhow::Result<()> {
    update(state, gateway, Event::RequestDelete(target)).await?;

    if !yes && !ask(prompt)? {
        update(state, gateway, Event::CancelDelete).await?;
        return Err(AppError::Cancelled.into());
    }

    update(state, gateway, Event::ConfirmDelete).await?;
    Ok(())
}

fn ask(prompt: &str) -> io::Result<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "ya"
    ))
}

async fn rooms(
    state: &mut AppState,
    gateway: &dyn Gateway,
    action: RoomCommands,
    output: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        RoomCommands::List(args) => {
            open_list(state, gateway, Tab::Rooms, args).await?;
            emit(output, &state.rooms_view(), render::rooms)
        }
        RoomCommands::Create {
            name,
            capacity,
            description,
        } => {
            update(state, gateway, Event::NewRoom).await?;
            let fields = [
                (RoomField::Name, Some(name)),
                (RoomField::Capacity, Some(capacity)),
                (RoomField::Description, description),
            ];
            fill_room(state, gateway, fields).await?;
            update(state, gateway, Event::SubmitRoom).await?;
            done("Room created.");
            Ok(())
        }
        RoomCommands::Update {
            id,
            name,
            capacity,
            description,
        } => {
            update(state, gateway, Event::EditRoom(id)).await?;
            let fields = [
                (RoomField::Name, name),
                (RoomField::Capacity, capacity),
                (RoomField::Description, description),
            ];
            fill_room(state, gateway, fields).await?;
            update(state, gateway, Event::SubmitRoom).await?;
            done(&format!("Room {id} updated."));
            Ok(())
        }
        RoomCommands::Delete { id, yes } => {
            confirm_delete(
                state,
                gateway,
                DeleteTarget::Room(id),
                &format!("Delete room {id}?"),
                yes,
            )
            .await?;
            done(&format!("Room {id} deleted."));
            Ok(())
        }
    }
}

async fn fill_room(
    state: &mut AppState,
    gateway: &dyn Gateway,
    fields: [(RoomField, Option<String>); 3],
) -> AppResult<()> {
    for (field, value) in fields {
        if let Some(value) = value {
            update(state, gateway, Event::SetRoomField(field, value)).await?;
        }
    }
    Ok(())
}

async fn fill_booking(
    state: &mut AppState,
    gateway: &dyn Gateway,
    fields: [(BookingField, Option<String>); 4],
) -> AppResult<()> {
    for (field, value) in fields {
        if let Some(value) = value {
            update(state, gateway, Event::SetBookingField(field, value)).await?;
        }
    }
    Ok(())
}

async fn bookings(
    state: &mut AppState,
    gateway: &dyn Gateway,
    action: BookingCommands,
    output: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        BookingCommands::List(args) => {
            open_list(state, gateway, Tab::Bookings, args).await?;
            emit(output, &state.bookings_view(), render::bookings)
        }
        BookingCommands::Create {
            room,
            borrower,
            start,
            end,
        } => {
            update(state, gateway, Event::NewBooking).await?;
            let fields = [
                (BookingField::RoomId, Some(room)),
                (BookingField::BorrowerName, Some(borrower)),
                (BookingField::BookingDate, Some(start)),
                (BookingField::EndTime, Some(end)),
            ];
            fill_booking(state, gateway, fields).await?;
            update(state, gateway, Event::SubmitBooking).await?;
            done("Booking created.");
            Ok(())
        }
        BookingCommands::Update {
            id,
            room,
            borrower,
            start,
            end,
        } => {
            update(state, gateway, Event::EditBooking(id)).await?;
            let fields = [
                (BookingField::RoomId, room),
                (BookingField::BorrowerName, borrower),
                (BookingField::BookingDate, start),
                (BookingField::EndTime, end),
            ];
            fill_booking(state, gateway, fields).await?;
            update(state, gateway, Event::SubmitBooking).await?;
            done(&format!("Booking {id} updated."));
            Ok(())
        }
        BookingCommands::Approve { id } => {
            set_status(state, gateway, id, BookingStatus::Approved).await
        }
        BookingCommands::Reject { id } => {
            set_status(state, gateway, id, BookingStatus::Rejected).await
        }
        BookingCommands::Delete { id, yes } => {
            confirm_delete(
                state,
                gateway,
                DeleteTarget::Booking(id),
                &format!("Delete booking {id}?"),
                yes,
            )
            .await?;
            done(&format!("Booking {id} deleted."));
            Ok(())
        }
    }
}

async fn set_status(
    state: &mut AppState,
    gateway: &dyn Gateway,
    id: BookingId,
    status: BookingStatus,
) -> anyhow::Result<()> {
    update(state, gateway, Event::ChangeStatus(id, status)).await?;
    debug!(booking_id = id, %status, "status change applied");
    done(&format!("Booking {id} is now {status}."));
    Ok(())
}

async fn history(
    state: &mut AppState,
    gateway: &dyn Gateway,
    action: HistoryCommands,
    output: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        HistoryCommands::List(args) => {
            open_list(state, gateway, Tab::History, args).await?;
            emit(output, &state.history_view_rows(), render::history)
        }
        HistoryCommands::Show { id } => {
            update(state, gateway, Event::ShowHistory(id)).await?;
            let detail = state
                .history_detail()
                .ok_or_else(|| AppError::unknown_booking(id))?;
            emit(output, &detail, render::history_detail)
        }
    }
}
