use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wewravel_app::auth::{greeting, logout, LoginController, SignupController};
use wewravel_app::{render, AppError, AppState, AuthError, Navigator, Route, Screen};
use wewravel_order::CheckoutError;
use wewravel_shared::{SessionEvent, TripId};
use wewravel_store::app_config::Config;
use wewravel_store::{FileSessionStorage, SessionStore};

#[derive(Parser)]
#[command(name = "wewravel")]
#[command(about = "Browse WeWravel trips, book one and pay the deposit")]
struct Cli {
    /// Use the built-in demo catalog and a gateway that always pays.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Trips {
        #[arg(long)]
        search: Option<String>,
    },
    Trip {
        id: TripId,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Dashboard,
    Book {
        trip_id: TripId,
        #[arg(long)]
        room: String,
        #[arg(long, default_value_t = 1)]
        travelers: u32,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long)]
        request: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wewravel_app=info,wewravel_order=info,wewravel_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config")?;

    let state = if cli.offline {
        tracing::info!("Running offline against the demo catalog");
        let session = SessionStore::restore(Arc::new(FileSessionStorage::new(
            &config.session.storage_path,
        )));
        AppState::offline(config, session)
    } else {
        tracing::info!("Using backend at {}", config.backend.base_url);
        AppState::connect(config)?
    };

    let banner = watch_session(state.session.clone());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = run(cli.command, &state, &cancel).await;
    banner.abort();
    result
}

/// Navbar-style listener: follows login and logout as they happen.
fn watch_session(session: SessionStore) -> tokio::task::JoinHandle<()> {
    let mut events = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::LoggedIn { user_id, .. } => {
                    tracing::info!("[{}] signed in as user {}", greeting(&session), user_id)
                }
                SessionEvent::LoggedOut => tracing::info!("[{}] signed out", greeting(&session)),
            }
        }
    })
}

async fn run(command: Commands, state: &AppState, cancel: &CancellationToken) -> anyhow::Result<()> {
    let mut nav = Navigator::new(state.clone());
    let helpline = state.helpline().to_string();

    match command {
        Commands::Trips { search } => {
            let screen = nav.navigate(Route::Trips { search }, cancel).await?;
            print!("{}", render::screen(&screen, &helpline));
        }
        Commands::Trip { id } => {
            let screen = nav.navigate(Route::TripDetail { id }, cancel).await?;
            print!("{}", render::screen(&screen, &helpline));
        }
        Commands::Signup { name, contact, email, password } => {
            let signup = SignupController::new(state.auth.clone());
            match signup.submit(&name, &contact, &email, &password, cancel).await {
                Ok(route) => {
                    let screen = nav.navigate(route, cancel).await?;
                    print!("{}", render::screen(&screen, &helpline));
                }
                Err(err) => report_auth_error(err, &helpline)?,
            }
        }
        Commands::Login { email, password } => {
            let mut login = LoginController::new(state.auth.clone(), state.session.clone());
            match login.submit(&email, &password, cancel).await {
                Ok((_, route)) => {
                    println!("{}", greeting(&state.session));
                    let screen = nav.navigate(route, cancel).await?;
                    print!("{}", render::screen(&screen, &helpline));
                }
                Err(err) => report_auth_error(err, &helpline)?,
            }
        }
        Commands::Logout => {
            let route = logout(&state.session)?;
            let screen = nav.navigate(route, cancel).await?;
            print!("{}", render::screen(&screen, &helpline));
        }
        Commands::Dashboard => {
            let screen = nav.navigate(Route::Dashboard, cancel).await?;
            print!("{}", render::screen(&screen, &helpline));
        }
        Commands::Book { trip_id, room, travelers, start_date, request } => {
            let trip = state.catalog().get_trip(trip_id, cancel).await?;
            let mut form = match nav.navigate(Route::book(&trip), cancel).await? {
                Screen::Booking(form) => form,
                other => {
                    print!("{}", render::screen(&other, &helpline));
                    return Ok(());
                }
            };

            form.set_room_type(&room).map_err(CheckoutError::from)?;
            form.set_travelers(travelers).map_err(CheckoutError::from)?;
            form.set_start_date(Some(start_date));
            if let Some(request) = request {
                form.set_special_request(request);
            }
            print!("{}", render::booking_form(&form));

            let view = state.checkout().run(&form, cancel).await?;
            let screen = nav.show_status(view);
            print!("{}", render::screen(&screen, &helpline));
        }
    }
    Ok(())
}

fn report_auth_error(err: AuthError, helpline: &str) -> anyhow::Result<()> {
    if let AuthError::Fields(errors) = &err {
        eprint!("{}", render::field_errors(errors));
    }
    if err.offers_reset() {
        eprintln!("Forgot your password? Call {} to reset it.", helpline);
    }
    Err(AppError::from(err).into())
}
