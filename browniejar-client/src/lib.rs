use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use browniejar_shared::api::rest::RestError;
use browniejar_shared::domain::{RewardId, TaskId, TaskKind};
use tokio::time::sleep;
use tracing::{error, info, warn};

pub mod cli;
pub mod config;
pub mod gateway;
pub mod login;
pub mod partner;
pub mod points;
pub mod redeem;
pub mod rewards;
pub mod session;
pub mod state;
pub mod stats;
pub mod sync;
pub mod tasks;

pub use cli::{Cli, Command, PartnerAction, RewardAction, TaskAction};
pub use config::{ClientConfig, load_config, resolve_config_path};
pub use state::{App, Snapshot};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("not signed in; run `browniejar login`")]
    AuthRequired,
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("insufficient points: need {needed}, have {available}")]
    InsufficientPoints { needed: i32, available: i32 },
    #[error("gateway error: {0}")]
    Remote(#[from] RestError),
    #[error("partner link inconsistent: {0}")]
    PartialLink(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("keyring error: {0}")]
    Keyring(String),
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn keyring_entry(service_url: &str) -> Result<keyring::Entry, AppError> {
    let service = "browniejar";
    keyring::Entry::new(service, &crate::config::normalize_service_url(service_url))
        .map_err(|e| AppError::Keyring(e.to_string()))
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing();

    match cli.command {
        Some(Command::Login { service, email }) => login::login(service, email, cli.config).await,
        Some(Command::Signup {
            service,
            email,
            name,
        }) => login::signup(service, email, name, cli.config).await,
        Some(Command::Logout) => login::logout(cli.config),
        Some(Command::Status { json }) => {
            let (app, _cfg) = open_app(cli.config)?;
            app.refresh().await?;
            print_status(&app.snapshot(), json)
        }
        Some(Command::Task { action }) => {
            let (app, _cfg) = open_app(cli.config)?;
            run_task(&app, action).await
        }
        Some(Command::Gift { points, message }) => {
            let (app, _cfg) = open_app(cli.config)?;
            app.refresh().await?;
            let point = app.gift_points(points, &message).await?;
            println!("Gifted {} point(s) to your partner", point.points);
            Ok(())
        }
        Some(Command::Reward { action }) => {
            let (app, _cfg) = open_app(cli.config)?;
            run_reward(&app, action).await
        }
        Some(Command::Partner { action }) => {
            let (app, _cfg) = open_app(cli.config)?;
            run_partner(&app, action).await
        }
        None => {
            let (app, cfg) = open_app(cli.config)?;
            watch(app, &cfg).await
        }
    }
}

/// Config + saved session + production gateway, wired into an [`App`].
fn open_app(config_arg: Option<PathBuf>) -> Result<(Arc<App>, ClientConfig), AppError> {
    let (cfg_path, cfg) = config::find_and_load(config_arg)?;
    info!(path = ?cfg_path, "loaded config");
    let session = session::load(&cfg)?;
    let gateway = Arc::new(gateway::RestGateway::new(&cfg, &session));
    Ok((Arc::new(App::new(gateway, session)), cfg))
}

async fn run_task(app: &App, action: TaskAction) -> Result<(), AppError> {
    app.refresh().await?;
    match action {
        TaskAction::Submit {
            title,
            kind,
            rating,
        } => {
            let kind = parse_task_kind(&kind)?;
            let task = app.submit_task(&title, kind, rating).await?;
            println!(
                "Submitted \"{}\" ({} point(s) when approved)",
                task.title,
                stats::points_for_rating(task.rating)
            );
        }
        TaskAction::Approve { task_id } => {
            app.approve_task(&TaskId::from(task_id.as_str())).await?;
            println!("Task approved");
        }
        TaskAction::Reject { task_id, comment } => {
            app.reject_task(&TaskId::from(task_id.as_str()), &comment)
                .await?;
            println!("Task rejected");
        }
        TaskAction::Delete { task_id } => {
            app.delete_task(&TaskId::from(task_id.as_str())).await?;
            println!("Task deleted");
        }
    }
    Ok(())
}

async fn run_reward(app: &App, action: RewardAction) -> Result<(), AppError> {
    app.refresh().await?;
    match action {
        RewardAction::Add {
            title,
            cost,
            description,
            icon,
        } => {
            let reward = app.create_reward(&title, &description, cost, &icon).await?;
            println!("Added reward \"{}\" ({} pts)", reward.title, reward.points_cost);
        }
        RewardAction::Redeem { reward_id } => {
            app.redeem_reward(&RewardId::from(reward_id.as_str()))
                .await?;
            println!(
                "Reward redeemed; {} point(s) left",
                app.snapshot().available_points
            );
        }
        RewardAction::Delete { reward_id } => {
            app.delete_reward(&RewardId::from(reward_id.as_str()))
                .await?;
            println!("Reward deleted");
        }
    }
    Ok(())
}

async fn run_partner(app: &App, action: PartnerAction) -> Result<(), AppError> {
    app.refresh().await?;
    match action {
        PartnerAction::Link { email } => {
            let partner = app.link_partner(&email).await?;
            println!("Linked with {} <{}>", partner.name, partner.email);
        }
        PartnerAction::Unlink => {
            app.unlink_partner().await?;
            println!("Partner link removed");
        }
    }
    Ok(())
}

fn parse_task_kind(input: &str) -> Result<TaskKind, AppError> {
    match input.to_ascii_lowercase().as_str() {
        "mental" => Ok(TaskKind::Mental),
        "physical" => Ok(TaskKind::Physical),
        "both" => Ok(TaskKind::Both),
        other => Err(AppError::Validation(format!("unknown task kind: {other}"))),
    }
}

fn print_status(snap: &Snapshot, json: bool) -> Result<(), AppError> {
    if json {
        let out = serde_json::to_string_pretty(snap)
            .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?;
        println!("{out}");
        return Ok(());
    }
    let name = snap
        .current_user
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or("?");
    match &snap.partner {
        Some(p) => println!("{name} + {}", p.name),
        None => println!("{name} (no partner linked yet)"),
    }
    println!(
        "Points: {} available, {} earned all-time",
        snap.available_points, snap.total_points_earned
    );
    let s = &snap.summary;
    println!(
        "This week: {} pts earned, {} task(s) by you / {} by your partner ({}% yours), {} mental / {} physical",
        s.points_this_week,
        s.user_task_count,
        s.partner_task_count,
        s.user_contribution,
        s.mental_tasks,
        s.physical_tasks
    );
    if !snap.pending_tasks.is_empty() {
        println!("Awaiting your review:");
        for t in &snap.pending_tasks {
            println!("  {}  {} (rated {}/10)", t.id, t.title, t.rating);
        }
    }
    if !snap.my_pending_tasks.is_empty() {
        println!("Waiting on your partner:");
        for t in &snap.my_pending_tasks {
            println!("  {}  {}", t.id, t.title);
        }
    }
    if !snap.rewards.is_empty() {
        println!("Rewards:");
        for r in &snap.rewards {
            println!("  {}  {} ({} pts)", r.id, r.title, r.points_cost);
        }
    }
    Ok(())
}

/// Periodic refresh until SIGINT/SIGTERM.
async fn watch(app: Arc<App>, cfg: &ClientConfig) -> Result<(), AppError> {
    let every = Duration::from_secs(cfg.refresh_secs.max(1));
    info!(interval_secs = every.as_secs(), "watching the jar");

    let worker = app.clone();
    let mut handle = tokio::spawn(async move {
        loop {
            match worker.refresh().await {
                Ok(()) => {
                    let snap = worker.snapshot();
                    info!(
                        available = snap.available_points,
                        to_review = snap.pending_tasks.len(),
                        waiting = snap.my_pending_tasks.len(),
                        "state refreshed"
                    );
                }
                Err(AppError::Remote(RestError::Status { status: 401, .. })) => {
                    error!("gateway rejected the session token; run `browniejar login` again");
                    break;
                }
                Err(e) => warn!(error = %e, "refresh failed; keeping last known state"),
            }
            sleep(every).await;
        }
    });

    tokio::select! {
        _ = shutdown_signal() => {
            info!("shutdown signal received");
            handle.abort();
        }
        _ = &mut handle => {}
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
        tokio::select! {
            _ = sigint.recv() => {
                info!("shutdown: received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("shutdown: received SIGTERM");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown: received Ctrl+C");
    }
}
