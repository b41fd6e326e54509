//! CLI Commands
//!
//! Handlers behind each `ems` subcommand. Results are printed to stdout as
//! pretty JSON.

use std::sync::PoisonError;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::auth::LoginRequest;
use crate::api::equipment::EquipmentQuery;
use crate::cli::{Command, EquipmentArgs, LoginArgs, NavigateArgs, ThemeAction};
use crate::device::DeviceDetection;
use crate::theme::Theme;
use crate::EmsContext;

/// Run one subcommand against the context
pub async fn dispatch(ctx: &EmsContext, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => login(ctx, args).await,
        Command::Logout => logout(ctx).await,
        Command::Me => me(ctx).await,
        Command::Refresh => refresh(ctx).await,
        Command::Dashboard => dashboard(ctx).await,
        Command::Equipment(args) => equipment(ctx, args).await,
        Command::Qr { code } => qr_lookup(ctx, &code).await,
        Command::Repairs => my_repairs(ctx).await,
        Command::Alerts => low_stock_alerts(ctx).await,
        Command::Knowledge { keyword } => knowledge_search(ctx, &keyword).await,
        Command::Navigate(args) => navigate(ctx, args).await,
        Command::Theme { action } => theme(ctx, action),
        Command::Device { width } => device(ctx, width),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{text}");
    Ok(())
}

async fn login(ctx: &EmsContext, args: LoginArgs) -> Result<()> {
    let username = args.username.unwrap_or_else(whoami::username);
    info!("Logging in as {}", username);

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {username}: "))
            .context("failed to read password")?,
    };

    let response = ctx
        .session
        .lock()
        .await
        .login(&LoginRequest::new(username, password))
        .await
        .context("login failed")?;

    if response.must_change_password || response.user_info.must_change_password {
        warn!("Password change required for {}", response.user_info.username);
        eprintln!("note: the server requires a password change for this account");
    }

    print_json(&json!({
        "user": &response.user_info,
        "expires_at": response.expires_at().map(|at| at.to_rfc3339()),
    }))
}

async fn logout(ctx: &EmsContext) -> Result<()> {
    let mut session = ctx.session.lock().await;
    let was_logged_in = session.is_logged_in();
    session.logout().context("failed to clear session")?;

    print_json(&json!({ "logged_out": was_logged_in }))
}

async fn me(ctx: &EmsContext) -> Result<()> {
    let user = ctx
        .session
        .lock()
        .await
        .get_user_info()
        .await
        .context("failed to fetch profile")?;
    print_json(&user)
}

async fn refresh(ctx: &EmsContext) -> Result<()> {
    let token = ctx
        .session
        .lock()
        .await
        .refresh_token()
        .await
        .context("failed to refresh token")?;

    debug!("Token refreshed ({} chars)", token.len());
    print_json(&json!({ "refreshed": true }))
}

async fn dashboard(ctx: &EmsContext) -> Result<()> {
    let overview = ctx
        .api
        .analytics()
        .get_dashboard_overview()
        .await
        .context("failed to load dashboard")?;
    print_json(&overview)
}

async fn equipment(ctx: &EmsContext, args: EquipmentArgs) -> Result<()> {
    let query = EquipmentQuery {
        page: args.page,
        page_size: args.page_size,
        code: args.code,
        name: args.name,
        status: args.status,
        ..EquipmentQuery::default()
    };

    let list = ctx
        .api
        .equipment()
        .get_list(&query)
        .await
        .context("failed to list equipment")?;
    print_json(&list)
}

async fn qr_lookup(ctx: &EmsContext, code: &str) -> Result<()> {
    let equipment = ctx
        .api
        .equipment()
        .get_by_qr_code(code)
        .await
        .with_context(|| format!("no equipment for QR code {code}"))?;
    print_json(&equipment)
}

async fn my_repairs(ctx: &EmsContext) -> Result<()> {
    let orders = ctx
        .api
        .repair()
        .get_my_tasks()
        .await
        .context("failed to load repair tasks")?;
    print_json(&orders)
}

async fn low_stock_alerts(ctx: &EmsContext) -> Result<()> {
    let alerts = ctx
        .api
        .spareparts()
        .get_low_stock_alerts()
        .await
        .context("failed to load stock alerts")?;
    print_json(&alerts)
}

async fn knowledge_search(ctx: &EmsContext, keyword: &str) -> Result<()> {
    let articles = ctx
        .api
        .knowledge()
        .search(keyword)
        .await
        .context("knowledge search failed")?;
    print_json(&articles)
}

async fn navigate(ctx: &EmsContext, args: NavigateArgs) -> Result<()> {
    let route = ctx
        .navigate(&args.path, args.force)
        .await
        .with_context(|| format!("cannot navigate to {}", args.path))?;
    print_json(&route)
}

fn theme(ctx: &EmsContext, action: ThemeAction) -> Result<()> {
    let mut store = ctx.theme.lock().unwrap_or_else(PoisonError::into_inner);

    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => store.toggle_theme(),
        ThemeAction::Light => store.set_theme(Theme::Light),
        ThemeAction::Dark => store.set_theme(Theme::Dark),
    }

    print_json(&json!({ "theme": store.theme() }))
}

fn device(ctx: &EmsContext, width: u32) -> Result<()> {
    let detection = DeviceDetection::mount(&ctx.viewport);
    ctx.viewport.resize(width);
    let info = detection.device();
    detection.unmount();

    print_json(&info)
}
