// src/menu/handlers.rs
// =============================================================================
// One function per menu entry.
//
// Every handler returns anyhow::Result<()>. An Err ends the current action
// only: the menu loop prints it and shows the menu again.
//
// Handlers that need a fetched profile fail with "No profile fetched. Run
// option 1 first." when there is none.
// =============================================================================

use anyhow::{anyhow, Context as _, Result};
use std::time::Duration;
use tracing::info;

use super::context::Context;
use super::session::Session;
use crate::archive::zip_folder;
use crate::breach::check_breaches;
use crate::config::Credentials;
use crate::instagram::{download_media, extract_username, suggest_usernames};
use crate::report::{
    generate_reports, short_summary_rows, summary_rows, table, PdfAssets, ReportData,
};
use crate::ui::{prompt, prompt_secret};

const TABLE_HEADERS: [&str; 2] = ["Field", "Value"];

// 1. Analyze Instagram profile (fetch metadata)
pub async fn analyze(ctx: &mut Context, session: &mut Session) -> Result<()> {
    let Some(input) = prompt("🔗 Enter Instagram profile URL or username: ").await? else {
        return Ok(());
    };
    let username = extract_username(&input).ok_or_else(|| anyhow!("Invalid input."))?;

    println!("Fetching profile metadata...");
    ctx.ui.radar_scan(Duration::from_secs(3)).await;
    fetch_and_store(ctx, session, &username).await?;

    ctx.ui
        .success("\nProfile fetched and stored in session (use other menu options).");
    Ok(())
}

// Fetches `username` and makes it the session's profile
//
// On failure the previously stored profile stays in place.
async fn fetch_and_store(ctx: &mut Context, session: &mut Session, username: &str) -> Result<()> {
    ctx.ensure_login(session).await;

    let profile = ctx
        .client
        .fetch_profile(username)
        .await
        .context("Failed to fetch profile")?;

    println!(
        "\n{}",
        table::fancy_grid(&TABLE_HEADERS, &summary_rows(&profile.summary))
    );
    info!(username = profile.username(), "profile stored in session");
    session.store_profile(profile);
    Ok(())
}

// 2. Download posts & reels for the last profile
pub async fn download(ctx: &mut Context, session: &mut Session) -> Result<()> {
    session.require_profile()?;
    ctx.ensure_login(session).await;

    let profile = session.require_profile()?;
    let username = profile.username();
    let target = ctx.settings.profile_downloads(username);

    ctx.ui.info(format!(
        "Downloading media for @{username} into {} ...",
        target.display()
    ));
    ctx.ui.radar_scan(Duration::from_secs(4)).await;

    let spinner = ctx.ui.work_spinner("Downloading");
    let result = download_media(&ctx.client, profile, &target, &spinner).await;
    spinner.finish_and_clear();

    let report = result.context("Download failed")?;
    ctx.ui.success(format!(
        "Download completed: {} ({} saved, {} already present)",
        report.folder.display(),
        report.saved,
        report.skipped
    ));
    Ok(())
}

// 3. Generate PDF/TXT/JSON report for the last profile
pub async fn report(ctx: &mut Context, session: &mut Session) -> Result<()> {
    let profile = session.require_profile()?;
    let username = profile.username().to_string();

    if session.hibp_api_key().is_some() {
        ctx.ui.heartbeat("Querying breach DB").await;
    }
    let breach_status = check_breaches(&username, session.hibp_api_key()).await;

    let data = ReportData {
        profile: profile.summary.clone(),
        breach_status,
    };

    ctx.ui.radar_scan(Duration::from_secs(2)).await;
    ctx.ui
        .progress_bar("Generating PDF report", Duration::from_secs(2))
        .await;

    let font_dir = std::env::current_dir().context("Cannot read the working directory")?;
    let assets = PdfAssets::discover(&font_dir, &ctx.settings.profile_downloads(&username));
    let paths = generate_reports(&data, &username, &ctx.settings.reports_dir, &assets)
        .context("PDF generation failed")?;

    ctx.ui
        .success(format!("PDF generated: {}", paths.pdf.display()));
    println!("TXT:  {}", paths.txt.display());
    println!("JSON: {}", paths.json.display());
    Ok(())
}

// 4. Create ZIP of downloaded media for the last profile
pub async fn zip(ctx: &mut Context, session: &mut Session) -> Result<()> {
    let username = session.require_profile()?.username();
    let folder = ctx.settings.profile_downloads(username);

    if !folder.is_dir() {
        return Err(anyhow!("No downloads found at: {}", folder.display()));
    }

    let archive = zip_folder(&folder, &ctx.settings.media_archive_base(username))
        .context("ZIP creation failed")?;
    ctx.ui
        .success(format!("Created ZIP archive: {}", archive.display()));
    Ok(())
}

// 5. Set Instagram login (for private profile access)
pub async fn set_login(ctx: &mut Context, session: &mut Session) -> Result<()> {
    let user = prompt("Enter Instagram username (leave blank to clear): ")
        .await?
        .unwrap_or_default();

    // Any change of login starts from a fresh cookie jar
    ctx.reset_client()?;

    if user.is_empty() {
        session.set_login(None);
        println!("Cleared stored login.");
        return Ok(());
    }

    let password = prompt_secret("Enter password (input hidden): ").await?;
    let creds = Credentials {
        username: user,
        password,
    };
    session.set_login(Some(creds.clone()));

    ctx.ui.heartbeat("Establishing secure channel").await;
    if let Err(e) = ctx.client.login(&creds.username, &creds.password).await {
        ctx.ui.warn(format!(
            "Login failed: {e}. The login is kept and will be retried on the next request."
        ));
        return Ok(());
    }

    match ctx.client.check_login().await {
        Ok(name) => ctx
            .ui
            .success(format!("Login successful, session belongs to @{name}.")),
        Err(_) => ctx.ui.warn(
            "Could not fully verify login; it may still work for downloads.",
        ),
    }
    Ok(())
}

// 6. Set (or clear) the HIBP API key
pub async fn set_hibp_key(_ctx: &mut Context, session: &mut Session) -> Result<()> {
    let key = prompt("Enter HIBP API key (leave blank to clear): ")
        .await?
        .unwrap_or_default();
    session.set_hibp_api_key(&key);

    if session.hibp_api_key().is_some() {
        println!("HIBP API key set (will be used for breach checks).");
    } else {
        println!("HIBP key cleared.");
    }
    Ok(())
}

// 7. Show last fetched profile summary
pub async fn show_summary(ctx: &mut Context, session: &mut Session) -> Result<()> {
    let Some(profile) = session.last_profile() else {
        ctx.ui.warn("No profile fetched yet.");
        return Ok(());
    };

    println!(
        "\n{}",
        table::fancy_grid(&TABLE_HEADERS, &short_summary_rows(&profile.summary))
    );
    println!(
        "Suggested usernames: {}",
        suggest_usernames(profile.username()).join(", ")
    );
    Ok(())
}
