// src/menu/mod.rs
// =============================================================================
// The interactive menu loop.
//
// How it works:
// 1. Clear the screen and print the banner and the numbered options
// 2. Read a choice from stdin
// 3. Run the matching handler (see handlers.rs)
// 4. Print any error, wait for Enter, repeat
//
// Option 0, end of input (Ctrl-D) or Ctrl-C end the program. Ctrl-C is caught
// so the terminal is restored and the goodbye line still gets printed.
//
// Rust concepts:
// - Enums: MenuChoice turns "1".."7" into something we can match on
// - &mut borrows: handlers get temporary, exclusive access to the session
// =============================================================================

mod context;
mod handlers;
mod session;

use anyhow::Result;
use console::style;
use std::future::Future;
use std::io;
use tracing::debug;

use context::Context;
use session::Session;

use crate::config::Settings;
use crate::ui::{clear_screen, prompt, restore_terminal};

// The options of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Analyze,
    Download,
    Report,
    Zip,
    SetLogin,
    SetHibpKey,
    Summary,
    Exit,
}

impl MenuChoice {
    // Parses what the user typed; surrounding spaces are ignored
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Analyze),
            "2" => Some(Self::Download),
            "3" => Some(Self::Report),
            "4" => Some(Self::Zip),
            "5" => Some(Self::SetLogin),
            "6" => Some(Self::SetHibpKey),
            "7" => Some(Self::Summary),
            "0" => Some(Self::Exit),
            _ => None,
        }
    }
}

// Runs the menu until the user exits or presses Ctrl-C
pub async fn run(settings: Settings) -> Result<()> {
    until_interrupted(run_loop(settings), tokio::signal::ctrl_c()).await
}

// Whichever finishes first wins. If the signal handler can't be installed
// the menu simply runs without it.
async fn until_interrupted<M, I>(menu: M, interrupt: I) -> Result<()>
where
    M: Future<Output = Result<()>>,
    I: Future<Output = io::Result<()>>,
{
    tokio::select! {
        result = menu => result,
        Ok(()) = interrupt => {
            restore_terminal();
            println!("\nExiting.");
            Ok(())
        }
    }
}

async fn run_loop(settings: Settings) -> Result<()> {
    let mut ctx = Context::new(settings)?;
    let mut session = Session::new(&ctx.settings);

    loop {
        print_menu();

        let label = format!("{} ", style("✅  Choose an option>>>").yellow());
        let Some(input) = prompt(&label).await? else {
            println!("\nExiting.");
            return Ok(());
        };

        match MenuChoice::parse(&input) {
            Some(MenuChoice::Exit) => {
                println!("{}", style("⚠️  STAY INVISIBLE & ETHICAL ⚠️").red());
                return Ok(());
            }
            Some(choice) => {
                debug!(?choice, "running menu action");
                if let Err(e) = dispatch(choice, &mut ctx, &mut session).await {
                    // {:#} prints the whole context chain on one line
                    ctx.ui.error(format!("{:#}", e));
                }
            }
            None => println!("Invalid option❌"),
        }

        let pause = format!("\n{}", style("Press Enter to continue...").cyan());
        if prompt(&pause).await?.is_none() {
            println!("\nExiting.");
            return Ok(());
        }
    }
}

async fn dispatch(choice: MenuChoice, ctx: &mut Context, session: &mut Session) -> Result<()> {
    match choice {
        MenuChoice::Analyze => handlers::analyze(ctx, session).await,
        MenuChoice::Download => handlers::download(ctx, session).await,
        MenuChoice::Report => handlers::report(ctx, session).await,
        MenuChoice::Zip => handlers::zip(ctx, session).await,
        MenuChoice::SetLogin => handlers::set_login(ctx, session).await,
        MenuChoice::SetHibpKey => handlers::set_hibp_key(ctx, session).await,
        MenuChoice::Summary => handlers::show_summary(ctx, session).await,
        MenuChoice::Exit => Ok(()),
    }
}

fn print_menu() {
    clear_screen();
    print_banner();

    let rule = style("====================================================").yellow();
    println!("{rule}\n");
    println!(
        " {} {}\n",
        style("📌 FIRST RUN OPTION 1:").red(),
        style("FETCH METADATA 📌").green()
    );
    println!("{rule}\n");

    println!("{}\n", style("⚔️  TOOLS MENU:📃").blue());
    let entries = [
        "1️⃣   Analyze Instagram profile 🔎 (Fetch Metadata)",
        "2️⃣   Download posts & reels for a Profile 📩",
        "3️⃣   Generate PDF report for last fetched profile 📂",
        "4️⃣   Create ZIP of downloaded media for last profile 🗂️",
        "5️⃣   Set Instagram login 🌐 (for private profile access🛡️ )",
        "6️⃣   HIBP breach check (optional API key 🗝️  )",
        "7️⃣   Show last fetched profile summary 🔁",
    ];
    for entry in entries {
        println!("{}", style(entry).green());
    }
    println!("\n{}\n", style("0️⃣   Exit↩️").red());
}

fn print_banner() {
    let banner = r#"
  ___ ____        ___  ____ ___ _   _ _____
 |_ _/ ___|      / _ \/ ___|_ _| \ | |_   _|
  | | |  _ _____| | | \___ \| ||  \| | | |
  | | |_| |_____| |_| |___) | || |\  | | |
 |___\____|      \___/|____/___|_| \_| |_|
"#;
    println!("{}", style(banner).red());
    println!(
        "{}\n",
        style("        ⚔  Instagram OSINT framework  ⚔").red()
    );
}
