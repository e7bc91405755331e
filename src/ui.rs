// src/ui.rs
// =============================================================================
// Terminal output helpers: colored status lines, the decorative scan/progress
// animations, and prompts.
//
// The animations only pass time. They never affect what a command does, and
// --no-animations turns them off entirely.
// =============================================================================

use anyhow::Result;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const RADAR_FRAMES: &[&str] = &[
    "[◐] Scanning target...",
    "[◓] Scanning target...",
    "[◑] Scanning target...",
    "[◒] Scanning target...",
    "[✦] Triangulating signals...",
    "[✸] Checking metadata...",
    "[✹] Collecting intelligence...",
    "[✦] Finalizing OSINT...",
];

const RADAR_TICK: Duration = Duration::from_millis(120);
const HEARTBEAT_TICK: Duration = Duration::from_millis(350);
const PROGRESS_STEPS: u64 = 30;

#[derive(Debug, Clone, Copy)]
pub struct Ui {
    animations: bool,
}

impl Ui {
    pub fn new(animations: bool) -> Self {
        Self { animations }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        println!("{}", style(message.as_ref()).green());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        println!("{}", style(message.as_ref()).yellow());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        println!("{}", style(message.as_ref()).red());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        println!("{}", style(message.as_ref()).blue());
    }

    // Rotating radar frames for `duration`, then "Scan Completed"
    pub async fn radar_scan(&self, duration: Duration) {
        if self.animations {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{msg:.cyan}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );

            let ticks = (duration.as_millis() / RADAR_TICK.as_millis()).max(1) as usize;
            for frame in RADAR_FRAMES.iter().cycle().take(ticks) {
                spinner.set_message(*frame);
                tokio::time::sleep(RADAR_TICK).await;
            }
            spinner.finish_and_clear();
        }
        self.success("[✔] Scan Completed.");
    }

    // A bar that fills over `duration`
    pub async fn progress_bar(&self, task: &str, duration: Duration) {
        if !self.animations {
            return;
        }

        let bar = ProgressBar::new(PROGRESS_STEPS);
        bar.set_style(
            ProgressStyle::with_template("{msg:.yellow}: [{bar:30.yellow}] {percent}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█ ."),
        );
        bar.set_message(task.to_string());

        let interval = (duration / PROGRESS_STEPS as u32).max(Duration::from_millis(10));
        for _ in 0..PROGRESS_STEPS {
            tokio::time::sleep(interval).await;
            bar.inc(1);
        }
        bar.finish();
    }

    // Short pulse used before external lookups
    pub async fn heartbeat(&self, text: &str) {
        if self.animations {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{msg:.cyan}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            for _ in 0..3 {
                spinner.set_message(format!("▮▯ {text} ▯▮"));
                tokio::time::sleep(HEARTBEAT_TICK).await;
                spinner.set_message(format!("▯▮ {text} ▮▯"));
                tokio::time::sleep(HEARTBEAT_TICK).await;
            }
            spinner.finish_and_clear();
        }
        self.success(format!("[✔] {text} - Done."));
    }

    // Spinner with a counter for real work, like media downloads
    pub fn work_spinner(&self, prefix: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {prefix} [{pos} items] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_prefix(prefix.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

pub fn clear_screen() {
    let _ = Term::stdout().clear_screen();
}

// Set while a hidden password is being read, so Ctrl-C can turn echo back on
static SECRET_PROMPT_ACTIVE: AtomicBool = AtomicBool::new(false);

// Prints `label` and reads one line; None on EOF
//
// The read runs on the blocking pool so the runtime can still see Ctrl-C.
pub async fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let line = tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map(|read| (read > 0).then_some(input))
    })
    .await??;
    Ok(line.map(|input| input.trim().to_string()))
}

// Reads a line without echoing it
pub async fn prompt_secret(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    SECRET_PROMPT_ACTIVE.store(true, Ordering::SeqCst);
    let line = tokio::task::spawn_blocking(|| Term::stdout().read_secure_line()).await;
    SECRET_PROMPT_ACTIVE.store(false, Ordering::SeqCst);
    Ok(line??)
}

// Undoes what an interrupted spinner or password prompt left behind
pub fn restore_terminal() {
    let _ = Term::stdout().show_cursor();

    if SECRET_PROMPT_ACTIVE.swap(false, Ordering::SeqCst) && cfg!(unix) {
        let _ = std::process::Command::new("stty")
            .arg("echo")
            .stdin(std::process::Stdio::inherit())
            .status();
    }
}
