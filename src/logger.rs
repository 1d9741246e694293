//! Terminal output for the editor.
//!
//! - `log!("module"; ...)` prints one line behind a colored `[module]` tag;
//!   `error` and `warning` go to stderr, everything else to stdout
//! - `debug!` does the same, only with `--verbose`
//! - `WatchStatus` keeps a single overwriting status block for `vise watch`
//!
//! ```ignore
//! log!("patch"; "rewrote {} in {}", property, path);
//! debug!("link"; "dropped frame from {}", sender);
//! ```

use std::io::{self, Write};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{AnsiColors, OwoColorize, Style};
use parking_lot::Mutex;

use crate::utils::date::DateTimeUtc;

/// Set once from `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Macros
// ============================================================================

/// Print `[module] message`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// `log!` that only prints with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Lines
// ============================================================================

/// Tag colors per module; unknown modules are yellow.
const MODULE_COLORS: &[(&str, AnsiColors)] = &[
    ("host", AnsiColors::BrightBlue),
    ("editor", AnsiColors::BrightBlue),
    ("preview", AnsiColors::BrightMagenta),
    ("link", AnsiColors::BrightMagenta),
    ("watch", AnsiColors::BrightGreen),
    ("patch", AnsiColors::BrightCyan),
    ("error", AnsiColors::BrightRed),
    ("warning", AnsiColors::BrightRed),
];

fn module_color(module: &str) -> AnsiColors {
    MODULE_COLORS
        .iter()
        .find(|(name, _)| module.eq_ignore_ascii_case(name))
        .map_or(AnsiColors::BrightYellow, |&(_, color)| color)
}

fn to_stderr(module: &str) -> bool {
    module.eq_ignore_ascii_case("error") || module.eq_ignore_ascii_case("warning")
}

fn tag(module: &str) -> String {
    let style = Style::new().color(module_color(module)).bold();
    format!("[{module}]").style(style).to_string()
}

/// Write one tagged line, clearing whatever the status line left behind.
pub fn log(module: &str, message: &str) {
    let tag = tag(module);

    if to_stderr(module) {
        let mut err = io::stderr().lock();
        writeln!(err, "{tag} {message}").ok();
        return;
    }

    let mut out = io::stdout().lock();
    execute!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{tag} {message}").ok();
    out.flush().ok();
}

// ============================================================================
// Watch status
// ============================================================================

/// Status block for watch mode; each message replaces the previous one.
pub struct WatchStatus {
    /// Height of the block printed last
    last_lines: usize,
}

static WATCH_STATUS: LazyLock<Mutex<WatchStatus>> =
    LazyLock::new(|| Mutex::new(WatchStatus::new()));

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// `✓ message` in green.
    pub fn success(&mut self, message: &str) {
        self.show(&"✓".green().to_string(), message);
    }

    /// `✗ summary` in red, with optional detail lines underneath.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = match detail {
            "" => summary.to_string(),
            detail => format!("{summary}\n{detail}"),
        };
        self.show(&"✗".red().to_string(), &message);
    }

    fn show(&mut self, symbol: &str, message: &str) {
        let mut out = io::stdout().lock();

        if let Ok(lines) = u16::try_from(self.last_lines)
            && lines > 0
        {
            execute!(out, cursor::MoveUp(lines), Clear(ClearType::FromCursorDown)).ok();
        }

        let clock = format!("[{}]", DateTimeUtc::now().clock());
        writeln!(out, "{} {symbol} {message}", clock.dimmed()).ok();
        out.flush().ok();

        self.last_lines = message.lines().count().max(1);
    }
}

/// Show a success on the shared watch status block.
pub fn status_success(message: &str) {
    WATCH_STATUS.lock().success(message);
}

/// Show an error on the shared watch status block.
pub fn status_error(summary: &str, detail: &str) {
    WATCH_STATUS.lock().error(summary, detail);
}
