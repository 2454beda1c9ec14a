//! Console messages shown to the operator while a run progresses.

use std::fmt;
use std::io::IsTerminal;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

/// Colors only when writing to a terminal and `NO_COLOR` is unset.
fn use_color(stderr: bool) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if stderr {
        std::io::stderr().is_terminal()
    } else {
        std::io::stdout().is_terminal()
    }
}

fn styled(color: &str, icon: &str, msg: &dyn fmt::Display, stderr: bool) -> String {
    if use_color(stderr) {
        format!("{color}{BOLD}{icon}{RESET} {msg}")
    } else {
        format!("{icon} {msg}")
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_BLUE, ICON_INFO, &msg, false));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_GREEN, ICON_OK, &msg, false));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_YELLOW, ICON_WARN, &msg, false));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", styled(FG_RED, ICON_ERR, &msg, true));
}

/// Section header, e.g. before the run summary.
pub fn header<T: fmt::Display>(msg: T) {
    if use_color(false) {
        println!("{FG_BLUE}{BOLD}====================== {msg}{RESET}");
    } else {
        println!("====================== {msg}");
    }
}
