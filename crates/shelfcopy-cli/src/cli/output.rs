//! Shared CLI output: status symbols on stderr, results on stdout.
//!
//! Stdout carries only the payload (a row, a URL, JSON) so it can be piped
//! into a clipboard tool. Everything addressed to the user goes to stderr.

use std::io::IsTerminal;

/// Environment flags set from the global command-line options.
pub const JSON_ENV: &str = "SHELFCOPY_JSON";
pub const QUIET_ENV: &str = "SHELFCOPY_QUIET";
pub const NO_COLOR_ENV: &str = "SHELFCOPY_NO_COLOR";

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() || std::env::var_os(NO_COLOR_ENV).is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Red X symbol.
    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print a confirmation line unless --quiet.
pub fn print_ok(s: &Styled, msg: &str) {
    if !is_quiet() {
        eprintln!("  {} {msg}", s.ok_sym());
    }
}

/// Print a failure line. Shown even with --quiet.
pub fn print_fail(s: &Styled, msg: &str) {
    eprintln!("  {} {msg}", s.fail_sym());
}

/// Print one `label  value` row of a listing.
pub fn print_row(label: &str, value: &str) {
    println!("  {label:<20} {value}");
}

/// Check if --quiet mode is active.
pub fn is_quiet() -> bool {
    std::env::var_os(QUIET_ENV).is_some()
}

/// Check if --json mode is active.
pub fn is_json() -> bool {
    std::env::var_os(JSON_ENV).is_some()
}

/// Print JSON output to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}

/// Render a separator so invisible characters show up in listings.
pub fn describe_separator(separator: &str) -> String {
    match separator {
        "\t" => "\\t (tab)".to_string(),
        "\n" => "\\n (newline)".to_string(),
        "" => "(none)".to_string(),
        other => format!("{other:?}"),
    }
}
