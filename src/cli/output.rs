use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

/// Resolve the config `color` setting against flags, NO_COLOR, and the tty.
pub fn detect_color(color_setting: &str, no_color_flag: bool) -> bool {
    if no_color_flag || color_setting == "never" {
        return false;
    }
    if color_setting == "always" {
        return true;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}
