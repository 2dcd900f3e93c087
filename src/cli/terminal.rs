//! Colors for command output.
//!
//! Accepted addresses print green, rejections amber, binding names blue and
//! secondary lines dimmed. Plain text is printed when stdout has no color
//! support, so piped output stays free of escape codes.

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout accepts color.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Styles for the kinds of line the commands print.
pub trait Colorize {
    /// An accepted address or a completed edit.
    fn success(&self) -> String;
    /// A rejection or an invalid field.
    fn warning(&self) -> String;
    /// A property or binding name.
    fn info(&self) -> String;
    /// Secondary detail.
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        paint(self, |text| text.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |text| text.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        paint(self, |text| text.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |text| text.dimmed().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}
