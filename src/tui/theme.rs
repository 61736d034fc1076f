//! Maps persona color tokens onto terminal colors.

use ratatui::style::Color;

/// Accent used for the user's own messages and focused borders.
pub const USER_ACCENT: Color = Color::Cyan;
/// Secondary text (timestamps, hints, placeholders).
pub const MUTED: Color = Color::DarkGray;

/// Terminal color for a persona color token. Unknown tokens get the default accent.
pub fn color_for(token: &str) -> Color {
    match token {
        "dialog-blue" => Color::Blue,
        "dialog-green" => Color::Green,
        "dialog-red" => Color::Red,
        "dialog-orange" => Color::Rgb(255, 165, 0),
        "dialog-pink" => Color::Magenta,
        "dialog-cyan" => Color::Cyan,
        "primary" => Color::LightBlue,
        _ => Color::White,
    }
}
