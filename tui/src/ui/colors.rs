use ratatui::style::Color;

// app border colors
pub const APP_BORDER: Color = Color::Rgb(0x88, 0x0e, 0x4f);
pub const APP_BORDER_TEXT: Color = Color::Rgb(0xf0, 0x62, 0x92);

// border colors
pub const BORDER_UNFOCUSED: Color = Color::Rgb(0xb7, 0x1c, 0x1c);
pub const BORDER_FOCUSED: Color = Color::Rgb(0xef, 0x9a, 0x9a);

// Popup border colors
pub const POPUP_BORDER: Color = Color::Rgb(0x03, 0xa9, 0xf4);

// text colors
pub const TEXT_NORMAL: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const TEXT_HIGHLIGHT: Color = Color::Rgb(0xe5, 0x39, 0x35);
pub const TEXT_HIGHLIGHT_ALT: Color = Color::Rgb(0xef, 0x9a, 0x9a);
pub const TEXT_ERROR: Color = Color::Rgb(0xff, 0x52, 0x52);
pub const TEXT_MUTED: Color = Color::Rgb(0x9e, 0x9e, 0x9e);

#[must_use]
pub const fn border_color(is_focused: bool) -> Color {
    if is_focused {
        BORDER_FOCUSED
    } else {
        BORDER_UNFOCUSED
    }
}
