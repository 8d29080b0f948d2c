//! Inline status banners

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Banner height in rows
pub const BANNER_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

impl BannerKind {
    fn color(self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Success => Color::Green,
        }
    }
}

/// Render a one-line message in a colored box
pub fn render_banner(frame: &mut Frame, area: Rect, kind: BannerKind, message: &str) {
    let style = Style::default().fg(kind.color());
    let paragraph = Paragraph::new(message)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(paragraph, area);
}
