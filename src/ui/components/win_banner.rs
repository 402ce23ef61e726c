use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

const CONFETTI: &str = "*  .  o  *  .  o  *  .  o  *";

/// Popup drawn over the explore grid once a session is won.
pub struct WinBanner<'a> {
    message: &'a str,
    score: u32,
    theme: &'a Theme,
}

impl<'a> WinBanner<'a> {
    pub fn new(message: &'a str, score: u32, theme: &'a Theme) -> Self {
        Self {
            message,
            score,
            theme,
        }
    }
}

impl Widget for WinBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(60, 40, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" You did it! ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let lines = vec![
            Line::from(Span::styled(CONFETTI, Style::default().fg(colors.highlight()))),
            Line::from(""),
            Line::from(Span::styled(
                self.message,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} right answers", self.score),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(CONFETTI, Style::default().fg(colors.highlight()))),
            Line::from(Span::styled(
                "press any key",
                Style::default().fg(colors.text_dim()),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(popup, buf);
    }
}
