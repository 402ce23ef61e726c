use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::{LetterCase, Target, TargetId};
use crate::ui::theme::{Theme, ThemeColors};

/// One target, big: glyph, word, and sentence. The word can be kept face
/// down, which is how the speech challenge hides its hint.
pub struct TargetCard<'a> {
    target: &'a Target,
    case: LetterCase,
    reveal_word: bool,
    frame: Option<Color>,
    theme: &'a Theme,
}

impl<'a> TargetCard<'a> {
    pub fn new(target: &'a Target, case: LetterCase, theme: &'a Theme) -> Self {
        Self {
            target,
            case,
            reveal_word: true,
            frame: None,
            theme,
        }
    }

    pub fn reveal_word(mut self, reveal: bool) -> Self {
        self.reveal_word = reveal;
        self
    }

    /// Override the border colour, e.g. to flash right/wrong.
    pub fn frame(mut self, color: Option<Color>) -> Self {
        self.frame = color;
        self
    }
}

fn glyph_text(id: TargetId, case: LetterCase) -> String {
    let glyph = id.display(case);
    // Letters spaced out so they read larger.
    glyph.chars().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

impl Widget for TargetCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let tile = ThemeColors::parse_color(&self.target.color);

        let block = Block::bordered()
            .border_style(Style::default().fg(self.frame.unwrap_or(tile)))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                glyph_text(self.target.id, self.case),
                Style::default().fg(tile).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if self.reveal_word {
            lines.push(Line::from(Span::styled(
                self.target.word.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )));
            if let Some(sentence) = &self.target.sentence {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    sentence.clone(),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "? ? ?",
                Style::default().fg(colors.text_dim()),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
