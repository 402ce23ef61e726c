use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::{LetterCase, TargetId};
use crate::session::state::Feedback;
use crate::ui::theme::Theme;

/// The multiple-choice row of the listen-and-choose quiz.
pub struct ChoiceBoard<'a> {
    options: &'a [TargetId],
    cursor: usize,
    last_selection: Option<TargetId>,
    feedback: Option<Feedback>,
    case: LetterCase,
    theme: &'a Theme,
}

impl<'a> ChoiceBoard<'a> {
    pub fn new(options: &'a [TargetId], cursor: usize, case: LetterCase, theme: &'a Theme) -> Self {
        Self {
            options,
            cursor,
            last_selection: None,
            feedback: None,
            case,
            theme,
        }
    }

    pub fn verdict(mut self, last_selection: Option<TargetId>, feedback: Option<Feedback>) -> Self {
        self.last_selection = last_selection;
        self.feedback = feedback;
        self
    }

    fn tile_color(&self, id: TargetId, index: usize) -> Color {
        let colors = &self.theme.colors;
        match (self.feedback, self.last_selection == Some(id)) {
            (Some(Feedback::Correct), true) => colors.correct(),
            (Some(Feedback::Wrong), true) => colors.wrong(),
            _ if index == self.cursor => colors.border_focused(),
            _ => colors.border(),
        }
    }
}

fn prompt(feedback: Option<Feedback>) -> &'static str {
    match feedback {
        None => "Which one did you hear?",
        Some(Feedback::Correct) => "Great job!",
        Some(Feedback::Wrong) => "Oops, try again!",
    }
}

impl Widget for ChoiceBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(inner);

        let prompt_color = match self.feedback {
            Some(Feedback::Correct) => colors.correct(),
            Some(Feedback::Wrong) => colors.wrong(),
            None => colors.fg(),
        };
        Paragraph::new(Line::from(prompt(self.feedback)))
            .style(Style::default().fg(prompt_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        if self.options.is_empty() {
            return;
        }

        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                self.options
                    .iter()
                    .map(|_| Constraint::Ratio(1, self.options.len() as u32))
                    .collect::<Vec<_>>(),
            )
            .split(rows[1]);

        for (i, (id, tile)) in self.options.iter().zip(tiles.iter()).enumerate() {
            let color = self.tile_color(*id, i);
            let lines = vec![
                Line::from(""),
                Line::from(id.display(self.case)).style(Style::default().add_modifier(Modifier::BOLD)),
            ];
            Paragraph::new(lines)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center)
                .block(
                    Block::bordered()
                        .title(format!(" {} ", i + 1))
                        .border_style(Style::default().fg(color)),
                )
                .render(*tile, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_follows_feedback() {
        assert_eq!(prompt(None), "Which one did you hear?");
        assert_eq!(prompt(Some(Feedback::Correct)), "Great job!");
        assert_eq!(prompt(Some(Feedback::Wrong)), "Oops, try again!");
    }

    #[test]
    fn selected_tile_takes_verdict_colour() {
        let theme = Theme::default();
        let options = [
            TargetId::Letter('A'),
            TargetId::Letter('B'),
            TargetId::Letter('C'),
            TargetId::Letter('D'),
        ];
        let board = ChoiceBoard::new(&options, 0, LetterCase::Upper, &theme)
            .verdict(Some(TargetId::Letter('C')), Some(Feedback::Wrong));
        assert_eq!(board.tile_color(options[2], 2), theme.colors.wrong());
        assert_eq!(board.tile_color(options[0], 0), theme.colors.border_focused());
        assert_eq!(board.tile_color(options[1], 1), theme.colors.border());
    }
}
