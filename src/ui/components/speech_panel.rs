use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::state::Feedback;
use crate::ui::theme::Theme;

/// Microphone status and the words heard so far.
pub struct SpeechPanel<'a> {
    transcript: &'a str,
    listening: bool,
    available: bool,
    feedback: Option<Feedback>,
    theme: &'a Theme,
}

impl<'a> SpeechPanel<'a> {
    pub fn new(transcript: &'a str, listening: bool, available: bool, theme: &'a Theme) -> Self {
        Self {
            transcript,
            listening,
            available,
            feedback: None,
            theme,
        }
    }

    pub fn feedback(mut self, feedback: Option<Feedback>) -> Self {
        self.feedback = feedback;
        self
    }
}

fn status_text(listening: bool, available: bool, feedback: Option<Feedback>) -> &'static str {
    match (feedback, listening, available) {
        (Some(Feedback::Correct), _, _) => "You said it!",
        (Some(Feedback::Wrong), _, _) => "Almost! Try again.",
        (None, true, _) => "Listening... (type what you say, Enter when done)",
        (None, false, true) => "Press Enter and say it!",
        (None, false, false) => "The microphone is off.",
    }
}

impl Widget for SpeechPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.listening {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(if self.listening { " Listening " } else { " Microphone " })
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        let status_color = match self.feedback {
            Some(Feedback::Correct) => colors.correct(),
            Some(Feedback::Wrong) => colors.wrong(),
            None if self.listening => colors.highlight(),
            None => colors.fg(),
        };

        let heard = if self.transcript.is_empty() {
            Span::styled("...", Style::default().fg(colors.text_dim()))
        } else {
            Span::styled(
                format!("\"{}\"", self.transcript),
                Style::default().fg(colors.fg()).add_modifier(Modifier::ITALIC),
            )
        };

        let lines = vec![
            Line::from(Span::styled(
                status_text(self.listening, self.available, self.feedback),
                Style::default().fg(status_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(heard),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
