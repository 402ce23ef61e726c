use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// "How many done" bar for a quiz or speech session.
pub struct ProgressBar<'a> {
    done: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(done: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            done: done.min(total),
            total,
            theme,
        }
    }

    fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio() * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let bg = if x < inner.x + filled_width {
                colors.bar_filled()
            } else {
                colors.bar_empty()
            };
            buf[(x, inner.y)].set_style(Style::default().bg(bg));
        }

        let label = format!("{} / {}", self.done, self.total);
        let label_x = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        buf.set_string(
            label_x,
            inner.y,
            &label,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        );
    }
}
