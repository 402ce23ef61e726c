use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::{Catalog, LetterCase};
use crate::ui::theme::{Theme, ThemeColors};

const CELL_HEIGHT: u16 = 3;

/// The explore screen: every target as a coloured tile, one of them selected.
pub struct TargetGrid<'a> {
    catalog: &'a Catalog,
    selected: usize,
    columns: usize,
    case: LetterCase,
    theme: &'a Theme,
}

impl<'a> TargetGrid<'a> {
    pub fn new(
        catalog: &'a Catalog,
        selected: usize,
        columns: usize,
        case: LetterCase,
        theme: &'a Theme,
    ) -> Self {
        Self {
            catalog,
            selected,
            columns: columns.max(1),
            case,
            theme,
        }
    }
}

/// First row to draw so that `selected_row` stays on screen.
fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return selected_row;
    }
    (selected_row + 1).saturating_sub(visible_rows)
}

impl Widget for TargetGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.catalog.section().label()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let cell_width = inner.width / self.columns as u16;
        if cell_width < 3 || inner.height < CELL_HEIGHT {
            return;
        }

        let visible_rows = (inner.height / CELL_HEIGHT) as usize;
        let first_row = first_visible_row(self.selected / self.columns, visible_rows);

        for (i, target) in self.catalog.targets().iter().enumerate() {
            let row = i / self.columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let col = (i % self.columns) as u16;
            let cell = Rect::new(
                inner.x + col * cell_width,
                inner.y + (row - first_row) as u16 * CELL_HEIGHT,
                cell_width,
                CELL_HEIGHT,
            );

            let tile = ThemeColors::parse_color(&target.color);
            let is_selected = i == self.selected;
            let border = if is_selected {
                Style::default()
                    .fg(colors.border_focused())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.border())
            };
            let mut glyph = Style::default().fg(tile).add_modifier(Modifier::BOLD);
            if is_selected {
                glyph = glyph.add_modifier(Modifier::REVERSED);
            }

            Paragraph::new(target.id.display(self.case))
                .style(glyph)
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(border))
                .render(cell, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Section;

    #[test]
    fn selected_row_stays_visible() {
        assert_eq!(first_visible_row(0, 3), 0);
        assert_eq!(first_visible_row(2, 3), 0);
        assert_eq!(first_visible_row(3, 3), 1);
        assert_eq!(first_visible_row(4, 0), 4);
    }

    #[test]
    fn renders_lowercase_glyphs() {
        let theme = Theme::default();
        let catalog = Catalog::load(Section::Alphabet).unwrap();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        TargetGrid::new(&catalog, 0, 7, LetterCase::Lower, &theme).render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(text.contains('z'));
        assert!(!text.contains('Z'));
    }
}
