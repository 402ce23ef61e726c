use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::{LetterCase, Section};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Explore,
    Quiz,
    Speech,
    SwitchSection,
    ToggleCase,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
    section: Section,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme, section: Section, case: LetterCase) -> Self {
        Self {
            items: items_for(section, case),
            selected: 0,
            theme,
            section,
        }
    }

    /// Rebuild labels after the section or letter case changed.
    pub fn refresh(&mut self, section: Section, case: LetterCase) {
        self.items = items_for(section, case);
        self.section = section;
        self.selected = self.selected.min(self.items.len() - 1);
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items[self.selected].action
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        let key = key.to_ascii_lowercase();
        self.items.iter().find(|item| item.key == key).map(|item| item.action)
    }
}

fn items_for(section: Section, case: LetterCase) -> Vec<MenuItem> {
    let (things, say_it) = match section {
        Section::Alphabet => ("letter", "Say the letter out loud"),
        Section::Numbers => ("number", "Count out loud"),
    };
    let other = section.toggled();
    let case_label = match case {
        LetterCase::Upper => "Letters: ABC",
        LetterCase::Lower => "Letters: abc",
    };

    let item = |key, label: &str, description: String, action| MenuItem {
        key,
        label: label.to_string(),
        description,
        action,
    };

    vec![
        item(
            '1',
            "Explore",
            format!("Look at every {things} and hear its sound"),
            MenuAction::Explore,
        ),
        item(
            '2',
            "Listen & Choose",
            format!("Hear a {things}, pick the right one"),
            MenuAction::Quiz,
        ),
        item('3', "Say It!", say_it.to_string(), MenuAction::Speech),
        item(
            's',
            &format!("Switch to {}", other.label()),
            format!("Practice {} instead", other.label().to_lowercase()),
            MenuAction::SwitchSection,
        ),
        item(
            'c',
            case_label,
            "Show big or small letters".to_string(),
            MenuAction::ToggleCase,
        ),
        item('q', "Quit", "See you next time!".to_string(), MenuAction::Quit),
    ]
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "letterpop",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.section.label(),
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, (item, row)) in self.items.iter().zip(menu_layout.iter()).enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", item.key, item.label),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("       {}", item.description),
                    Style::default().fg(colors.text_dim()),
                )),
            ];
            Paragraph::new(lines).render(*row, buf);
        }
    }
}
