use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Split a play area into progress bar on top and the board below.
pub fn with_progress(area: Rect) -> (Rect, Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);
    (parts[0], parts[1])
}

const HINT_INDENT: &str = "  ";
const HINT_GAP: &str = "   ";

/// Greedily pack key hints into as few lines as fit `width`. A hint longer
/// than the line still gets a line of its own.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut rows: Vec<Vec<&str>> = Vec::new();
    let mut used = 0;
    for &hint in hints.iter().filter(|h| !h.is_empty()) {
        let len = hint.chars().count();
        match rows.last_mut() {
            Some(row) if used + HINT_GAP.len() + len <= width => {
                row.push(hint);
                used += HINT_GAP.len() + len;
            }
            _ => {
                rows.push(vec![hint]);
                used = HINT_INDENT.len() + len;
            }
        }
    }

    rows.into_iter()
        .map(|row| format!("{HINT_INDENT}{}", row.join(HINT_GAP)))
        .collect()
}

/// A popup rectangle centred in `area`, at least 40x9 but never larger than `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;

    let width = scale(area.width, percent_x).max(40).min(area.width);
    let height = scale(area.height, percent_y).max(9).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_when_too_wide() {
        let lines = pack_hint_lines(&["[Enter] Talk", "[Tab] Hint", "[Esc] Back"], 30);
        assert_eq!(lines, vec!["  [Enter] Talk   [Tab] Hint", "  [Esc] Back"]);
    }

    #[test]
    fn hints_skip_empty_entries() {
        let lines = pack_hint_lines(&["", "[q] Quit"], 80);
        assert_eq!(lines, vec!["  [q] Quit"]);
        assert!(pack_hint_lines(&[], 80).is_empty());
        assert!(pack_hint_lines(&["[q] Quit"], 0).is_empty());
    }

    #[test]
    fn popup_stays_inside_small_area() {
        let area = Rect::new(0, 0, 30, 6);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, area);
    }

    #[test]
    fn popup_is_centred() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }
}
