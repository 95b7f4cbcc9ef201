//! Layout helpers shared by the views

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Shortens a title to `max` characters, ending in an ellipsis when cut
pub fn truncate_title(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// A rectangle of the given percentage size, centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_unchanged() {
        assert_eq!(truncate_title("Stripe", 10), "Stripe");
        assert_eq!(truncate_title("Stripe", 6), "Stripe");
    }

    #[test]
    fn long_titles_get_ellipsis() {
        assert_eq!(truncate_title("Create a Stripe account", 8), "Create …");
        assert_eq!(truncate_title("abc", 0), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(truncate_title("アカウント作成", 4), "アカウ…");
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(50, 40, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.x, 25);
        assert_eq!(rect.y, 15);
    }
}
