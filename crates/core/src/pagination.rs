//! Client-side line pagination for raw book text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
}

/// Text split into lines plus a 1-indexed page cursor.
///
/// Invariant: `1 <= page <= max(total_pages, 1)` after every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    lines: Vec<String>,
    page: usize,
    lines_per_page: usize,
}

impl Pagination {
    pub fn from_text(text: &str, lines_per_page: usize) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self::from_lines(lines, lines_per_page)
    }

    pub fn from_lines(lines: Vec<String>, lines_per_page: usize) -> Self {
        Self {
            lines,
            page: 1,
            lines_per_page: lines_per_page.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_pages(&self) -> usize {
        self.lines.len().div_ceil(self.lines_per_page)
    }

    /// Moves to `requested`, clamped into the valid page range. Returns the
    /// page actually shown.
    pub fn go_to(&mut self, requested: i64) -> usize {
        let max = self.total_pages().max(1) as i64;
        self.page = requested.clamp(1, max) as usize;
        self.page
    }

    pub fn navigate(&mut self, nav: PageNav) -> usize {
        let current = self.page as i64;
        match nav {
            PageNav::First => self.go_to(1),
            PageNav::Prev => self.go_to(current - 1),
            PageNav::Next => self.go_to(current + 1),
            PageNav::Last => self.go_to(self.total_pages() as i64),
        }
    }

    /// Applies typed page input. Non-numeric input is ignored and leaves the
    /// cursor where it was.
    pub fn apply_input(&mut self, input: &str) -> bool {
        match parse_page_number(input) {
            Some(page) => {
                self.go_to(page);
                true
            }
            None => false,
        }
    }

    /// Changes the page size and rewinds to the first page.
    pub fn set_lines_per_page(&mut self, lines_per_page: usize) {
        self.lines_per_page = lines_per_page.max(1);
        self.page = 1;
    }

    pub fn page_lines(&self) -> &[String] {
        let start = (self.page - 1)
            .saturating_mul(self.lines_per_page)
            .min(self.lines.len());
        let end = start.saturating_add(self.lines_per_page).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn percent(&self) -> f32 {
        let total = self.total_pages();
        if total == 0 {
            0.0
        } else {
            (self.page as f32 / total as f32) * 100.0
        }
    }
}

/// Leading-integer parse: optional sign followed by digits, trailing garbage
/// ignored (`"12abc"` is 12). Out-of-range magnitudes saturate.
pub fn parse_page_number(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let (negative, rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    let digits = &rest[..digits_len];
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn total_pages_is_ceiling() {
        for (n, p, expected) in [(65, 30, 3), (60, 30, 2), (1, 30, 1), (0, 5, 0), (7, 1, 7)] {
            let lines = (0..n).map(|i| i.to_string()).collect();
            let pagination = Pagination::from_lines(lines, p);
            assert_eq!(pagination.total_pages(), expected, "n={n} p={p}");
        }
    }

    #[test]
    fn sixty_five_lines_clamp_into_three_pages() {
        let mut pagination = Pagination::from_text(&numbered(65), 30);
        assert_eq!(pagination.total_pages(), 3);
        assert_eq!(pagination.go_to(5), 3);
        assert_eq!(pagination.page_lines().len(), 5);
        assert_eq!(pagination.page_lines()[0], "line 61");

        assert_eq!(pagination.go_to(0), 1);
        assert_eq!(pagination.go_to(-4), 1);

        pagination.go_to(2);
        assert!(!pagination.apply_input("abc"));
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn empty_pagination_stays_on_page_one() {
        let mut pagination = Pagination::from_lines(Vec::new(), 30);
        assert_eq!(pagination.total_pages(), 0);
        assert_eq!(pagination.go_to(9), 1);
        assert_eq!(pagination.navigate(PageNav::Last), 1);
        assert!(pagination.page_lines().is_empty());
        assert!(!pagination.can_go_next());
        assert_eq!(pagination.percent(), 0.0);
    }

    #[test]
    fn navigation_respects_bounds() {
        let mut pagination = Pagination::from_text(&numbered(10), 4);
        assert!(!pagination.can_go_prev());
        assert_eq!(pagination.navigate(PageNav::Prev), 1);
        assert_eq!(pagination.navigate(PageNav::Next), 2);
        assert_eq!(pagination.navigate(PageNav::Last), 3);
        assert!(!pagination.can_go_next());
        assert_eq!(pagination.navigate(PageNav::Next), 3);
        assert_eq!(pagination.navigate(PageNav::First), 1);
    }

    #[test]
    fn changing_page_size_rewinds() {
        let mut pagination = Pagination::from_text(&numbered(65), 30);
        pagination.go_to(3);
        pagination.set_lines_per_page(20);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.total_pages(), 4);
        pagination.set_lines_per_page(0);
        assert_eq!(pagination.lines_per_page(), 1);
        assert_eq!(pagination.total_pages(), 65);
    }

    #[test]
    fn text_split_keeps_trailing_empty_line() {
        let pagination = Pagination::from_text("a\r\nb\n", 30);
        assert_eq!(pagination.line_count(), 3);
        assert_eq!(pagination.page_lines(), ["a", "b", ""]);

        let empty = Pagination::from_text("", 30);
        assert_eq!(empty.line_count(), 1);
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn page_input_parses_leading_integer() {
        assert_eq!(parse_page_number("12"), Some(12));
        assert_eq!(parse_page_number(" 7 "), Some(7));
        assert_eq!(parse_page_number("3abc"), Some(3));
        assert_eq!(parse_page_number("-2"), Some(-2));
        assert_eq!(parse_page_number("abc"), None);
        assert_eq!(parse_page_number(""), None);
        assert_eq!(parse_page_number("-"), None);
        assert_eq!(parse_page_number("99999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn percent_tracks_position() {
        let mut pagination = Pagination::from_text(&numbered(40), 10);
        pagination.go_to(1);
        assert_eq!(pagination.percent(), 25.0);
    }
}
