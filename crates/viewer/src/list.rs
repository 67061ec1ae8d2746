use console::Style;

use crate::filter::NameFilter;
use crate::fit_width;
use crate::session::ItemId;

const TITLE: &str = "Wayland protocols";
const HELP: &str = "↑/k up • ↓/j down • / filter • enter select • q quit";
const FILTER_HELP: &str = "enter apply • esc cancel";

/// Title line, status line and a blank spacer above the rows; help line below.
const CHROME_HEIGHT: usize = 4;

/// Each row is a title, a description and a blank separator.
const ROW_HEIGHT: usize = 3;

/// One selectable row.
#[derive(Debug, Clone)]
pub struct ListRow {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Unfiltered,
    /// The query is being typed
    Editing,
    /// A query narrows the rows
    Applied,
}

/// Browsable, filterable list of rows. Row `i` stands for `ItemId(i)`.
pub struct ListView {
    rows: Vec<ListRow>,
    visible: Vec<usize>,
    cursor: usize,
    query: String,
    state: FilterState,
    width: usize,
    height: usize,
    filter: NameFilter,
}

impl ListView {
    pub fn new(rows: Vec<ListRow>) -> Self {
        let visible = (0..rows.len()).collect();
        Self {
            rows,
            visible,
            cursor: 0,
            query: String::new(),
            state: FilterState::Unfiltered,
            width: 0,
            height: 0,
            filter: NameFilter::new(),
        }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn filter_state(&self) -> FilterState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows currently shown, in order.
    pub fn visible(&self) -> Vec<ItemId> {
        self.visible.iter().copied().map(ItemId).collect()
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.visible.get(self.cursor).copied().map(ItemId)
    }

    /// Put the cursor on `id` if it is visible.
    pub fn select(&mut self, id: ItemId) {
        if let Some(pos) = self.visible.iter().position(|&row| row == id.0) {
            self.cursor = pos;
        }
    }

    /// Rows that fit on one page; at least one so paging always moves.
    pub fn per_page(&self) -> usize {
        (self.height.saturating_sub(CHROME_HEIGHT) / ROW_HEIGHT).max(1)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    pub fn next_page(&mut self) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + self.per_page()).min(last);
    }

    pub fn prev_page(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.per_page());
    }

    pub fn goto_start(&mut self) {
        self.cursor = 0;
    }

    pub fn goto_end(&mut self) {
        self.cursor = self.visible.len().saturating_sub(1);
    }

    pub fn start_filter(&mut self) {
        self.state = FilterState::Editing;
        self.refilter();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_filter_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    /// Stop editing. An empty query drops the filter altogether.
    pub fn apply_filter(&mut self) {
        if self.query.is_empty() {
            self.clear_filter();
        } else {
            self.state = FilterState::Applied;
        }
    }

    pub fn clear_filter(&mut self) {
        let selected = self.selected();
        self.query.clear();
        self.state = FilterState::Unfiltered;
        self.refilter();
        if let Some(id) = selected {
            self.select(id);
        }
    }

    fn refilter(&mut self) {
        let titles: Vec<&str> = self.rows.iter().map(|row| row.title.as_str()).collect();
        self.visible = self.filter.rank(&self.query, &titles);
        self.cursor = 0;
    }

    fn status_line(&self) -> String {
        match self.state {
            FilterState::Editing => format!("Filter: {}▏", self.query),
            FilterState::Applied => format!(
                "“{}” {} of {} items",
                self.query,
                self.visible.len(),
                self.rows.len()
            ),
            FilterState::Unfiltered => {
                let pages = self.visible.len().div_ceil(self.per_page()).max(1);
                let page = self.cursor / self.per_page() + 1;
                format!("{} items • page {page}/{pages}", self.visible.len())
            }
        }
    }

    /// At most `height` lines, none wider than `width`.
    pub fn view(&self) -> Vec<String> {
        let accent = Style::new().magenta();
        let dim = Style::new().dim();

        let mut lines = vec![
            Style::new().bold().apply_to(fit_width(TITLE, self.width)).to_string(),
            dim.apply_to(fit_width(&self.status_line(), self.width)).to_string(),
            String::new(),
        ];

        if self.visible.is_empty() {
            lines.push(fit_width("  No items.", self.width));
        }

        let per_page = self.per_page();
        let first = (self.cursor / per_page) * per_page;
        let page = self.visible.iter().enumerate().skip(first).take(per_page);

        for (pos, &row_idx) in page {
            let row = &self.rows[row_idx];
            let text_width = self.width.saturating_sub(2);
            let title = fit_width(&row.title, text_width);
            let description = fit_width(&row.description, text_width);

            if pos == self.cursor {
                lines.push(fit_width(&format!("│ {}", accent.apply_to(title)), self.width));
                lines.push(fit_width(&format!("│ {}", accent.apply_to(description)), self.width));
            } else {
                lines.push(fit_width(&format!("  {title}"), self.width));
                lines.push(fit_width(&format!("  {}", dim.apply_to(description)), self.width));
            }
            lines.push(String::new());
        }

        let help = match self.state {
            FilterState::Editing => FILTER_HELP,
            _ => HELP,
        };
        let body_end = self.height.saturating_sub(1).max(CHROME_HEIGHT - 1);
        lines.truncate(body_end);
        while lines.len() < body_end {
            lines.push(String::new());
        }
        lines.push(dim.apply_to(fit_width(help, self.width)).to_string());

        lines.truncate(self.height);
        lines
    }
}
