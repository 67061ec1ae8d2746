/// Lines scrolled per mouse wheel notch.
pub const WHEEL_DELTA: usize = 3;

/// Vertical scroll window over a block of text.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    width: usize,
    height: usize,
    y_offset: usize,
    lines: Vec<String>,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.y_offset = self.y_offset.min(self.max_y_offset());
    }

    /// Replace the text. An offset past the new end snaps to the bottom.
    pub fn set_content(&mut self, content: &str) {
        self.lines = content.lines().map(|line| line.replace('\t', "    ")).collect();
        if self.y_offset > self.lines.len().saturating_sub(1) {
            self.goto_bottom();
        }
    }

    pub fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn set_y_offset(&mut self, offset: usize) {
        self.y_offset = offset.min(self.max_y_offset());
    }

    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.height / 2).max(1));
    }

    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Fraction scrolled, 0.0 at the top and 1.0 at the bottom. Text that fits is fully seen.
    pub fn scroll_percent(&self) -> f64 {
        if self.height >= self.lines.len() {
            return 1.0;
        }
        let scrollable = (self.lines.len() - self.height) as f64;
        (self.y_offset as f64 / scrollable).clamp(0.0, 1.0)
    }

    /// Exactly `height` lines: the visible slice, padded with blanks.
    pub fn view(&self) -> Vec<String> {
        let end = self.y_offset.saturating_add(self.height).min(self.lines.len());
        let start = self.y_offset.min(end);

        let mut rows: Vec<String> = self.lines[start..end]
            .iter()
            .map(|line| crate::fit_width(line, self.width))
            .collect();
        rows.resize(self.height, String::new());
        rows
    }
}
