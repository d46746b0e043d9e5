//! Special character table and the layout of the picker that shows it.
//!
//! The picker's tab panel is sized from the full, unfiltered table for the
//! current column count. Searching narrows what is shown but never changes
//! the panel height, so the dialog does not jump as results come and go.

use serde::Serialize;

/// A character and its searchable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharEntry {
    pub ch: char,
    pub name: &'static str,
}

/// A named group of characters, shown as one tab.
#[derive(Debug, Clone, Copy)]
pub struct CharCategory {
    pub title: &'static str,
    pub chars: &'static [CharEntry],
}

const fn entry(ch: char, name: &'static str) -> CharEntry {
    CharEntry { ch, name }
}

pub const CATEGORIES: &[CharCategory] = &[
    CharCategory {
        title: "Currency",
        chars: &[
            entry('$', "dollar sign"),
            entry('¢', "cent sign"),
            entry('€', "euro sign"),
            entry('£', "pound sign"),
            entry('¥', "yen sign"),
            entry('₩', "won sign"),
            entry('₹', "indian rupee sign"),
            entry('₽', "ruble sign"),
            entry('₺', "turkish lira sign"),
            entry('₿', "bitcoin sign"),
            entry('¤', "currency sign"),
        ],
    },
    CharCategory {
        title: "Text",
        chars: &[
            entry('©', "copyright sign"),
            entry('®', "registered sign"),
            entry('™', "trade mark sign"),
            entry('‰', "per mille sign"),
            entry('µ', "micro sign"),
            entry('·', "middle dot"),
            entry('•', "bullet"),
            entry('…', "three dot leader"),
            entry('′', "minutes"),
            entry('″', "seconds"),
            entry('§', "section sign"),
            entry('¶', "paragraph sign"),
            entry('ß', "sharp s"),
        ],
    },
    CharCategory {
        title: "Quotations",
        chars: &[
            entry('‹', "single left-pointing angle quotation mark"),
            entry('›', "single right-pointing angle quotation mark"),
            entry('«', "left pointing guillemet"),
            entry('»', "right pointing guillemet"),
            entry('‘', "left single quotation mark"),
            entry('’', "right single quotation mark"),
            entry('“', "left double quotation mark"),
            entry('”', "right double quotation mark"),
            entry('‚', "single low-9 quotation mark"),
            entry('„', "double low-9 quotation mark"),
        ],
    },
    CharCategory {
        title: "Mathematical",
        chars: &[
            entry('±', "plus-minus sign"),
            entry('×', "multiplication sign"),
            entry('÷', "division sign"),
            entry('≈', "almost equal to"),
            entry('≠', "not equal to"),
            entry('≤', "less-than or equal to"),
            entry('≥', "greater-than or equal to"),
            entry('∞', "infinity"),
            entry('√', "square root"),
            entry('∑', "n-ary summation"),
            entry('∏', "n-ary product"),
            entry('∂', "partial differential"),
            entry('∫', "integral"),
            entry('π', "greek small letter pi"),
            entry('°', "degree sign"),
        ],
    },
    CharCategory {
        title: "Arrows",
        chars: &[
            entry('←', "leftwards arrow"),
            entry('↑', "upwards arrow"),
            entry('→', "rightwards arrow"),
            entry('↓', "downwards arrow"),
            entry('↔', "left right arrow"),
            entry('↵', "carriage return"),
            entry('⇐', "leftwards double arrow"),
            entry('⇒', "rightwards double arrow"),
            entry('⇔', "left right double arrow"),
        ],
    },
];

/// Width of one grid cell in terminal columns (glyph plus padding).
pub const CELL_WIDTH: u16 = 4;

/// Horizontal space taken by the dialog border and padding.
const DIALOG_CHROME_COLUMNS: u16 = 4;

/// Rows around the tab panel: borders, search line, tab bar, footer.
pub const DIALOG_CHROME_ROWS: u16 = 5;

/// Every character, in category order.
pub fn all_chars() -> Vec<CharEntry> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.chars.iter().copied())
        .collect()
}

/// Case-insensitive search over names. An exact character also matches.
pub fn search(pattern: &str) -> Vec<CharEntry> {
    let needle = pattern.trim().to_lowercase();
    if needle.is_empty() {
        return all_chars();
    }
    CATEGORIES
        .iter()
        .flat_map(|c| c.chars.iter().copied())
        .filter(|e| e.name.contains(&needle) || needle.chars().eq(std::iter::once(e.ch)))
        .collect()
}

/// Rows needed to lay out `count` cells in `columns` columns.
pub fn rows_for(count: usize, columns: u16) -> u16 {
    let columns = usize::from(columns.max(1));
    u16::try_from(count.div_ceil(columns)).unwrap_or(u16::MAX)
}

/// Grid columns that fit a dialog of the given outer width.
pub fn columns_for_width(width: u16) -> u16 {
    (width.saturating_sub(DIALOG_CHROME_COLUMNS) / CELL_WIDTH).max(1)
}

/// Panel height for a column count: the tallest tab, with the "All" tab
/// counted, and never less than one row.
pub fn pinned_panel_height(columns: u16) -> u16 {
    let all = rows_for(all_chars().len(), columns);
    CATEGORIES
        .iter()
        .map(|c| rows_for(c.chars.len(), columns))
        .fold(all, u16::max)
        .max(1)
}

/// Tabs shown by the picker: "All" followed by each category.
pub fn tab_titles() -> Vec<&'static str> {
    std::iter::once("All")
        .chain(CATEGORIES.iter().map(|c| c.title))
        .collect()
}

/// State of an open special character picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharmapState {
    pub query: String,
    /// Selected tab; 0 is "All"
    pub tab: usize,
    /// Selected cell within the visible items
    pub selected: usize,
    pub columns: u16,
    pub panel_height: u16,
    pub open: bool,
}

impl CharmapState {
    /// A closed picker laid out for a dialog of the given outer width.
    pub fn new(width: u16) -> Self {
        let columns = columns_for_width(width);
        Self {
            query: String::new(),
            tab: 0,
            selected: 0,
            columns,
            panel_height: pinned_panel_height(columns),
            open: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.tab = 0;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Re-layout for a new dialog width. Only the column count changes the
    /// panel height.
    pub fn resize(&mut self, width: u16) {
        self.columns = columns_for_width(width);
        self.panel_height = pinned_panel_height(self.columns);
        self.clamp_selection();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
    }

    /// Items currently shown: search results when a query is set, otherwise
    /// the selected tab.
    pub fn visible(&self) -> Vec<CharEntry> {
        if !self.query.trim().is_empty() {
            return search(&self.query);
        }
        match self.tab {
            0 => all_chars(),
            n => CATEGORIES
                .get(n - 1)
                .map(|c| c.chars.to_vec())
                .unwrap_or_default(),
        }
    }

    /// Outer height of the dialog: the pinned panel plus its chrome.
    pub fn dialog_height(&self) -> u16 {
        self.panel_height + DIALOG_CHROME_ROWS
    }

    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    pub fn selected_char(&self) -> Option<char> {
        self.visible().get(self.selected).map(|e| e.ch)
    }

    pub fn next_tab(&mut self) {
        self.tab = (self.tab + 1) % (CATEGORIES.len() + 1);
        self.selected = 0;
    }

    pub fn prev_tab(&mut self) {
        self.tab = (self.tab + CATEGORIES.len()) % (CATEGORIES.len() + 1);
        self.selected = 0;
    }

    /// Move the selection by a cell delta, staying within visible items.
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.visible_count();
        if count == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected.saturating_add_signed(delta);
        self.selected = next.min(count - 1);
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}
