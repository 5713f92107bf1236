// ABOUTME: Page-by-page browsing of list views
// ABOUTME: Shows placeholder data while the requested page loads and offers only valid moves

use std::fmt;
use storyloom_query::{PageLoader, PageState, PageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
    Quit,
}

impl Navigation {
    /// Page to show after this move, or None to stop browsing
    pub fn target(&self, page: u32) -> Option<u32> {
        match self {
            Self::Next => Some(page + 1),
            Self::Previous => Some(page.saturating_sub(1).max(1)),
            Self::Quit => None,
        }
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Next => "Next page",
            Self::Previous => "Previous page",
            Self::Quit => "Quit",
        })
    }
}

/// Moves available from a settled page. Empty when there is nowhere to go.
pub fn navigation<T>(view: &PageView<T>) -> Vec<Navigation> {
    let mut moves = Vec::new();
    if view.has_next_page {
        moves.push(Navigation::Next);
    }
    if view.has_previous_page {
        moves.push(Navigation::Previous);
    }
    if !moves.is_empty() {
        moves.push(Navigation::Quit);
    }
    moves
}

/// What to draw for `page` before its request completes
pub fn preview<T: Send + Sync + 'static>(loader: &PageLoader<T>, page: u32) -> Option<PageView<T>> {
    match loader.peek(page) {
        PageState::Placeholder(view) => Some(view),
        PageState::Ready(_) | PageState::Loading => None,
    }
}
