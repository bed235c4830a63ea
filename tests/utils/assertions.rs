//! Test assertion helpers - fluent API for verifying posted notices
#![allow(dead_code)] // Test utilities may not all be used in every test

use roomlink::{notify::Toast, NoticeLevel, ToastBoard};

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct NoticeAssertion {
    notices: Vec<Toast>,
}

impl NoticeAssertion {
    /// Snapshot of every notice still visible on the board
    pub async fn visible_on(board: &ToastBoard) -> Self {
        Self {
            notices: board.active().await,
        }
    }

    /// Assert that some notice has the level and contains the text
    pub fn contains(self, level: NoticeLevel, text: &str) -> Self {
        assert!(
            self.notices
                .iter()
                .any(|n| n.level == level && n.message.contains(text)),
            "expected a {} notice containing {:?}, got {:?}",
            level,
            text,
            self.notices.iter().map(|n| n.to_string()).collect::<Vec<_>>()
        );
        self
    }

    /// Assert that no notice has the level
    pub fn none_with_level(self, level: NoticeLevel) -> Self {
        assert!(
            self.notices.iter().all(|n| n.level != level),
            "unexpected {} notice in {:?}",
            level,
            self.notices.iter().map(|n| n.to_string()).collect::<Vec<_>>()
        );
        self
    }

    pub fn count(self, expected: usize) -> Self {
        assert_eq!(self.notices.len(), expected, "notice count");
        self
    }
}
