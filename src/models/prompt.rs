//! Values exchanged between the session, the arbitrator and the user.

use serde::Serialize;
use std::fmt;

/// Tabs of the per-game stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tab {
    Batting,
    Pitching,
    Recap,
}

impl Tab {
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "b" | "bat" | "batting" => Some(Tab::Batting),
            "p" | "pit" | "pitching" => Some(Tab::Pitching),
            "r" | "recap" => Some(Tab::Recap),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tab::Batting => "batting",
            Tab::Pitching => "pitching",
            Tab::Recap => "recap",
        })
    }
}

/// Why a transition was intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PromptReason {
    SwitchRow,
    TabChange,
    ExitEdit,
    GameChange,
}

impl fmt::Display for PromptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PromptReason::SwitchRow => "switch-row",
            PromptReason::TabChange => "tab-change",
            PromptReason::ExitEdit => "exit-edit",
            PromptReason::GameChange => "game-change",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsavedChangesPrompt {
    pub reason: PromptReason,
    /// Who the dirty row belongs to, e.g. the player name.
    pub subject_label: String,
    /// Tab holding the dirty row.
    pub tab_context: Tab,
}

impl fmt::Display for UnsavedChangesPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsaved {} changes for {} ({})",
            self.tab_context, self.subject_label, self.reason
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Save,
    Discard,
    Cancel,
}

impl Decision {
    pub fn from_answer(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "s" | "save" => Some(Decision::Save),
            "d" | "discard" => Some(Decision::Discard),
            "c" | "cancel" => Some(Decision::Cancel),
            _ => None,
        }
    }
}

/// Description of the dirty row exposed through the grid handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirtyRowInfo {
    pub stat_id: i64,
    pub subject_label: String,
    pub tab: Tab,
    pub fields: Vec<String>,
}
