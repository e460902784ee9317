//! Homework status types and the fetcher trait

use async_trait::async_trait;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Start of the next query window, in Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(pub i64);

impl Cursor {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Cursor(secs as i64)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status reported by the status API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Parse the wire value; `None` for anything outside the known set
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    /// Human-readable verdict sent to the recipient
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Latest known state of the tracked homework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub name: String,
    pub status: HomeworkStatus,
}

/// Source of raw status payloads
#[async_trait]
pub trait StatusFetcher: Send + Sync + std::fmt::Debug {
    /// Query all status events at or after `cursor`
    async fn fetch(&self, cursor: Cursor) -> crate::Result<serde_json::Value>;
}
