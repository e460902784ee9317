//! Change detection and message rendering for the tracked homework

use serde_json::Value;

use crate::status::{HomeworkStatus, StatusItem};

/// Outcome of comparing the latest item against the last seen one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    NoChange,
    Changed { item: StatusItem, message: String },
}

/// Remembers the last rendered item and reports when it changes
#[derive(Debug, Default)]
pub struct StatusChangeDetector {
    last_seen: Option<StatusItem>,
}

impl StatusChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seen(&self) -> Option<&StatusItem> {
        self.last_seen.as_ref()
    }

    /// Look at the first (most recent) item only. Later entries are ignored.
    ///
    /// On change, the new item becomes the last seen state before the
    /// rendered message is returned.
    pub fn detect(&mut self, homeworks: &[Value]) -> crate::Result<Detection> {
        let Some(first) = homeworks.first() else {
            tracing::debug!("No homework updates in this window");
            return Ok(Detection::NoChange);
        };

        let item = parse_item(first)?;

        if self.last_seen.as_ref() == Some(&item) {
            tracing::debug!("Homework '{}' still {}", item.name, item.status);
            return Ok(Detection::NoChange);
        }

        let message = render_message(&item);
        tracing::debug!(
            "Homework '{}' changed: {:?} -> {}",
            item.name,
            self.last_seen.as_ref().map(|i| i.status),
            item.status
        );
        self.last_seen = Some(item.clone());

        Ok(Detection::Changed { item, message })
    }
}

/// Turn a raw item into a typed one, rejecting missing or unknown fields
pub fn parse_item(raw: &Value) -> crate::Result<StatusItem> {
    let name = raw
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            crate::ReviewError::InvalidItem("missing string field 'homework_name'".to_string())
        })?;
    let status = raw.get("status").and_then(Value::as_str).ok_or_else(|| {
        crate::ReviewError::InvalidItem("missing string field 'status'".to_string())
    })?;

    let status = HomeworkStatus::from_wire(status)
        .ok_or_else(|| crate::ReviewError::UnknownStatus(status.to_string()))?;

    Ok(StatusItem {
        name: name.to_string(),
        status,
    })
}

pub fn render_message(item: &StatusItem) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        item.name,
        item.status.verdict()
    )
}
