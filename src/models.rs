use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn marker(self) -> &'static str {
        match self {
            Priority::High => "[!]",
            Priority::Medium => "[*]",
            Priority::Low => "[i]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
