use crate::store::{LogFilter, StoredLog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggedResponse {
    pub status: String,
    pub id: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub service: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl LogsQuery {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            service: non_empty(&self.service),
            level: non_empty(&self.level),
            category: non_empty(&self.category),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub total: usize,
    pub logs: Vec<StoredLog>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    pub total_logs: usize,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedResponse {
    pub message: String,
}
