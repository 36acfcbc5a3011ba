//! Scripted transport shared by unit tests across the crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{ApiError, HarvardClient, Transport};
use crate::config::ApiSettings;

/// Replays canned responses in order and records every requested URL.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String, ApiError>>>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<String, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<String, ApiError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("script exhausted".into())))
    }
}

pub(crate) fn test_settings() -> ApiSettings {
    ApiSettings {
        base_url: "https://api.test".into(),
        api_key: "test-key".into(),
        page_size: 10,
        max_attempts: 3,
    }
}

pub(crate) fn scripted_client(transport: Arc<ScriptedTransport>) -> HarvardClient {
    HarvardClient::new(test_settings(), transport)
}

/// Object listing body whose records all carry a primary image.
pub(crate) fn artwork_page_json(records: &[(i64, &str)]) -> String {
    let records: Vec<serde_json::Value> = records
        .iter()
        .map(|(id, title)| {
            serde_json::json!({
                "id": id,
                "title": title,
                "primaryimageurl": format!("https://img.test/{id}.jpg"),
                "culture": "Japanese",
                "places": [{"placeid": 100 + id, "displayname": "Kyoto, Japan", "type": "Creation Place"}],
            })
        })
        .collect();
    serde_json::json!({
        "info": {"totalrecordsperquery": records.len(), "totalrecords": records.len(), "pages": 1, "page": 1},
        "records": records,
    })
    .to_string()
}
