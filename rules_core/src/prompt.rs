//! Prompt port - asking a user for values mid-resolution
//!
//! The engine suspends only here. Hosts implement [`PromptPort`] with a
//! dialog; tests and headless runs use [`ScriptedPrompt`].

use crate::affinity::AffinityKey;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Key of the fate-points field in damage prompts
pub const FATE_FIELD: &str = "fate";

/// One input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptField {
    Numeric {
        key: String,
        label: String,
        default: i64,
    },
    Boolean {
        key: String,
        label: String,
        default: bool,
    },
    Select {
        key: String,
        label: String,
        options: Vec<AffinityKey>,
        default: AffinityKey,
    },
}

impl PromptField {
    pub fn key(&self) -> &str {
        match self {
            PromptField::Numeric { key, .. }
            | PromptField::Boolean { key, .. }
            | PromptField::Select { key, .. } => key,
        }
    }

    pub fn default_value(&self) -> PromptValue {
        match self {
            PromptField::Numeric { default, .. } => PromptValue::Number(*default),
            PromptField::Boolean { default, .. } => PromptValue::Flag(*default),
            PromptField::Select { default, .. } => PromptValue::Choice(*default),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub title: String,
    pub fields: Vec<PromptField>,
}

impl PromptRequest {
    /// Ask how much fate `target` spends against an incoming hit
    pub fn fate(target: &str, available: i64) -> Self {
        PromptRequest {
            title: format!("{target}: spend fate to reduce damage? ({available} available)"),
            fields: vec![PromptField::Numeric {
                key: FATE_FIELD.to_string(),
                label: "Fate points".to_string(),
                default: 0,
            }],
        }
    }

    /// Every field at its default
    pub fn defaults(&self) -> PromptValues {
        let mut values = PromptValues::default();
        for field in &self.fields {
            values.insert(field.key(), field.default_value());
        }
        values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptValue {
    Number(i64),
    Flag(bool),
    Choice(AffinityKey),
}

/// Filled field values by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptValues(BTreeMap<String, PromptValue>);

impl PromptValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: PromptValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: PromptValue) {
        self.0.insert(key.to_string(), value);
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(PromptValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(PromptValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn choice(&self, key: &str) -> Option<AffinityKey> {
        match self.0.get(key) {
            Some(PromptValue::Choice(c)) => Some(*c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Filled(PromptValues),
    Cancelled,
}

/// Source of user-supplied values
#[async_trait]
pub trait PromptPort: Send + Sync {
    /// Show `request` and wait for exactly one answer
    async fn prompt(&self, request: PromptRequest) -> PromptResponse;
}

/// Replays queued responses in order, then accepts defaults.
/// Every request is recorded.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    responses: Mutex<VecDeque<PromptResponse>>,
    requests: Mutex<Vec<PromptRequest>>,
}

impl ScriptedPrompt {
    pub fn new(responses: impl IntoIterator<Item = PromptResponse>) -> Self {
        ScriptedPrompt {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every fate prompt with `points`
    pub fn spending_fate(points: i64, times: usize) -> Self {
        let values = PromptValues::new().with(FATE_FIELD, PromptValue::Number(points));
        Self::new(std::iter::repeat(PromptResponse::Filled(values)).take(times))
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PromptPort for ScriptedPrompt {
    async fn prompt(&self, request: PromptRequest) -> PromptResponse {
        let scripted = self.responses.lock().pop_front();
        let response = scripted.unwrap_or_else(|| PromptResponse::Filled(request.defaults()));
        self.requests.lock().push(request);
        response
    }
}
