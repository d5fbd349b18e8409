//! Scripted collaborators for unit tests. No test talks to a real provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::llm_client::{LanguageModel, LlmError};
use crate::resolver::{Resolution, ResourceResolver, SearchError, VideoSearch, WebSearch};
use crate::schema::ResourceKind;

/// Language model that replays canned answers in order and records every prompt.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// (system, user) prompt of the `index`-th call.
    pub fn prompt(&self, index: usize) -> (String, String) {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 500,
                    message: "script exhausted".to_string(),
                })
            })
    }
}

/// Resolver that answers every lookup the same way and records the calls.
pub struct StubResolver {
    answer: Resolution,
    calls: Mutex<Vec<(String, ResourceKind, String)>>,
}

impl StubResolver {
    pub fn always(answer: Resolution) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, ResourceKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceResolver for StubResolver {
    async fn resolve(&self, topic: &str, kind: ResourceKind, context: &str) -> Resolution {
        self.calls
            .lock()
            .unwrap()
            .push((topic.to_string(), kind, context.to_string()));
        self.answer.clone()
    }
}

fn replay(result: &Result<Vec<String>, SearchError>) -> Result<Vec<String>, SearchError> {
    match result {
        Ok(items) => Ok(items.clone()),
        Err(SearchError::Api { status, message }) => Err(SearchError::Api {
            status: *status,
            message: message.clone(),
        }),
        Err(other) => Err(SearchError::Malformed(other.to_string())),
    }
}

pub struct StubVideoSearch {
    result: Result<Vec<String>, SearchError>,
    queries: Mutex<Vec<(String, u32)>>,
}

impl StubVideoSearch {
    pub fn returning(result: Result<Vec<String>, SearchError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<(String, u32)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for StubVideoSearch {
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<String>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        replay(&self.result)
    }
}

pub struct StubWebSearch {
    result: Result<Vec<String>, SearchError>,
    queries: Mutex<Vec<(String, usize, String)>>,
}

impl StubWebSearch {
    pub fn returning(result: Result<Vec<String>, SearchError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<(String, usize, String)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for StubWebSearch {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
        lang: &str,
    ) -> Result<Vec<String>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), num_results, lang.to_string()));
        replay(&self.result)
    }
}

/// Model answer for a `DomainAnalysis` with the given (title, skills) roles.
pub fn analysis_json(roles: &[(&str, Vec<&str>)]) -> String {
    let roles: Vec<_> = roles
        .iter()
        .map(|(title, skills)| {
            json!({
                "title": title,
                "description": format!("{title} work."),
                "required_skills": skills,
            })
        })
        .collect();
    json!({
        "domain_overview": ["An overview bullet."],
        "future_outlook_summary": ["A trend bullet."],
        "growth_areas": ["an area"],
        "emerging_roles": roles,
    })
    .to_string()
}

/// Model answer for a `LearningPath` whose n-th step has `types[n-1]` and topic "topic n".
pub fn path_json(types: &[&str]) -> String {
    let steps: Vec<_> = types
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            json!({
                "step": i + 1,
                "title": format!("Step {}", i + 1),
                "type": kind,
                "content": format!("topic {}", i + 1),
            })
        })
        .collect();
    json!({ "path": steps }).to_string()
}
