//! Shared test helpers.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::provider::{Completion, GenerationOptions, LlmProvider};

/// A mock provider that replays a script of replies.
///
/// Each call to `generate` pops the next entry; `Err` entries surface as
/// provider errors. An exhausted script also yields a provider error.
/// Every prompt and option set is recorded for assertions.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<(String, GenerationOptions)>>,
}

impl ScriptedProvider {
    pub fn new<'a, I>(script: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<&'a str, &'a str>>,
    {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompt(&self, index: usize) -> Option<String> {
        self.calls.lock().unwrap().get(index).map(|(p, _)| p.clone())
    }

    pub fn options(&self, index: usize) -> Option<GenerationOptions> {
        self.calls.lock().unwrap().get(index).map(|(_, o)| o.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<Completion> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(Completion::text(text, &options.model)),
            Some(Err(message)) => Err(AgentError::Provider(message)),
            None => Err(AgentError::Provider("script exhausted".into())),
        }
    }
}
