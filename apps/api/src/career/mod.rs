// Career advisor: every prompt the application sends to the language model.
// Transport lives in llm_client; this module decides what to ask and how to
// degrade when the answer is missing or unusable.

pub mod chat;
pub mod prompts;
pub mod recommendations;
pub mod resume_parser;
pub mod roadmap;
pub mod skill_gap;

use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Stateless facade over the text generator. Cheap to clone.
#[derive(Clone)]
pub struct CareerAdvisor {
    llm: Arc<dyn TextGenerator>,
}

impl CareerAdvisor {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }
}
