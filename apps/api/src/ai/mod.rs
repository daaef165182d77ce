// AI layer: prompt templates, typed model answers and the operations built on them.
// All model calls go through llm_client. Nothing here talks to the provider directly.

pub mod models;
pub mod prompts;
pub mod ranking;
pub mod service;
