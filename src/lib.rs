//! Inbox Triage: email classification and auto-reply drafting.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod reply;
