// src/services/mod.rs
pub mod chatbot;
pub mod completion;
pub mod content_store;
pub mod generator;
pub mod translator;
