//! Loyalty Customer Analysis API Library
//!
//! This library provides the core functionality for the loyalty analysis
//! service: prompt construction, the chat completion client, extraction of the
//! structured segment data from model output, and the HTTP handlers.
//!
//! # Modules
//!
//! - `api`: Router assembly and API-layer namespace.
//! - `core`: Core analysis logic.
//! - `integrations`: External service integrations.
//! - `analysis`: Analysis orchestration (prompt, completion, extraction).
//! - `completion_client`: Chat completion API client.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `extraction`: Sentinel-delimited JSON extraction.
//! - `handlers`: HTTP request handlers.
//! - `models`: Request/response data models.
//! - `openapi`: OpenAPI document.
//! - `prompt`: System and user prompt construction.

pub mod api;
pub mod core;
pub mod integrations;

pub mod analysis;
pub mod completion_client;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod prompt;
