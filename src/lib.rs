//! Scam Sentry - Scam Detection & Honeypot Engagement Engine
//!
//! This crate analyzes inbound text messages for fraud signals, extracts
//! forensic identifiers, profiles sender behavior, and drives a persona-based
//! conversational agent that keeps fraudsters engaged while harvesting
//! intelligence.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
