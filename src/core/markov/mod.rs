// Core Markov module - word chain model plus the shared service around it.

pub mod markov_model;
pub mod markov_service;

pub use markov_service::{MarkovService, DEFAULT_MAX_WORDS};
