// Discord-backed implementation of the history source.

pub mod serenity_source;

pub use serenity_source::{to_chat_message, SerenityMessageSource};
