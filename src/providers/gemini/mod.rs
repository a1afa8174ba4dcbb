mod advisor;
mod client;
mod prompts;

pub use client::GeminiClient;
