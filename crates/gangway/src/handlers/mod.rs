pub mod gemini;
pub mod models;
pub mod qwen;
pub mod utils;
pub mod veo;
