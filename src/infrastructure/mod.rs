pub mod database;
pub mod gemini;
