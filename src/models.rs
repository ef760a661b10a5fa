pub mod craft;
pub mod game;
pub mod gemini;
pub mod render;
