pub mod gate;
pub mod gemini;
pub mod generator;
pub mod session;
pub mod store;
pub mod viewer;
