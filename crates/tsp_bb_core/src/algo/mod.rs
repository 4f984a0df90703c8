pub mod circle;
pub mod progress;
mod state;
