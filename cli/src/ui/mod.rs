mod render;
mod spinner;

pub use render::TerminalRenderer;
