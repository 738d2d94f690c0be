mod app;
mod args;
mod config;
mod input;
mod ui;

pub use app::Application;
pub use config::{AdvisorConfig, AdvisorConfigBuilder};
pub use input::{InputSource, StdinInputSource, VecInputSource};
pub use ui::TerminalRenderer;
