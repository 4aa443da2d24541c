//! Terminal surface: home view, scripted walkthrough and interactive wizard.

pub mod app;
pub mod ui;

pub use app::{Action, App, View};
