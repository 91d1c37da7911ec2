// ABOUTME: Shared types and configuration for splitbox.
// ABOUTME: Defines background colors, drag tuning, and config file handling.

pub mod color;
pub mod config;

pub use color::Color;
pub use config::{CodecSettings, ConfigError, EditorConfig, Palette, ResizeSettings};
