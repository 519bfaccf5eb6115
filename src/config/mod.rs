//! Configuration for Inkline
//!
//! Settings describe how the editor is mounted and what its toolbar and
//! variable buttons offer. They persist as JSON in the platform config
//! directory and always load, falling back to defaults.

mod persistence;
mod settings;

pub use persistence::{
    get_config_dir, get_config_file_path, load_config, load_config_from, save_config,
    save_config_silent, save_config_to,
};
pub use settings::{Settings, Theme, Variable, WindowSize};
