use std::{
    fs,
    path::{Path, PathBuf},
};

use icy_bitsy::{DEFAULT_FONT_SIZE, DEFAULT_MAX_BLACK, DEFAULT_MIN_WHITE, preview::DEFAULT_SAMPLE_TEXT};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "icy_bitsy";
const OPTIONS_FILE: &str = "options.toml";

/// Persistent conversion defaults, overridden by command line flags.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Options {
    pub font_size: u32,
    pub min_white: u8,
    pub max_black: u8,

    /// Restrict every conversion to these characters
    pub restrict_text: Option<String>,

    pub sample_text: String,

    /// Directory for converted fonts, the working directory if empty
    pub output_dir: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            min_white: DEFAULT_MIN_WHITE,
            max_black: DEFAULT_MAX_BLACK,
            restrict_text: None,
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
            output_dir: String::new(),
        }
    }
}

impl Options {
    pub fn load_options() -> Self {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "GitHub", APP_NAME) {
            if !proj_dirs.config_dir().exists() && fs::create_dir_all(proj_dirs.config_dir()).is_err() {
                log::error!("Can't create configuration directory {:?}", proj_dirs.config_dir());
                return Self::default();
            }
            return Self::load_from(&proj_dirs.config_dir().join(OPTIONS_FILE));
        }
        Self::default()
    }

    /// Read options from `path`. A missing or broken file gives the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no options file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(txt) => Self::parse(&txt).unwrap_or_else(|err| {
                log::error!("Error parsing options file {}: {}", path.display(), err);
                Self::default()
            }),
            Err(err) => {
                log::error!("Error reading options file: {}", err);
                Self::default()
            }
        }
    }

    pub fn parse(txt: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(txt)
    }

    pub fn store_options(&self) {
        let Some(dir) = Self::get_config_dir() else {
            log::error!("No configuration directory available");
            return;
        };
        match toml::to_string(self) {
            Ok(text) => {
                if let Err(err) = fs::write(dir.join(OPTIONS_FILE), text) {
                    log::error!("Error writing options file: {}", err);
                }
            }
            Err(err) => log::error!("Error writing options file: {}", err),
        }
    }

    /// Returns the configuration directory path
    pub fn get_config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "GitHub", APP_NAME).map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
    }

    /// Returns the log directory path, creating it if needed
    pub fn get_log_dir() -> Option<PathBuf> {
        let dir = Self::get_config_dir()?;
        if !dir.exists() {
            fs::create_dir_all(&dir).ok()?;
        }
        Some(dir)
    }

    /// Where a font called `name` is written when no output path is given.
    pub fn output_path(&self, name: &str) -> PathBuf {
        let file_name = format!("{name}.{}", icy_bitsy::BITSYFONT_EXTENSION);
        if self.output_dir.is_empty() {
            PathBuf::from(file_name)
        } else {
            Path::new(&self.output_dir).join(file_name)
        }
    }
}
