// ── EditorConfig ──────────────────────────────────────────────────────────────

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown flag `{0}`")]
    UnknownFlag(String),
    #[error("flag `{0}` needs a value")]
    MissingValue(&'static str),
    #[error("flag `{flag}` expects a positive number, got `{value}`")]
    BadNumber { flag: &'static str, value: String },
}

/// Startup settings for the editor window and its save directory.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Directory holding the saved map collection and session.
    pub data_dir: PathBuf,
    /// Folder scanned recursively for `.png` textures.
    pub assets: Option<PathBuf>,
    /// Map played at startup when it exists in the saved collection.
    pub start_map: String,
    /// Fixed update rate.
    pub ups: u32,
    /// Width of the inspector sidebar in pixels.
    pub inspector_width: f32,
    /// Allows F1 to toggle the debug line.
    pub debug: bool,
    /// When false, maps live in memory only and nothing touches disk.
    pub persist: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: "gridkeeper".into(),
            width: 1280,
            height: 720,
            data_dir: PathBuf::from("./saves"),
            assets: None,
            start_map: "startMap".into(),
            ups: 60,
            inspector_width: 260.0,
            debug: false,
            persist: true,
        }
    }
}

impl EditorConfig {
    /// Parse command-line flags (without the program name) over the defaults.
    ///
    /// ```text
    /// --data-dir <dir>   --assets <dir>   --start-map <name>
    /// --ups <n>          --debug          --no-persist
    /// ```
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => cfg.debug = true,
                "--no-persist" => cfg.persist = false,
                "--data-dir" => cfg.data_dir = value(&mut args, "--data-dir")?.into(),
                "--assets" => cfg.assets = Some(value(&mut args, "--assets")?.into()),
                "--start-map" => cfg.start_map = value(&mut args, "--start-map")?,
                "--ups" => {
                    let raw = value(&mut args, "--ups")?;
                    cfg.ups = match raw.parse::<u32>() {
                        Ok(n) if n > 0 => n,
                        _ => return Err(ConfigError::BadNumber { flag: "--ups", value: raw }),
                    };
                }
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }
        Ok(cfg)
    }

    /// Seconds per fixed update.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.ups.max(1) as f32
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ConfigError> {
    args.next().filter(|v| !v.starts_with("--")).ok_or(ConfigError::MissingValue(flag))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
