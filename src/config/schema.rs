use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Display settings read from `config.yaml`.
///
/// Grade percentages, criterion weights and the approval threshold are fixed
/// in the scoring module and cannot be set here.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Color theme: auto (detect terminal background), dark or light
    #[serde(default)]
    pub theme: ThemeSetting,

    /// Heading printed at the top of reports
    #[serde(default)]
    pub institution: Option<String>,

    /// Directory printable reports are written to (default: system temp dir)
    #[serde(default)]
    pub report_dir: Option<PathBuf>,

    /// How long status messages stay visible, e.g. "3s" or "1500ms"
    #[serde(default)]
    pub flash_duration: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    #[default]
    Auto,
    Dark,
    Light,
}
