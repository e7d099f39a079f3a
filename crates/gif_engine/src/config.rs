use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long the scan waits for the background store to answer.
    pub message_timeout: Duration,
    /// Page schemes the script executor refuses to touch.
    pub restricted_schemes: Vec<String>,
    pub export_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            message_timeout: Duration::from_secs(5),
            restricted_schemes: [
                "chrome",
                "chrome-extension",
                "edge",
                "about",
                "view-source",
                "devtools",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            export_dir: PathBuf::from("output"),
        }
    }
}

impl EngineConfig {
    pub fn default_with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            export_dir,
            ..Self::default()
        }
    }
}
