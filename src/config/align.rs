use crate::align::AlignOptions;
use crate::matching::MatchOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct AlignReplayConfig {
    /// Plan written by `wall_plan`; must carry a target point.
    pub plan: PathBuf,
    /// Inner crop of the picture being hung (without its frame), in
    /// rectified scale. This is what gets matched.
    pub template: PathBuf,
    /// Outer crop including the frame; only its size is used, for the target
    /// frame overlay. Defaults to the template size.
    #[serde(default)]
    pub external_crop: Option<PathBuf>,
    /// Directory of captured frames, replayed in file-name order.
    pub frames: PathBuf,
    #[serde(default)]
    pub align: AlignOptions,
    #[serde(default)]
    pub matching: MatchOptions,
    /// Annotated rectified frames are written here when set.
    #[serde(default)]
    pub annotated_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<AlignReplayConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_for_tuning_sections() {
        let cfg: AlignReplayConfig = serde_json::from_str(
            r#"{ "plan": "plan.json", "template": "crop.png", "frames": "live/" }"#,
        )
        .unwrap();
        assert!((cfg.align.tolerance_px - 1.0).abs() < 1e-12);
        assert_eq!(cfg.matching.pyramid_levels, MatchOptions::default().pyramid_levels);
        assert!(cfg.annotated_dir.is_none());
        assert!(cfg.external_crop.is_none());
    }

    #[test]
    fn missing_config_file_reports_path() {
        let err = load_config(Path::new("/no/such/align.json")).unwrap_err();
        assert!(err.starts_with("Failed to read config /no/such/align.json"));
    }
}
