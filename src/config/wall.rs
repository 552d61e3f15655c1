use crate::session::AnalyzerParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WallOutputConfig {
    pub rectified_image: Option<PathBuf>,
    pub borders_image: Option<PathBuf>,
    pub slices_image: Option<PathBuf>,
    pub grid_image: Option<PathBuf>,
    pub plan_json: Option<PathBuf>,
}

/// Which slice to lay the grid on and, optionally, where the operator
/// clicked inside it (rectified pixels).
#[derive(Clone, Debug, Deserialize)]
pub struct SelectionConfig {
    pub slice: usize,
    #[serde(default)]
    pub click: Option<[f64; 2]>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WallPlanConfig {
    pub input: PathBuf,
    /// Four corners in any order; detection runs when absent.
    #[serde(default)]
    pub corners: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub selection: Option<SelectionConfig>,
    #[serde(default)]
    pub params: AnalyzerParams,
    #[serde(default)]
    pub output: WallOutputConfig,
}

pub fn load_config(path: &Path) -> Result<WallPlanConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: WallPlanConfig = serde_json::from_str(r#"{ "input": "wall.jpg" }"#).unwrap();
        assert_eq!(cfg.input, PathBuf::from("wall.jpg"));
        assert!(cfg.corners.is_none());
        assert_eq!(cfg.params.rectify.output_width, 800);
        assert_eq!(cfg.params.grid.lines, 5);
    }

    #[test]
    fn nested_sections_fill_missing_fields() {
        let cfg: WallPlanConfig = serde_json::from_str(
            r#"{
                "input": "wall.jpg",
                "corners": [[10, 10], [600, 12], [598, 470], [8, 468]],
                "selection": { "slice": 2, "click": [120.5, 40] },
                "params": { "classifier": {}, "rectify": { "output_width": 640 } },
                "output": { "plan_json": "out/plan.json" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.corners.as_ref().map(Vec::len), Some(4));
        assert_eq!(cfg.params.rectify.output_width, 640);
        assert!((cfg.params.classifier.margin_fraction - 0.2).abs() < 1e-12);
        let sel = cfg.selection.unwrap();
        assert_eq!(sel.slice, 2);
        assert_eq!(sel.click, Some([120.5, 40.0]));
        assert!(cfg.output.grid_image.is_none());
    }
}
