use crate::paint::settings::CanvasSettings;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const CANVAS_SETTINGS_FILE_NAME: &str = "canvas_settings.json";

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(CANVAS_SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Loads settings next to the executable, falling back to defaults.
pub fn load() -> Result<CanvasSettings> {
    let path = resolve_settings_path()?;
    Ok(load_from_path(&path)?.unwrap_or_default())
}

pub fn save(settings: &CanvasSettings) -> Result<PathBuf> {
    let path = resolve_settings_path()?;
    save_to_path(&path, settings)?;
    Ok(path)
}

pub fn load_from_path(path: &Path) -> Result<Option<CanvasSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read canvas settings file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Some(CanvasSettings::default()));
    }

    let mut loaded: CanvasSettings = serde_json::from_str(&content)
        .with_context(|| format!("deserialize canvas settings file {}", path.display()))?;
    loaded.sanitize();
    Ok(Some(loaded))
}

pub fn save_to_path(path: &Path, settings: &CanvasSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create canvas settings folder {}", parent.display()))?;
    }

    let mut sanitized = settings.clone();
    sanitized.sanitize();
    let json =
        serde_json::to_string_pretty(&sanitized).context("serialize canvas settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write canvas settings file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{load_from_path, save_to_path, settings_path_from_exe_path, CANVAS_SETTINGS_FILE_NAME};
    use crate::paint::model::{Brush, Rgb};
    use crate::paint::settings::CanvasSettings;
    use std::path::Path;

    #[test]
    fn settings_path_is_resolved_next_to_executable() {
        let exe = Path::new("/tmp/myapp/bin/scribble-replay");
        let path = settings_path_from_exe_path(exe).expect("path");
        assert_eq!(
            path,
            Path::new("/tmp/myapp/bin").join(CANVAS_SETTINGS_FILE_NAME)
        );
    }

    #[test]
    fn load_returns_none_when_file_is_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
        assert_eq!(load_from_path(&path).expect("load"), None);
    }

    #[test]
    fn empty_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
        std::fs::write(&path, "  \n").expect("write empty file");
        assert_eq!(
            load_from_path(&path).expect("load"),
            Some(CanvasSettings::default())
        );
    }

    #[test]
    fn store_roundtrip_serialization() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(CANVAS_SETTINGS_FILE_NAME);

        let settings = CanvasSettings {
            width: 640,
            height: 480,
            brush: Brush::new(Rgb::new(1, 2, 3), 7.0),
            history_limit: 12,
            ..CanvasSettings::default()
        };

        save_to_path(&path, &settings).expect("save settings");
        let loaded = load_from_path(&path).expect("load settings");
        assert_eq!(loaded, Some(settings));
    }

    #[test]
    fn malformed_file_reports_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write");
        let err = load_from_path(&path).expect_err("malformed settings");
        assert!(format!("{err:#}").contains(CANVAS_SETTINGS_FILE_NAME));
    }
}
