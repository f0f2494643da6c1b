use crate::common::{DomainError, DomainResult};
use crate::domains::navigation::{resolve_data_dir, FloorPlan, FloorPlanSource};
use std::fs;
use std::path::{Path, PathBuf};

/// Floor plans stored as `.toml` or `.json` files in one directory.
pub struct FilesystemFloorPlanSource {
    base: PathBuf,
}

impl FilesystemFloorPlanSource {
    /// `None` falls back to `resolve_data_dir`.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self {
            base: base.unwrap_or_else(resolve_data_dir),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Write `plan` as TOML under `name`, creating the directory if needed.
    pub fn save_floor_plan(&self, name: &str, plan: &FloorPlan) -> DomainResult<()> {
        if !self.base.exists() {
            fs::create_dir_all(&self.base).map_err(io_error)?;
        }
        let content = toml::to_string_pretty(plan)
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        fs::write(self.base.join(name), content).map_err(io_error)
    }
}

impl FloorPlanSource for FilesystemFloorPlanSource {
    fn load_floor_plan(&self, name: &str) -> DomainResult<FloorPlan> {
        let path = self.base.join(name);
        let content = fs::read_to_string(&path).map_err(|e| {
            DomainError::InfrastructureError(format!("{}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => FloorPlan::from_json_str(&content),
            _ => FloorPlan::from_toml_str(&content),
        }
    }

    fn available_floor_plans(&self) -> DomainResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.base)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("toml") | Some("json")
                )
            })
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::InfrastructureError(e.to_string())
}
