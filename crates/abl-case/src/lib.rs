//! abl-case: case file format and validation.
//!
//! A case is a directory holding `case.yaml` and one sub-directory per
//! time (`0/`, `100/`, ...) with the field files.

pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use schema::*;
pub use validate::{ValidationError, validate_case};

pub const CASE_FILE: &str = "case.yaml";

pub type CaseResult<T> = Result<T, CaseError>;

#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn from_yaml_str(content: &str) -> CaseResult<CaseDef> {
    let case: CaseDef = serde_yaml::from_str(content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn load_yaml(path: &Path) -> CaseResult<CaseDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, case: &CaseDef) -> CaseResult<()> {
    validate_case(case)?;
    std::fs::write(path, serde_yaml::to_string(case)?)?;
    Ok(())
}

/// A loaded case and the directory it lives in.
#[derive(Debug, Clone)]
pub struct Case {
    pub root: PathBuf,
    pub def: CaseDef,
}

impl Case {
    pub fn load(root: &Path) -> CaseResult<Self> {
        let def = load_yaml(&root.join(CASE_FILE))?;
        tracing::info!(case = %def.name, root = %root.display(), "loaded case");
        Ok(Self {
            root: root.to_path_buf(),
            def,
        })
    }

    /// Directory of the initial fields.
    pub fn start_dir(&self) -> PathBuf {
        self.root.join(&self.def.start_time)
    }

    pub fn time_dir(&self, time: &str) -> PathBuf {
        self.root.join(time)
    }
}
