use crate::core::ArtifactSource;
use crate::domain::model::ContractArtifact;
use crate::utils::error::{DeployError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Looks up `<Name>.sol/<Name>.json` anywhere below the artifacts root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                // build-info 只有編譯器輸入，不含產物
                if path.file_name().and_then(|n| n.to_str()) == Some("build-info") {
                    continue;
                }
                if let Some(found) = self.find(&path, file_name)? {
                    return Ok(Some(found));
                }
            } else if path.file_name().and_then(|n| n.to_str()) == Some(file_name) {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }
}

impl ArtifactSource for ArtifactStore {
    fn load(&self, name: &str) -> Result<ContractArtifact> {
        let file_name = format!("{}.json", name);
        let path = self
            .find(&self.root, &file_name)?
            .ok_or_else(|| DeployError::ArtifactNotFound {
                name: name.to_string(),
                search_path: self.root.display().to_string(),
            })?;

        tracing::debug!("Loading artifact from {}", path.display());
        let content = fs::read_to_string(&path)?;
        let artifact: ContractArtifact = serde_json::from_str(&content)?;

        if artifact.contract_name != name {
            return Err(DeployError::ArtifactNotFound {
                name: name.to_string(),
                search_path: path.display().to_string(),
            });
        }

        Ok(artifact)
    }
}
