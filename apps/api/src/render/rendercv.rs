//! Production résumé renderer: shells out to `rendercv render` in a scratch directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{RenderError, ResumeRenderer};
use crate::llm_client::prompts::excerpt;

const INPUT_FILE: &str = "resume.yaml";
const OUTPUT_DIR: &str = "rendercv_output";
const STDERR_LIMIT: usize = 500;

pub struct RenderCvRenderer {
    bin: String,
}

impl RenderCvRenderer {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl ResumeRenderer for RenderCvRenderer {
    async fn render(&self, yaml: &str) -> Result<Bytes, RenderError> {
        // Dropped at the end of the call, removing every intermediate file.
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        tokio::fs::write(&input, yaml).await?;

        debug!("Running {} render in {}", self.bin, workdir.path().display());
        let output = Command::new(&self.bin)
            .arg("render")
            .arg(INPUT_FILE)
            .current_dir(workdir.path())
            .output()
            .await
            .map_err(|e| RenderError::Spawn {
                bin: self.bin.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("RenderCV exited with {}: {}", output.status, stderr.trim());
            return Err(RenderError::Failed {
                stderr: format!("{}...", excerpt(stderr.trim(), STDERR_LIMIT)),
            });
        }

        let output_dir = workdir.path().join(OUTPUT_DIR);
        let pdf_path = tokio::task::spawn_blocking(move || find_first_pdf(&output_dir))
            .await
            .map_err(|e| RenderError::Io(std::io::Error::other(e)))??
            .ok_or(RenderError::NoOutput)?;

        let pdf = tokio::fs::read(&pdf_path).await?;
        info!("RenderCV produced {} ({} bytes)", pdf_path.display(), pdf.len());
        Ok(Bytes::from(pdf))
    }
}

/// Depth-first search for the first `.pdf` file, visiting entries in name order.
fn find_first_pdf(dir: &Path) -> Result<Option<PathBuf>, std::io::Error> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if let Some(found) = find_first_pdf(&path)? {
                return Ok(Some(found));
            }
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_pdf_searches_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("resume.typ"), "x").unwrap();
        std::fs::write(nested.join("Ada_CV.pdf"), "%PDF").unwrap();

        let found = find_first_pdf(dir.path()).unwrap().unwrap();
        assert_eq!(found, nested.join("Ada_CV.pdf"));
    }

    #[test]
    fn test_find_first_pdf_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_first_pdf(&dir.path().join(OUTPUT_DIR)).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let renderer = RenderCvRenderer::new("definitely-not-a-real-rendercv-binary");
        let result = renderer.render("cv:\n  name: Ada\n").await;
        assert!(matches!(result, Err(RenderError::Spawn { .. })));
    }
}
