//! Directory walk and batch conversion

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use crate::error::{PcmHeaderError, Result};
use super::{FileReport, SampleConverter};

/// What a batch does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure. Headers already written stay in place.
    #[default]
    Abort,
    /// Log the failure and carry on with the next file.
    Skip,
}

#[derive(Debug)]
pub struct BatchSummary {
    pub converted: Vec<FileReport>,
    pub failures: Vec<PcmHeaderError>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.converted.iter().map(|r| r.sample_count).sum()
    }
}

/// Regular files under `dir`, recursively, in sorted order.
///
/// `skip` (typically the output directory) is not descended into when it
/// lies inside `dir`. Directory symlinks are not followed.
pub fn collect_inputs(dir: &Path, skip: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PcmHeaderError::config(format!(
            "Input directory does not exist: {}", dir.display()
        )));
    }

    let skip = skip.and_then(|p| p.canonicalize().ok());
    let mut files = Vec::new();
    walk(dir, skip.as_deref(), &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, skip: Option<&Path>, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if skip.is_some() && path.canonicalize().ok().as_deref() == skip {
                debug!("Skipping output directory {}", path.display());
                continue;
            }
            walk(&path, skip, files)?;
        } else if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            files.push(path);
        }
    }

    Ok(())
}

impl SampleConverter {
    /// Convert every accepted file under the configured input directory.
    pub fn convert_dir(&self) -> Result<BatchSummary> {
        let start = Instant::now();
        let config = self.config();

        fs::create_dir_all(&config.output_dir)?;

        let inputs: Vec<PathBuf> = collect_inputs(&config.input_dir, Some(&config.output_dir))?
            .into_iter()
            .filter(|p| config.accepts(p))
            .collect();
        info!("Converting {} file(s) from {} into {}",
              inputs.len(), config.input_dir.display(), config.output_dir.display());

        // Header path -> input that produced it.
        let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut converted = Vec::new();
        let mut failures = Vec::new();

        for input in inputs {
            match self.convert_unclaimed(&written, &input) {
                Ok(report) => {
                    written.insert(report.output.clone(), input);
                    converted.push(report);
                }
                Err(e) => match config.processing.on_error {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        warn!("Skipping after failure: {}", e);
                        failures.push(e);
                    }
                },
            }
        }

        Ok(BatchSummary { converted, failures, elapsed: start.elapsed() })
    }

    /// Convert `input` unless an earlier input in this run already wrote its header.
    fn convert_unclaimed(&self, written: &HashMap<PathBuf, PathBuf>, input: &Path) -> Result<FileReport> {
        let (identifier, output) = self.output_for(input).map_err(|e| e.in_file(input))?;

        if let Some(previous) = written.get(&output) {
            return Err(PcmHeaderError::DuplicateOutput { output, previous: previous.clone() }.in_file(input));
        }
        self.convert_resolved(input, identifier, output)
    }
}
