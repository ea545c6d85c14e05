//! Per-file conversion pipeline

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::{debug, info};
use crate::audio::{normalize_peak, PcmBuffer};
use crate::config::Config;
use crate::decoder::{build_decoder, Decoder};
use crate::error::{PcmHeaderError, Result};
use crate::header::{self, HeaderFile};

/// Outcome of converting one input file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub identifier: String,
    pub sample_count: usize,
    /// Peak magnitude before normalization.
    pub peak: u16,
    pub silent: bool,
    pub trailing_bytes: usize,
}

pub struct SampleConverter {
    config: Config,
    decoder: Box<dyn Decoder>,
}

impl SampleConverter {
    pub fn new(config: Config, decoder: Box<dyn Decoder>) -> Self {
        Self { config, decoder }
    }

    /// Use the decoder backend selected in `config`.
    pub fn from_config(config: Config) -> Self {
        let decoder = build_decoder(&config);
        Self { config, decoder }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Identifier and header path for `input`.
    pub fn output_for(&self, input: &Path) -> Result<(String, PathBuf)> {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| PcmHeaderError::identifier(input.display().to_string()))?;

        let identifier = header::identifier_for(&stem, &self.config.header)?;
        let output = self.config.output_dir.join(header::file_name(&identifier));
        Ok((identifier, output))
    }

    /// Convert one file, stamping the header with the current time.
    pub fn convert_file(&self, input: &Path) -> Result<FileReport> {
        let (identifier, output) = self.output_for(input).map_err(|e| e.in_file(input))?;
        self.convert_resolved(input, identifier, output)
    }

    /// Convert one file with an explicit timestamp line. Errors name `input`.
    pub fn convert_file_at(&self, input: &Path, timestamp: &str) -> Result<FileReport> {
        self.output_for(input)
            .and_then(|(identifier, output)| self.run(input, identifier, output, timestamp))
            .map_err(|e| e.in_file(input))
    }

    /// Convert `input` into an identifier and header path already resolved
    /// by `output_for`.
    pub(crate) fn convert_resolved(&self, input: &Path, identifier: String, output: PathBuf) -> Result<FileReport> {
        header::format_timestamp(header::now())
            .and_then(|timestamp| self.run(input, identifier, output, &timestamp))
            .map_err(|e| e.in_file(input))
    }

    fn run(&self, input: &Path, identifier: String, output: PathBuf, timestamp: &str) -> Result<FileReport> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let bytes = self.decoder.decode(input)?;
        debug!("Decoded {}: {} bytes", input.display(), bytes.len());

        let pcm = PcmBuffer::from_le_bytes(&bytes);
        pcm.validate(self.config.processing.odd_length)?;

        let normalized = normalize_peak(&pcm.samples)?;

        let header = HeaderFile::new(&identifier, &normalized.samples, &self.config.header);
        self.write_header(&header, &output, timestamp)?;

        info!("{} -> {} ({} samples, peak {})",
              input.display(), output.display(), normalized.samples.len(), normalized.peak);

        Ok(FileReport {
            input: input.to_path_buf(),
            output,
            identifier,
            sample_count: normalized.samples.len(),
            peak: normalized.peak,
            silent: normalized.silent,
            trailing_bytes: pcm.trailing_bytes,
        })
    }

    /// Render next to the destination and move into place, so a failed
    /// write never leaves a partial header behind.
    fn write_header(&self, header: &HeaderFile<'_>, output: &Path, timestamp: &str) -> Result<()> {
        let staging = tempfile::Builder::new()
            .prefix(".pcmheader-")
            .suffix(".h.tmp")
            .tempfile_in(&self.config.output_dir)?;

        let mut writer = BufWriter::new(staging);
        header.render_to(&mut writer, timestamp)?;
        writer.flush()?;

        let staging = writer
            .into_inner()
            .map_err(|e| PcmHeaderError::io(e.to_string()))?;
        staging
            .persist(output)
            .map_err(|e| PcmHeaderError::io(format!("Cannot write {}: {}", output.display(), e)))?;
        Ok(())
    }
}
