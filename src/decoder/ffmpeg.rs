//! ffmpeg-backed decoder

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use log::debug;
use crate::decoder::Decoder;
use crate::error::{PcmHeaderError, Result};

/// Lines of ffmpeg stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    program: PathBuf,
    scratch_dir: PathBuf,
    sample_rate: u32,
    channels: u16,
}

impl FfmpegDecoder {
    pub fn new(program: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>, sample_rate: u32, channels: u16) -> Self {
        Self {
            program: program.into(),
            scratch_dir: scratch_dir.into(),
            sample_rate,
            channels,
        }
    }

    pub fn command_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(14);
        args.push("-i".into());
        args.push(input.into());
        args.extend(["-f", "s16le", "-acodec", "pcm_s16le"].map(OsString::from));
        args.push("-ar".into());
        args.push(self.sample_rate.to_string().into());
        args.push("-ac".into());
        args.push(self.channels.to_string().into());
        args.push("-y".into());
        args.push(output.into());
        args
    }
}

impl Decoder for FfmpegDecoder {
    fn decode(&self, input: &Path) -> Result<Vec<u8>> {
        std::fs::create_dir_all(&self.scratch_dir)?;

        // Unique per call; removed when dropped, whatever happens below.
        let scratch = tempfile::Builder::new()
            .prefix(".pcmheader-")
            .suffix(".raw")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| PcmHeaderError::decode(format!("Cannot create scratch file: {}", e)))?
            .into_temp_path();

        let args = self.command_args(input, &scratch);
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PcmHeaderError::decode(format!("Failed to run {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            return Err(PcmHeaderError::decode(format!(
                "{} exited with {}: {}",
                self.program.display(), output.status, tail
            )));
        }

        std::fs::read(&scratch)
            .map_err(|e| PcmHeaderError::decode(format!("Cannot read decoded PCM: {}", e)))
    }
}
