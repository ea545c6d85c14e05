//! Configuration management for sample conversion

use crate::audio::OddLengthPolicy;
use crate::decoder::DecoderKind;
use crate::error::{PcmHeaderError, Result};
use crate::header::is_c_identifier;
use crate::processing::FailurePolicy;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub decoder: DecoderConfig,
    pub header: HeaderConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub kind: DecoderKind,
    pub ffmpeg_path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Naming and placement of the generated array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub prefix: String,
    pub suffix: String,
    pub placement_include: String,
    pub placement_attribute: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub odd_length: OddLengthPolicy,
    pub on_error: FailurePolicy,
    /// Only convert files with these extensions. Empty converts everything.
    pub extensions: Vec<String>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("samples"),
            output_dir: PathBuf::from("converted"),
            decoder: DecoderConfig::default(),
            header: HeaderConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            kind: DecoderKind::Ffmpeg,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            sample_rate: 44100,
            channels: 1,
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            prefix: "audio_".to_string(),
            suffix: "_sample_data".to_string(),
            placement_include: "pico/platform/sections.h".to_string(),
            placement_attribute: "__in_flash".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            odd_length: OddLengthPolicy::Truncate,
            on_error: FailurePolicy::Abort,
            extensions: Vec::new(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn sample_rate(&self) -> u32 {
        self.decoder.sample_rate
    }

    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }

    /// Whether `path` passes the extension filter.
    pub fn accepts(&self, path: &Path) -> bool {
        if self.processing.extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.processing.extensions.iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pcmheader", about = "Convert audio samples into C headers for firmware", version, author)]
pub struct Args {
    #[arg(short = 'i', long = "input", help = "Directory of audio samples, walked recursively [default: samples]")]
    pub input: Option<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Directory for generated headers [default: converted]")]
    pub output: Option<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "decoder", value_enum, help = "Decoder backend [default: ffmpeg]")]
    pub decoder: Option<DecoderKind>,

    #[arg(long = "ffmpeg", help = "ffmpeg executable [default: ffmpeg]")]
    pub ffmpeg: Option<PathBuf>,

    #[arg(short = 'r', long = "sample-rate", help = "Output sample rate (Hz) [default: 44100]")]
    pub sample_rate: Option<u32>,

    #[arg(short = 'e', long = "extension", help = "Only convert files with this extension (repeatable)")]
    pub extensions: Vec<String>,

    #[arg(long = "strict", help = "Reject decoded PCM with an odd byte count instead of truncating")]
    pub strict: bool,

    #[arg(long = "keep-going", help = "Log failed files and continue with the rest")]
    pub keep_going: bool,

    #[arg(long = "init-config", help = "Write a default config file to this path and exit")]
    pub init_config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file.
    /// Arguments that were given override the file.
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        if let Some(input) = args.input {
            config.input_dir = input;
        }
        if let Some(output) = args.output {
            config.output_dir = output;
        }
        if let Some(kind) = args.decoder {
            config.decoder.kind = kind;
        }
        if let Some(ffmpeg) = args.ffmpeg {
            config.decoder.ffmpeg_path = ffmpeg;
        }
        if let Some(rate) = args.sample_rate {
            config.decoder.sample_rate = rate;
        }
        if !args.extensions.is_empty() {
            config.processing.extensions = args.extensions;
        }
        if args.strict {
            config.processing.odd_length = OddLengthPolicy::Reject;
        }
        if args.keep_going {
            config.processing.on_error = FailurePolicy::Skip;
        }
        config.processing.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PcmHeaderError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| PcmHeaderError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if self.decoder.sample_rate == 0 {
            return Err(PcmHeaderError::config("Sample rate must be greater than 0"));
        }
        if self.decoder.sample_rate > 192000 {
            return Err(PcmHeaderError::config("Sample rate cannot exceed 192000 Hz"));
        }

        // The header layout is a single mono array.
        if self.decoder.channels != 1 {
            return Err(PcmHeaderError::config("Only mono output (1 channel) is supported"));
        }

        if self.decoder.kind == DecoderKind::Ffmpeg && self.decoder.ffmpeg_path.as_os_str().is_empty() {
            return Err(PcmHeaderError::config("ffmpeg path cannot be empty"));
        }

        // A stem of "x" stands in for any sanitized file name.
        let sample_name = format!("{}x{}", self.header.prefix, self.header.suffix);
        if !is_c_identifier(&sample_name) {
            return Err(PcmHeaderError::config(format!(
                "Prefix {:?} and suffix {:?} do not form a valid C identifier",
                self.header.prefix, self.header.suffix
            )));
        }

        if self.header.placement_include.trim().is_empty() {
            return Err(PcmHeaderError::config("Placement include cannot be empty"));
        }
        if !is_c_identifier(&self.header.placement_attribute) {
            return Err(PcmHeaderError::config(format!(
                "Placement attribute {:?} is not a valid C identifier",
                self.header.placement_attribute
            )));
        }

        if self.processing.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            return Err(PcmHeaderError::config("Extension filter entries cannot be empty"));
        }

        // Headers written into the input directory would be read back as inputs.
        if let (Ok(input), Ok(output)) = (self.input_dir.canonicalize(), self.output_dir.canonicalize()) {
            if input == output {
                return Err(PcmHeaderError::config(format!(
                    "Input and output directories must differ: {}", input.display()
                )));
            }
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PcmHeaderError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PcmHeaderError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["pcmheader"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sample_rate(), 44100);
        assert_eq!(config.decoder.channels, 1);
        assert_eq!(config.decoder.kind, DecoderKind::Ffmpeg);
        assert_eq!(config.header.prefix, "audio_");
        assert_eq!(config.header.placement_attribute, "__in_flash");
        assert_eq!(config.processing.on_error, FailurePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.decoder.sample_rate = 0;
        assert!(config.validate().is_err());
        config.decoder.sample_rate = 44100;

        config.decoder.channels = 2;
        assert!(config.validate().is_err());
        config.decoder.channels = 1;

        config.header.prefix = "9audio_".to_string();
        assert!(config.validate().is_err());
        config.header.prefix = "audio-".to_string();
        assert!(config.validate().is_err());
        config.header.prefix = String::new();
        assert!(config.validate().is_ok());

        config.header.placement_attribute = "__in flash".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.decoder.sample_rate = 22050;
        config.processing.extensions = vec!["wav".to_string()];

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.sample_rate(), 22050);
        assert_eq!(loaded.processing.extensions, vec!["wav".to_string()]);
        assert_eq!(loaded.header.suffix, "_sample_data");
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[decoder]\nkind = \"wav\"\n\n[processing]\non_error = \"skip\"\n").unwrap();

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.decoder.kind, DecoderKind::Wav);
        assert_eq!(loaded.decoder.sample_rate, 44100);
        assert_eq!(loaded.processing.on_error, FailurePolicy::Skip);
        assert_eq!(loaded.input_dir, PathBuf::from("samples"));
    }

    #[test]
    fn test_args_override_only_when_given() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "output_dir = \"headers\"\n[decoder]\nsample_rate = 16000\n").unwrap();

        let config = Config::from_args_and_config(args(&[
            "-c", config_path.to_str().unwrap(),
            "-i", "sounds",
            "--strict",
            "--keep-going",
        ])).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("sounds"));
        assert_eq!(config.output_dir, PathBuf::from("headers"));
        assert_eq!(config.sample_rate(), 16000);
        assert_eq!(config.processing.odd_length, OddLengthPolicy::Reject);
        assert_eq!(config.processing.on_error, FailurePolicy::Skip);
    }

    #[test]
    fn test_invalid_args_rejected() {
        assert!(Config::from_args_and_config(args(&["-r", "0"])).is_err());
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let samples = temp_dir.path().join("samples");
        std::fs::create_dir_all(&samples).unwrap();

        let mut config = Config {
            input_dir: samples.clone(),
            output_dir: samples.join("."),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PcmHeaderError::Config { .. }));
        assert!(err.to_string().contains("must differ"));

        config.output_dir = samples.join("converted");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extension_filter() {
        let mut config = Config::default();
        assert!(config.accepts(Path::new("a/beep.wav")));
        assert!(config.accepts(Path::new("README")));

        config.processing.extensions = vec![".wav".to_string(), "mp3".to_string()];
        assert!(config.accepts(Path::new("a/beep.WAV")));
        assert!(config.accepts(Path::new("ten.mp3")));
        assert!(!config.accepts(Path::new("notes.txt")));
        assert!(!config.accepts(Path::new("README")));
    }
}
