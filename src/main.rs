//! pcmheader - convert audio samples into C headers

use clap::Parser;
use std::process;
use pcmheader::{init_logging, Args, Config, PcmHeaderError, Result, SampleConverter};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.verbose {
        println!("{}", pcmheader::get_library_info());
        println!();
    }

    if let Some(path) = &args.init_config {
        Config::create_default_config(path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = Config::from_args_and_config(args)?;

    println!("=== pcmheader ===");
    println!("Input: {}", config.input_dir.display());
    println!("Output: {}", config.output_dir.display());
    println!("Decoder: {:?} @ {} Hz", config.decoder.kind, config.sample_rate());
    println!("=================\n");

    let verbose = config.verbose();
    let converter = SampleConverter::from_config(config);
    let summary = converter.convert_dir()?;

    println!("=== Conversion Complete ===");
    println!("Converted: {}", summary.converted.len());
    println!("Samples: {}", summary.total_samples());
    println!("Time: {:.2}s", summary.elapsed.as_secs_f64());
    if verbose {
        for report in &summary.converted {
            println!("  {} ({} samples{})",
                     report.output.display(),
                     report.sample_count,
                     if report.silent { ", silent" } else { "" });
        }
    }

    if !summary.is_success() {
        for failure in &summary.failures {
            eprintln!("Failed: {}", failure);
        }
        return Err(PcmHeaderError::processing(format!(
            "{} file(s) failed", summary.failures.len()
        )));
    }

    Ok(())
}
