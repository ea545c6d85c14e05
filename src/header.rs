//! C header generation
//!
//! Produces the fixed layout consumed by the firmware build:
//!
//! ```text
//! // This file was generated by a script on 16-10-2026 09:30:00
//!
//! #pragma once
//!
//! #include <stddef.h>
//! #include <stdint.h>
//! #include <pico/platform/sections.h>
//!
//! static const int16_t __in_flash("audio_beep_sample_data") audio_beep_sample_data[] = { 0, 32767 };
//!
//! static const size_t audio_beep_sample_data_length = sizeof(audio_beep_sample_data) / sizeof(audio_beep_sample_data[0]);
//! ```

use std::io::{self, Write};
use log::warn;
use time::macros::format_description;
use time::OffsetDateTime;
use crate::config::HeaderConfig;
use crate::error::{PcmHeaderError, Result};

pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Array name for an input file stem, e.g. `beep` -> `audio_beep_sample_data`.
pub fn identifier_for(stem: &str, naming: &HeaderConfig) -> Result<String> {
    let raw = format!("{}{}{}", naming.prefix, stem, naming.suffix);

    let mut name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    if name != raw {
        warn!("Sanitized identifier {:?} to {}", raw, name);
    }

    if !is_c_identifier(&name) {
        return Err(PcmHeaderError::identifier(raw));
    }
    Ok(name)
}

pub fn format_timestamp(at: OffsetDateTime) -> Result<String> {
    let format = format_description!("[day]-[month]-[year] [hour]:[minute]:[second]");
    Ok(at.format(format)?)
}

/// Local wall-clock time, or UTC when the local offset cannot be determined.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Header file name for an array identifier.
pub fn file_name(identifier: &str) -> String {
    format!("{}.h", identifier)
}

#[derive(Debug, Clone)]
pub struct HeaderFile<'a> {
    pub name: &'a str,
    pub samples: &'a [i16],
    pub placement_include: &'a str,
    pub placement_attribute: &'a str,
}

impl<'a> HeaderFile<'a> {
    pub fn new(name: &'a str, samples: &'a [i16], config: &'a HeaderConfig) -> Self {
        Self {
            name,
            samples,
            placement_include: &config.placement_include,
            placement_attribute: &config.placement_attribute,
        }
    }

    pub fn render_to<W: Write>(&self, out: &mut W, timestamp: &str) -> io::Result<()> {
        let name = self.name;

        writeln!(out, "// This file was generated by a script on {}", timestamp)?;
        writeln!(out)?;
        writeln!(out, "#pragma once")?;
        writeln!(out)?;
        writeln!(out, "#include <stddef.h>")?;
        writeln!(out, "#include <stdint.h>")?;
        writeln!(out, "#include <{}>", self.placement_include)?;
        writeln!(out)?;

        write!(out, "static const int16_t {}(\"{}\") {}[] = {{ ", self.placement_attribute, name, name)?;
        for (i, sample) in self.samples.iter().enumerate() {
            if i > 0 {
                out.write_all(b", ")?;
            }
            write!(out, "{}", sample)?;
        }
        writeln!(out, " }};")?;
        writeln!(out)?;

        writeln!(out, "static const size_t {name}_length = sizeof({name}) / sizeof({name}[0]);")
    }
}
