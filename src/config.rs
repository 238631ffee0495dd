use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::text::MeasureMode;

/// Flags that can be saved as defaults.
///
/// Booleans only ever switch behavior on; options set in a later layer
/// replace earlier ones.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    pub auto_font_size: bool,
    pub wrap_labels: bool,
    pub smart_ceiling: bool,
    pub png: bool,
    pub verbose: bool,
    pub min_font_size: Option<f64>,
    pub max_font_size: Option<f64>,
    pub dpi: Option<u32>,
    pub measure: Option<MeasureMode>,
    pub layer_attribute: Option<String>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            auto_font_size: self.auto_font_size || other.auto_font_size,
            wrap_labels: self.wrap_labels || other.wrap_labels,
            smart_ceiling: self.smart_ceiling || other.smart_ceiling,
            png: self.png || other.png,
            verbose: self.verbose || other.verbose,
            min_font_size: other.min_font_size.or(self.min_font_size),
            max_font_size: other.max_font_size.or(self.max_font_size),
            dpi: other.dpi.or(self.dpi),
            measure: other.measure.or(self.measure),
            layer_attribute: other
                .layer_attribute
                .clone()
                .or_else(|| self.layer_attribute.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("gephi-legend").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("gephi-legend")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("gephi-legend").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("gephi-legend")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".gephilegendrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(split_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# gephi-legend defaults (saved with --save)".to_string());
    if flags.auto_font_size {
        lines.push("--auto-font-size".to_string());
    }
    if flags.wrap_labels {
        lines.push("--wrap-labels".to_string());
    }
    if flags.smart_ceiling {
        lines.push("--smart-ceiling".to_string());
    }
    if let Some(size) = flags.min_font_size {
        lines.push(format!("--min-font-size {size}"));
    }
    if let Some(size) = flags.max_font_size {
        lines.push(format!("--max-font-size {size}"));
    }
    if let Some(measure) = flags.measure {
        lines.push(format!("--measure {}", measure_name(measure)));
    }
    if let Some(attribute) = &flags.layer_attribute {
        lines.push(format!("--layer-attribute {}", quote_token(attribute)));
    }
    if flags.png {
        lines.push("--png".to_string());
    }
    if let Some(dpi) = flags.dpi {
        lines.push(format!("--dpi {dpi}"));
    }
    if flags.verbose {
        lines.push("--verbose".to_string());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the saveable flags out of raw arguments.
///
/// Unknown tokens and unparsable values are ignored; clap reports those.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let mut value = || match inline {
            Some(inline) => Some(inline),
            None => {
                let next = tokens.get(i + 1)?;
                i += 1;
                Some(next.as_str())
            }
        };
        match name {
            "--auto-font-size" => flags.auto_font_size = true,
            "--wrap-labels" => flags.wrap_labels = true,
            "--smart-ceiling" => flags.smart_ceiling = true,
            "-p" | "--png" => flags.png = true,
            "-v" | "--verbose" => flags.verbose = true,
            "--min-font-size" => flags.min_font_size = value().and_then(|v| v.parse().ok()),
            "--max-font-size" => flags.max_font_size = value().and_then(|v| v.parse().ok()),
            "--dpi" => flags.dpi = value().and_then(|v| v.parse().ok()),
            "--measure" => flags.measure = value().and_then(parse_measure),
            "--layer-attribute" => flags.layer_attribute = value().map(ToOwned::to_owned),
            _ => {}
        }
        i += 1;
    }
    flags
}

/// Split a config line on whitespace, keeping double-quoted runs together.
///
/// Inside quotes a backslash takes the next character literally.
fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Quote a value unless [`split_tokens`] already reads it back as one token.
fn quote_token(value: &str) -> String {
    let plain = !value.is_empty()
        && !value.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\');
    if plain {
        return value.to_string();
    }
    let escaped = value.replace('\\', r"\\").replace('"', r#"\""#);
    format!("\"{escaped}\"")
}

fn parse_measure(s: &str) -> Option<MeasureMode> {
    match s {
        "chars" => Some(MeasureMode::Chars),
        "display-width" => Some(MeasureMode::DisplayWidth),
        _ => None,
    }
}

const fn measure_name(mode: MeasureMode) -> &'static str {
    match mode {
        MeasureMode::Chars => "chars",
        MeasureMode::DisplayWidth => "display-width",
    }
}
