//! Runtime settings for opening a display.

use std::path::PathBuf;

use libfbdev::virtual_fb::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use libfbdev::DEFAULT_FB;

use crate::error::{Error, Result};

pub const ENV_DEVICE: &str = "FBGL_DEVICE";
pub const ENV_EMULATE: &str = "FBGL_EMULATE";
pub const ENV_EMU_SIZE: &str = "FBGL_EMU_SIZE";
pub const ENV_DOUBLE_BUFFER: &str = "FBGL_DOUBLE_BUFFER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Framebuffer device to open when not emulating.
    pub device: PathBuf,
    /// Backing file of a virtual framebuffer. Takes precedence over `device`.
    pub emulate: Option<PathBuf>,
    pub emu_width: usize,
    pub emu_height: usize,
    /// Draw into an off-screen buffer and copy on `display()`.
    pub double_buffer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_FB),
            emulate: None,
            emu_width: DEFAULT_WIDTH,
            emu_height: DEFAULT_HEIGHT,
            double_buffer: false,
        }
    }
}

impl Config {
    /// Defaults overridden by `FBGL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(device) = lookup(ENV_DEVICE).filter(|v| !v.is_empty()) {
            config.device = PathBuf::from(device);
        }
        if let Some(file) = lookup(ENV_EMULATE).filter(|v| !v.is_empty()) {
            config.emulate = Some(PathBuf::from(file));
        }
        if let Some(size) = lookup(ENV_EMU_SIZE) {
            let (w, h) = parse_size(&size)?;
            config.emu_width = w;
            config.emu_height = h;
        }
        if let Some(flag) = lookup(ENV_DOUBLE_BUFFER) {
            config.double_buffer = parse_bool(ENV_DOUBLE_BUFFER, &flag)?;
        }
        Ok(config)
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `800x600`.
pub fn parse_size(s: &str) -> Result<(usize, usize)> {
    let bad = || Error::Config(format!("size {s:?} is not WIDTHxHEIGHT"));
    let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(bad)?;
    let w: usize = w.parse().map_err(|_| bad())?;
    let h: usize = h.parse().map_err(|_| bad())?;
    if w == 0 || h == 0 {
        return Err(bad());
    }
    Ok((w, h))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{key}={other:?} is not a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.device, PathBuf::from("/dev/fb0"));
        assert_eq!(c.emulate, None);
        assert_eq!((c.emu_width, c.emu_height), (800, 600));
        assert!(!c.double_buffer);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn test_environment_overrides() {
        let c = Config::from_lookup(lookup(&[
            ("FBGL_DEVICE", "/dev/fb1"),
            ("FBGL_EMULATE", "/tmp/fb.emu"),
            ("FBGL_EMU_SIZE", "320x240"),
            ("FBGL_DOUBLE_BUFFER", "Yes"),
        ]))
        .unwrap();
        assert_eq!(c.device, PathBuf::from("/dev/fb1"));
        assert_eq!(c.emulate, Some(PathBuf::from("/tmp/fb.emu")));
        assert_eq!((c.emu_width, c.emu_height), (320, 240));
        assert!(c.double_buffer);
    }

    #[test]
    fn test_malformed_values_are_config_errors() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("FBGL_EMU_SIZE", "big")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("FBGL_DOUBLE_BUFFER", "maybe")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800x600").unwrap(), (800, 600));
        assert_eq!(parse_size(" 64X48 ").unwrap(), (64, 48));
        assert!(parse_size("0x600").is_err());
        assert!(parse_size("800").is_err());
        assert!(parse_size("axb").is_err());
    }
}
