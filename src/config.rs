use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

/// Environment prefix for overrides, e.g. `HDLFLOW_VSIM_BIN`.
const ENV_PREFIX: &str = "HDLFLOW_";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .hdlflowrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if let Some(key) = k.strip_prefix(ENV_PREFIX) {
                if is_config_key(key) {
                    map.insert(key.to_string(), v);
                }
            }
        }

        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(format!("{ENV_PREFIX}{key}")) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    /// Resolve an external tool binary. Every tool key has a default, so the
    /// fallback to the key name itself is never reached in practice.
    pub fn tool(&self, key: &str) -> String {
        self.get(key).unwrap_or_else(|| key.to_string())
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut inner = default_map();
        for (k, v) in pairs {
            inner.insert((*k).to_string(), (*v).to_string());
        }
        Self { inner }
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "VLIB_BIN",
        "VLOG_BIN",
        "VOPT_BIN",
        "VSIM_BIN",
        "PANDOC_BIN",
        "PDFUNITE_BIN",
        "PDF_ENGINE",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("hdlflow").join(".hdlflowrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // QuestaSim toolchain
    m.insert("VLIB_BIN".into(), "vlib".into());
    m.insert("VLOG_BIN".into(), "vlog".into());
    m.insert("VOPT_BIN".into(), "vopt".into());
    m.insert("VSIM_BIN".into(), "vsim".into());

    // Document toolchain
    m.insert("PANDOC_BIN".into(), "pandoc".into());
    m.insert("PDFUNITE_BIN".into(), "pdfunite".into());
    m.insert("PDF_ENGINE".into(), "wkhtmltopdf".into());

    m
}
