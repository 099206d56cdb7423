//! Test configuration builder for creating config files programmatically

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a TOML configuration file in a temporary directory
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    global: Vec<String>,
    datasets: Vec<DatasetBuilder>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            global: Vec::new(),
            datasets: Vec::new(),
        }
    }

    /// Set a top-level key; `value` is written verbatim as TOML
    pub fn global(mut self, key: &str, value: &str) -> Self {
        self.global.push(format!("{} = {}", key, value));
        self
    }

    pub fn add_dataset<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DatasetBuilder) -> DatasetBuilder,
    {
        self.datasets.push(f(DatasetBuilder::default()));
        self
    }

    pub fn to_toml(&self) -> String {
        let mut toml = self.global.join("\n");
        toml.push('\n');
        for dataset in &self.datasets {
            toml.push_str("\n[[datasets]]\n");
            toml.push_str(&dataset.to_toml());
        }
        toml
    }

    /// Write the config file and return a handle keeping it alive
    pub fn build(self) -> TestConfig {
        let config_path = self.temp_dir.path().join("zfs-backup.toml");
        fs::write(&config_path, self.to_toml()).expect("Failed to write config");
        TestConfig {
            _temp_dir: self.temp_dir,
            config_path,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Default)]
pub struct DatasetBuilder {
    lines: Vec<String>,
}

impl DatasetBuilder {
    pub fn name(self, name: &str) -> Self {
        self.set("name", &format!("\"{}\"", name))
    }

    /// Set an override key; `value` is written verbatim as TOML
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.lines.push(format!("{} = {}", key, value));
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = self.lines.join("\n");
        toml.push('\n');
        toml
    }
}

pub struct TestConfig {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl TestConfig {
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}
