//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use edge_core::{IdentityProvider, SeededIdentity, SpaConfig};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["edge.toml", ".edge.toml", "edge.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with the selected environment applied.
    pub config: CliConfig,
    /// Where the configuration was loaded from.
    pub config_path: Option<PathBuf>,
    /// Selected environment.
    pub env: Option<String>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, env: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_in(cwd, config_path, env, output)
    }

    /// Context for commands that never read the config file.
    pub fn unconfigured(env: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self {
            config: CliConfig::default(),
            config_path: None,
            env,
            output,
            cwd,
        })
    }

    fn load_in(
        cwd: PathBuf,
        config_path: Option<&str>,
        env: Option<String>,
        output: Output,
    ) -> Result<Self> {
        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        let config = match env.as_deref() {
            Some(env) => config.for_environment(env)?,
            None => config,
        };

        Ok(Self {
            config,
            config_path,
            env,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    pub fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory relative paths in the config resolve against.
    pub fn project_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Deployment inputs for the loaded configuration.
    pub fn spa_config(&self) -> Result<SpaConfig> {
        if self.config_path.is_none() {
            anyhow::bail!("No config file found. Run `edge init` to create one.");
        }
        let spa = self.config.to_spa_config(&self.project_dir());
        spa.validate().context("Invalid configuration")?;
        Ok(spa)
    }

    /// Identity provider seeded from the config file.
    pub fn identity(&self) -> Result<Arc<dyn IdentityProvider>> {
        let seed = self
            .config
            .app
            .seed
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .context("No identity seed configured. Run `edge init --force` to generate one.")?;
        Ok(Arc::new(SeededIdentity::new(seed)))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn output() -> Output {
        Output::new(false, true)
    }

    #[test]
    fn test_find_config_searches_parents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("edge.toml"), "[app]\nname = \"shop\"\n").unwrap();
        let nested = dir.path().join("src/pages");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            Context::find_config(&nested),
            Some(dir.path().join("edge.toml"))
        );

        let ctx = Context::load_in(nested, None, None, output()).unwrap();
        assert_eq!(ctx.config.app.name, "shop");
        assert_eq!(ctx.project_dir(), dir.path());
    }

    #[test]
    fn test_malformed_config_fails_load() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("edge.toml"), "[app\nname = ").unwrap();

        let err = Context::load_in(dir.path().to_path_buf(), None, None, output())
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }
}
