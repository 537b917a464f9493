use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BibshelfConfig {
    /// Path to the SQLite bibliography file
    pub database: Option<String>,
    /// Directory `.bib` exports land in when no output path is given
    pub export_dir: Option<String>,
}

impl BibshelfConfig {
    /// Database path from config, falling back to the default file name
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    /// Default `.bib` path for a set, placed under `export_dir` when set
    pub fn export_path_for(&self, set_name: &str) -> PathBuf {
        let file = format!("{}.bib", sanitize_file_stem(set_name));
        match &self.export_dir {
            Some(dir) => Path::new(dir).join(file),
            None => PathBuf::from(file),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bibshelf.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("bibliography.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BibshelfConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BibshelfConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BibshelfConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "references".to_string() } else { stem }
}
