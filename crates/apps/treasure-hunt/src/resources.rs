//! Text assets (shader sources) read from disk

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::config::ShadersConfig;

/// Read a whole text file
///
/// A missing or unreadable file is logged and yields an empty string; the
/// caller decides whether an empty resource is usable.
pub fn read_text_resource(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} ({} bytes)", path.display(), text.len());
            text
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Shader program sources for the cube and floor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub grid_fragment: String,
    pub passthrough_fragment: String,
}

impl ShaderSources {
    /// Load every shader named in `config`; empty when no root is configured
    pub fn load(config: &ShadersConfig) -> Self {
        let Some(root) = &config.root else {
            debug!("No shader root configured, skipping shader sources");
            return Self::default();
        };

        let read = |name: &str| -> String {
            let path: PathBuf = root.join(name);
            let text = read_text_resource(&path);
            if text.is_empty() {
                warn!("Shader {} is empty", path.display());
            }
            text
        };

        Self {
            vertex: read(&config.vertex),
            grid_fragment: read(&config.grid_fragment),
            passthrough_fragment: read(&config.passthrough_fragment),
        }
    }

    /// True when every source has content
    pub fn is_complete(&self) -> bool {
        !self.vertex.is_empty()
            && !self.grid_fragment.is_empty()
            && !self.passthrough_fragment.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("light_vertex.glsl");
        std::fs::write(&path, "void main() {}\n").unwrap();
        assert_eq!(read_text_resource(&path), "void main() {}\n");
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_text_resource(dir.path().join("nope.glsl")), "");
    }

    #[test]
    fn shader_sources_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("light_vertex.glsl"), "v").unwrap();
        std::fs::write(dir.path().join("grid_fragment.glsl"), "g").unwrap();

        let config = ShadersConfig {
            root: Some(dir.path().to_path_buf()),
            ..ShadersConfig::default()
        };
        let sources = ShaderSources::load(&config);
        assert_eq!(sources.vertex, "v");
        assert_eq!(sources.grid_fragment, "g");
        assert_eq!(sources.passthrough_fragment, "");
        assert!(!sources.is_complete());
    }

    #[test]
    fn no_root_loads_nothing() {
        assert_eq!(
            ShaderSources::load(&ShadersConfig::default()),
            ShaderSources::default()
        );
    }
}
