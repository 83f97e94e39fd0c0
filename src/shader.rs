//! Compiled shader blob loading.
//!
//! Shader binaries are opaque backend-specific bytecode read fully into
//! memory from `<assets>/Shaders/<profile>/<stem>.<ext>`; the profile
//! directory and extension come from the active backend.

use std::path::{Path, PathBuf};

use crate::backend::ShaderProfile;
use crate::error::{PluginError, PluginResult};

/// File stem of the vertex shader binary.
pub const VERTEX_SHADER_STEM: &str = "SimpleVertexShader";

/// File stem of the pixel shader binary.
pub const PIXEL_SHADER_STEM: &str = "SimplePixelShader";

/// Build the path of a shader binary under the streaming assets directory.
pub fn shader_path(assets_path: &Path, profile: ShaderProfile, stem: &str) -> PathBuf {
    assets_path
        .join("Shaders")
        .join(profile.directory)
        .join(format!("{stem}.{}", profile.extension))
}

/// Read a shader binary fully into memory.
pub fn load_shader_bytecode(
    assets_path: &Path,
    profile: ShaderProfile,
    stem: &str,
) -> PluginResult<Vec<u8>> {
    let path = shader_path(assets_path, profile, stem);
    std::fs::read(&path).map_err(|source| PluginError::ShaderIo { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PROFILE: ShaderProfile = ShaderProfile {
        directory: "Dummy",
        extension: "bin",
    };

    #[test]
    fn test_shader_path_layout() {
        let path = shader_path(Path::new("/assets"), TEST_PROFILE, VERTEX_SHADER_STEM);
        assert_eq!(
            path,
            PathBuf::from("/assets/Shaders/Dummy/SimpleVertexShader.bin")
        );
    }

    #[test]
    fn test_load_missing_shader_reports_path() {
        let err = load_shader_bytecode(Path::new("/nonexistent"), TEST_PROFILE, PIXEL_SHADER_STEM)
            .unwrap_err();
        match err {
            PluginError::ShaderIo { path, .. } => {
                assert!(path.ends_with("Shaders/Dummy/SimplePixelShader.bin"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_reads_whole_blob() {
        let dir = std::env::temp_dir().join(format!("render-plugin-shader-{}", std::process::id()));
        let shader_dir = dir.join("Shaders").join("Dummy");
        std::fs::create_dir_all(&shader_dir).unwrap();
        std::fs::write(shader_dir.join("SimpleVertexShader.bin"), [1u8, 2, 3, 4]).unwrap();

        let blob = load_shader_bytecode(&dir, TEST_PROFILE, VERTEX_SHADER_STEM).unwrap();
        assert_eq!(blob, vec![1, 2, 3, 4]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
