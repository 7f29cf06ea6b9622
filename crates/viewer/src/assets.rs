//! Shaders embedded from the `assets/` directory with `rust-embed`.

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
pub struct Assets;

impl Assets {
    /// Load a text asset by path relative to `assets/`, e.g. `"shaders/octahedron.wgsl"`.
    pub fn load_string(path: &str) -> Option<String> {
        Self::get(path).and_then(|file| String::from_utf8(file.data.into_owned()).ok())
    }
}
