use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Failed to extract bundled archive '{inner}' from '{container}': {reason}\n\n\
             Hint: a bundled archive that cannot be read leaves the container's\n\
             dependency data incomplete, so the scan was aborted.\n\n\
             Check that '{container}' is not truncated or corrupted and re-download it if needed.")]
    NestedExtraction {
        container: String,
        inner: String,
        reason: String,
    },

    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("Mods directory not found: {0}\n\n\
             Hint: modgraph looks for archives in `paths.mods_dir` (default: minecraft/mods)\n\
             relative to the pack root.\n\n\
             Solutions:\n\
             1. Run the command from the pack root, or pass --root <dir>\n\
             2. Set `mods_dir` under [paths] in modgraph.toml")]
    ModsDirNotFound(String),

    #[error("{0}")]
    Other(String),
}
