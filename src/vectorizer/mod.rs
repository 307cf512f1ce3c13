use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::VectorizerOptions;
use crate::outcome::Outcome;

/// A way of running the vectorization engine on one input file.
///
/// Implementations are picked when the bridge is assembled and must report
/// through [`Outcome`] so callers cannot tell which one executed.
pub trait Vectorizer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn convert(&self, options: &VectorizerOptions, input: &Path, output: &Path) -> Outcome;
}

impl<V: Vectorizer + ?Sized> Vectorizer for Box<V> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn convert(&self, options: &VectorizerOptions, input: &Path, output: &Path) -> Outcome {
        (**self).convert(options, input, output)
    }
}

pub mod process;
#[cfg(feature = "vectorizer-vtracer")]
pub mod vtracer;

/// Write `contents` to `path` via a sibling temporary file, so a failed
/// write never leaves a truncated file behind. Replaces any existing file.
pub fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))?;
    }

    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
