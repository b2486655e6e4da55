//! The framework package shipped inside the binary.

use std::path::{Path, PathBuf};

use rust_embed::Embed;
use tracing::{debug, info};

use crate::errors::{MxxnError, Result};
use crate::system::logging::targets;

#[derive(Embed)]
#[folder = "package/"]
struct FrameworkPackage;

/// Names the directory of the framework package.
pub const ROOT_VAR: &str = "MXXN_ROOT";

/// Directory of the framework package.
///
/// `MXXN_ROOT` must name an existing directory. Without it the package of
/// the source tree is used when present, otherwise the embedded package is
/// unpacked below the temporary directory.
pub fn framework_root() -> Result<PathBuf> {
    if let Some(root) = std::env::var_os(ROOT_VAR) {
        let root = PathBuf::from(root);
        if !root.is_dir() {
            return Err(MxxnError::path_not_exist(format!(
                "The {} directory {} does not exist.",
                ROOT_VAR,
                root.display()
            )));
        }
        return Ok(root);
    }

    let source = crate::package_root();
    if source.is_dir() {
        return Ok(source);
    }

    let target = std::env::temp_dir()
        .join(format!("mxxn-{}", env!("CARGO_PKG_VERSION")))
        .join("package");
    unpack(&target)?;
    Ok(target)
}

/// Write the embedded framework package into `dir`, replacing existing files.
pub fn unpack(dir: &Path) -> Result<()> {
    let mut count = 0;
    for name in FrameworkPackage::iter() {
        let Some(file) = FrameworkPackage::get(&name) else {
            continue;
        };
        let path = dir.join(name.as_ref());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, file.data.as_ref())?;
        debug!(target: targets::FILESYSTEM, "Unpacked {}", path.display());
        count += 1;
    }

    info!(
        target: targets::FILESYSTEM,
        "Unpacked {} framework files into {}",
        count,
        dir.display()
    );
    Ok(())
}
