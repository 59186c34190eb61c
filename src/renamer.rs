//! Same-directory renames that never overwrite another file.

use episodist_common::{Error, MediaFile, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// What a rename did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// The file already had the target name.
    Unchanged,
}

/// Rename `file` to `target_name` within its directory.
///
/// On success `file.path` points at the new location; on any error it is
/// left as it was.
pub fn rename(file: &mut MediaFile, target_name: &str) -> Result<RenameOutcome> {
    validate_target_name(target_name)?;

    let source = file.path.clone();
    let target = source.with_file_name(target_name);

    if let Err(e) = fs::symlink_metadata(&source) {
        return Err(Error::rename(&source, e));
    }

    if target == source {
        debug!("Already named {:?}", source);
        return Ok(RenameOutcome::Unchanged);
    }

    match fs::symlink_metadata(&target) {
        Ok(_) => {
            if !is_case_variant(&source, &target) {
                return Err(Error::collision(&source, &target));
            }
            debug!("Case-only rename {:?} -> {:?}", source, target);
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::rename(&source, e)),
    }

    fs::rename(&source, &target).map_err(|e| Error::rename(&source, e))?;
    info!("Renamed {:?} -> {:?}", source, target);

    file.path = target.clone();
    Ok(RenameOutcome::Renamed {
        from: source,
        to: target,
    })
}

fn validate_target_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None)
            if !name.contains('/') && !name.contains(std::path::MAIN_SEPARATOR) =>
        {
            Ok(())
        }
        _ => Err(Error::validation(format!(
            "invalid target file name {:?}",
            name
        ))),
    }
}

/// True when `target` is `source` seen through a case-insensitive file
/// system: the names differ only in ASCII case and resolve to one file.
/// Hard links and unresolvable targets (dangling symlinks) are not.
fn is_case_variant(source: &Path, target: &Path) -> bool {
    let names_differ_in_case = match (source.file_name(), target.file_name()) {
        (Some(a), Some(b)) => a != b && a.eq_ignore_ascii_case(b),
        _ => false,
    };
    names_differ_in_case && same_file(source, target)
}

#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
