use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

use crate::error::FetchError;

/// Unpacks every entry of `zip_path` into `dir_name`, overwriting files that
/// already exist. Returns the number of entries in the archive.
pub fn unzip_into(zip_path: &Path, dir_name: &Path) -> Result<usize, FetchError> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    let entries = archive.len();
    archive.extract(dir_name)?;
    Ok(entries)
}
