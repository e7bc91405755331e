// src/archive.rs
// =============================================================================
// Zips a folder of downloaded media.
//
// zip_folder("output/downloads/natgeo", "output/downloads/natgeo_media")
// writes output/downloads/natgeo_media.zip. Entry names are relative to the
// folder and always use '/' as separator. Sub-folders are included.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

// Writes `<out_base>.zip` with every file under `folder`
//
// Returns the path of the archive.
pub fn zip_folder(folder: &Path, out_base: &Path) -> Result<PathBuf> {
    if !folder.is_dir() {
        return Err(anyhow!("Not a directory: {}", folder.display()));
    }

    let archive_path = with_zip_extension(out_base);
    let file = File::create(&archive_path)
        .with_context(|| format!("Failed to create '{}'", archive_path.display()))?;

    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in collect_files(folder)? {
        // The archive may sit inside the folder it is made from
        if path == archive_path {
            continue;
        }
        let name = entry_name(folder, &path)?;
        debug!(%name, "adding to archive");

        writer.start_file(name, options)?;
        let mut source =
            File::open(&path).with_context(|| format!("Failed to open '{}'", path.display()))?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    Ok(archive_path)
}

fn with_zip_extension(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".zip");
    PathBuf::from(name)
}

// All files below `dir`, sorted so archives come out the same every time
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current)
            .with_context(|| format!("Failed to read '{}'", current.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root)?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
