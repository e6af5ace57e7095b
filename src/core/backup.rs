use crate::config::Config;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally zipped.
    /// Returns the path of the file actually written.
    pub fn backup(
        cfg: &Config,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(&cfg.database);
        let dest = crate::utils::path::expand_tilde(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("database {}", src.display())));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let (copy_path, final_target) = if compress {
            (dest.with_extension("sqlite"), dest.with_extension("zip"))
        } else {
            (dest.clone(), dest.clone())
        };
        if final_target.exists() && !force {
            return Err(AppError::Conflict(format!(
                "{} already exists (use --force to overwrite)",
                final_target.display()
            )));
        }

        // VACUUM INTO refuses an existing target.
        if copy_path.exists() {
            fs::remove_file(&copy_path)?;
        }
        let conn = Connection::open(src)?;
        conn.execute("VACUUM INTO ?1", [copy_path.to_string_lossy().as_ref()])?;
        success(format!("Backup created: {}", copy_path.display()));

        let final_path = if compress {
            let compressed = compress_backup(&copy_path)?;
            if let Err(e) = fs::remove_file(&copy_path) {
                warning(format!("Failed to remove uncompressed backup: {}", e));
            }
            compressed
        } else {
            copy_path
        };

        if let Err(e) = ttlog(
            &conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        ) {
            warning(format!("Failed to write internal log: {}", e));
        }

        Ok(final_path)
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rtripclock.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(name, options).map_err(std::io::Error::other)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    info(format!("Compressed: {}", zip_path.display()));

    Ok(zip_path)
}
