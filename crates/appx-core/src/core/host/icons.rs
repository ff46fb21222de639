use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use appx_domain::{icon_path_for, parse_icon, render_icon, IconRecord, INFO_SUFFIX};
use filetime::FileTime;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::WriterVariant;
use crate::effects::IconCodec;

/// Icon files stored as TOML next to their targets.
pub(crate) struct SystemIconCodec {
    writer: WriterVariant,
}

impl SystemIconCodec {
    pub(crate) fn new(writer: WriterVariant) -> Self {
        Self { writer }
    }

    fn destination(&self, path: &Path) -> PathBuf {
        match self.writer {
            WriterVariant::Append => {
                let mut raw = path.as_os_str().to_os_string();
                raw.push(INFO_SUFFIX);
                PathBuf::from(raw)
            }
            WriterVariant::Literal => path.to_path_buf(),
        }
    }

    /// The literal writer only ever replaces icon files.
    fn guard_literal(&self, dest: &Path) -> Result<()> {
        if self.writer != WriterVariant::Literal {
            return Ok(());
        }
        let meta = match fs::metadata(dest) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", dest.display()))
            }
        };
        if meta.is_dir() {
            bail!("refusing to replace directory {} with an icon", dest.display());
        }
        let contents = fs::read_to_string(dest).unwrap_or_default();
        if parse_icon(&contents).is_err() {
            bail!("refusing to replace {}: not an icon file", dest.display());
        }
        Ok(())
    }
}

impl IconCodec for SystemIconCodec {
    fn get_icon(&self, target: &Path) -> Result<IconRecord> {
        let path = icon_path_for(target)?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read icon {}", path.display()))?;
        parse_icon(&contents).with_context(|| format!("failed to parse icon {}", path.display()))
    }

    fn put_icon(&self, path: &Path, icon: &IconRecord, notify: bool) -> Result<()> {
        let dest = self.destination(path);
        self.guard_literal(&dest)?;
        let contents = render_icon(icon)
            .with_context(|| format!("failed to render icon for {}", dest.display()))?;
        let parent = dest
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to stage icon in {}", parent.display()))?;
        staged
            .write_all(contents.as_bytes())
            .with_context(|| format!("failed to write icon {}", dest.display()))?;
        staged
            .persist(&dest)
            .map_err(|err| err.error)
            .with_context(|| format!("failed to replace icon {}", dest.display()))?;
        debug!(path = %dest.display(), kind = %icon.kind, "icon written");

        if notify {
            if let Err(err) = filetime::set_file_mtime(parent, FileTime::now()) {
                warn!(dir = %parent.display(), %err, "failed to notify desktop of icon change");
            }
        }
        Ok(())
    }

    fn delete_icon(&self, path: &Path) -> Result<()> {
        let dest = self.destination(path);
        self.guard_literal(&dest)?;
        fs::remove_file(&dest).with_context(|| format!("failed to delete icon {}", dest.display()))
    }

    fn open_for_read(&self, path: &Path) -> Result<()> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let meta = file
            .metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if !meta.is_file() {
            bail!("{} is not a regular file", path.display());
        }
        Ok(())
    }

    fn flush(&self, path: &Path) -> Result<()> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        file.sync_all()
            .with_context(|| format!("failed to sync {}", path.display()))
    }
}
