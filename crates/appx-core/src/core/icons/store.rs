use anyhow::{Context, Result};
use appx_domain::{IconPaths, IconRecord};
use tracing::{debug, trace};

use crate::core::host::is_not_found;
use crate::effects::IconCodec;

/// Which path form the host writer accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrittenVia {
    Base,
    Suffixed,
}

/// Hides the base-path versus `.info`-path writer quirk from callers.
pub struct IconStore<'a> {
    codec: &'a dyn IconCodec,
}

impl<'a> IconStore<'a> {
    #[must_use]
    pub fn new(codec: &'a dyn IconCodec) -> Self {
        Self { codec }
    }

    pub fn load(&self, paths: &IconPaths) -> Result<IconRecord> {
        self.codec.get_icon(&paths.target)
    }

    /// Writes through the base path, retrying with the `.info` path when the
    /// writer rejects the first form.
    pub fn save(&self, paths: &IconPaths, icon: &IconRecord, notify: bool) -> Result<WrittenVia> {
        match self.codec.put_icon(&paths.target, icon, notify) {
            Ok(()) => Ok(WrittenVia::Base),
            Err(base_err) => {
                debug!(
                    path = %paths.target.display(),
                    error = %format!("{base_err:#}"),
                    "base path write rejected, retrying with icon path"
                );
                self.codec
                    .put_icon(&paths.icon, icon, notify)
                    .map(|()| WrittenVia::Suffixed)
                    .with_context(|| format!("base path attempt: {base_err:#}"))
            }
        }
    }

    /// Removes the icon file through the base path, then the `.info` path.
    ///
    /// Returns `false` when neither form found anything to delete.
    pub fn delete(&self, paths: &IconPaths) -> Result<bool> {
        let mut rejected = None;
        for candidate in [&paths.target, &paths.icon] {
            match self.codec.delete_icon(candidate) {
                Ok(()) => {
                    trace!(path = %candidate.display(), "icon deleted");
                    return Ok(true);
                }
                Err(err) if is_not_found(&err) => {}
                Err(err) => rejected = Some(err),
            }
        }
        match rejected {
            Some(err) => Err(err),
            None => Ok(false),
        }
    }

    /// Pushes pending icon data to storage.
    pub fn sync(&self, paths: &IconPaths) -> Result<()> {
        self.codec.flush(&paths.icon)
    }

    /// Succeeds once the icon file can be opened for reading.
    ///
    /// The target is tried as well, but a directory target never counts.
    pub fn probe_readable(&self, paths: &IconPaths) -> Result<()> {
        self.codec
            .open_for_read(&paths.icon)
            .or_else(|icon_err| {
                self.codec
                    .open_for_read(&paths.target)
                    .with_context(|| format!("icon path: {icon_err:#}"))
            })
    }
}
