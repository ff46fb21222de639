use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;

use crate::effects::FileSystem;

/// Makes `dir` the working directory until dropped.
pub struct DirectoryScope<'a> {
    fs: &'a dyn FileSystem,
    previous: Option<PathBuf>,
}

impl<'a> DirectoryScope<'a> {
    pub fn enter(fs: &'a dyn FileSystem, dir: &Path) -> Result<Self> {
        let previous = match fs.current_dir() {
            Ok(cwd) => Some(cwd),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "working directory unknown; it will not be restored");
                None
            }
        };
        fs.set_current_dir(dir)?;
        Ok(Self { fs, previous })
    }
}

impl Drop for DirectoryScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(err) = self.fs.set_current_dir(&previous) {
                warn!(
                    dir = %previous.display(),
                    error = %format!("{err:#}"),
                    "failed to restore working directory"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::core::test_support::FakeHost;

    #[test]
    fn restores_the_previous_directory() -> Result<()> {
        let host = FakeHost::new();
        host.add_dir("/home/user");
        host.add_dir("/work/Games");
        host.set_cwd("/home/user");
        {
            let _scope = DirectoryScope::enter(&*host, Path::new("/work"))?;
            assert_eq!(host.cwd(), PathBuf::from("/work"));
        }
        assert_eq!(host.cwd(), PathBuf::from("/home/user"));
        Ok(())
    }

    #[test]
    fn missing_directory_leaves_the_cwd_alone() {
        let host = FakeHost::new();
        host.add_dir("/home/user");
        host.set_cwd("/home/user");
        assert!(DirectoryScope::enter(&*host, Path::new("/gone")).is_err());
        assert_eq!(host.cwd(), PathBuf::from("/home/user"));
    }
}
