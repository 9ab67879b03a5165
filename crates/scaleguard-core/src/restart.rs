//! Display driver restart through an elevated helper executable.
//!
//! The helper (a `devcon`-style tool) is written to a temporary file,
//! launched elevated with a fixed command, waited on, and deleted again.
//! The temporary copy is owned by a [`TempHelper`] guard so it is removed
//! on every path, including launch failure and a refused elevation prompt.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Error, Result};

/// Default helper command: restart every device of the display class.
pub const DEFAULT_ARGUMENTS: &str = "restart =display";

static NEXT_HELPER: AtomicU64 = AtomicU64::new(0);

/// What happened when a driver restart was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    /// The helper ran and exited. Its exit code is not inspected.
    Completed,
    /// The helper could not be materialized, launched or elevated.
    Failed(String),
    /// No restart was attempted.
    Skipped,
}

/// Forces the display subsystem to reload. Never fails loudly.
pub trait DriverRestart: Send + Sync {
    /// Blocks until the restart finished or failed. There is no timeout.
    fn restart(&self) -> RestartOutcome;
}

/// Launches a program with administrative rights and waits for it.
pub trait ElevatedLauncher: Send + Sync {
    fn run_elevated(&self, program: &Path, arguments: &str, working_dir: Option<&Path>)
    -> Result<()>;
}

/// Source of the helper executable's bytes.
///
/// The CLI uses `File`: the helper is a redistributable Microsoft tool
/// that is installed next to the config rather than compiled into the
/// binary. Embedders that ship their own copy pass `Bytes`, e.g. from
/// `include_bytes!`. Either way a fresh temporary copy is run and deleted.
#[derive(Debug, Clone)]
pub enum HelperImage {
    /// Bytes bundled into the calling binary.
    Bytes(Cow<'static, [u8]>),
    /// A helper installed on disk, copied before each run.
    File(PathBuf),
}

impl HelperImage {
    fn load(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Self::Bytes(bytes) => Ok(Cow::Borrowed(&**bytes)),
            Self::File(path) => fs::read(path).map(Cow::Owned).map_err(|source| Error::File {
                path: path.clone(),
                source,
            }),
        }
    }
}

/// A materialized helper file, deleted when dropped.
#[derive(Debug)]
pub struct TempHelper {
    path: PathBuf,
}

impl TempHelper {
    /// Writes the helper image to a fresh file in `dir`.
    pub fn materialize(image: &HelperImage, dir: &Path) -> Result<Self> {
        let bytes = image.load()?;
        let name = format!(
            "scaleguard-helper-{}-{}.exe",
            std::process::id(),
            NEXT_HELPER.fetch_add(1, Ordering::Relaxed)
        );
        // Guard first so a partial write is cleaned up as well.
        let helper = Self {
            path: dir.join(name),
        };
        fs::write(&helper.path, &bytes).map_err(|source| Error::File {
            path: helper.path.clone(),
            source,
        })?;
        Ok(helper)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempHelper {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), "could not delete helper: {e}");
        }
    }
}

/// Restarts display drivers by running a helper image elevated.
pub struct HelperRestart<L> {
    image: HelperImage,
    arguments: String,
    temp_dir: PathBuf,
    working_dir: Option<PathBuf>,
    launcher: L,
}

impl<L: ElevatedLauncher> HelperRestart<L> {
    /// Uses the system temp directory and the current executable's directory.
    pub fn new(image: HelperImage, arguments: impl Into<String>, launcher: L) -> Self {
        let working_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            image,
            arguments: arguments.into(),
            temp_dir: std::env::temp_dir(),
            working_dir,
            launcher,
        }
    }

    /// Overrides where the helper is materialized.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }
}

impl<L: ElevatedLauncher> DriverRestart for HelperRestart<L> {
    fn restart(&self) -> RestartOutcome {
        let helper = match TempHelper::materialize(&self.image, &self.temp_dir) {
            Ok(helper) => helper,
            Err(e) => {
                tracing::warn!("driver restart skipped, helper unavailable: {e}");
                return RestartOutcome::Failed(e.to_string());
            }
        };

        tracing::info!(helper = %helper.path().display(), args = %self.arguments, "restarting display drivers");
        match self
            .launcher
            .run_elevated(helper.path(), &self.arguments, self.working_dir.as_deref())
        {
            Ok(()) => RestartOutcome::Completed,
            Err(e) => {
                tracing::warn!("driver restart failed: {e}");
                RestartOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Restart trigger used when restarts are turned off in the config.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRestart;

impl DriverRestart for DisabledRestart {
    fn restart(&self) -> RestartOutcome {
        tracing::debug!("driver restart disabled");
        RestartOutcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Records each launch and whether the helper file existed at that time.
    #[derive(Clone, Default)]
    struct RecordingLauncher {
        launches: Arc<Mutex<Vec<(PathBuf, String, bool)>>>,
        fail: Option<&'static str>,
    }

    impl ElevatedLauncher for RecordingLauncher {
        fn run_elevated(
            &self,
            program: &Path,
            arguments: &str,
            _working_dir: Option<&Path>,
        ) -> Result<()> {
            self.launches
                .lock()
                .push((program.to_path_buf(), arguments.to_string(), program.exists()));
            match self.fail {
                Some(msg) => Err(Error::Helper(msg.into())),
                None => Ok(()),
            }
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scaleguard-test-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn image() -> HelperImage {
        HelperImage::Bytes(Cow::Borrowed(b"MZ fake helper"))
    }

    #[test]
    fn completed_run_deletes_helper() {
        // Arrange
        let dir = scratch_dir("completed");
        let launcher = RecordingLauncher::default();
        let restart =
            HelperRestart::new(image(), DEFAULT_ARGUMENTS, launcher.clone()).with_temp_dir(&dir);

        // Act
        let outcome = restart.restart();

        // Assert
        assert_eq!(outcome, RestartOutcome::Completed);
        let launches = launcher.launches.lock();
        assert_eq!(launches.len(), 1);
        let (path, args, existed) = &launches[0];
        assert_eq!(args, "restart =display");
        assert!(existed, "helper must exist while it runs");
        assert!(!path.exists(), "helper must be deleted afterwards");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn refused_elevation_fails_and_still_deletes_helper() {
        // Arrange
        let dir = scratch_dir("refused");
        let launcher = RecordingLauncher {
            fail: Some("the operation was canceled by the user"),
            ..Default::default()
        };
        let restart =
            HelperRestart::new(image(), DEFAULT_ARGUMENTS, launcher.clone()).with_temp_dir(&dir);

        // Act
        let outcome = restart.restart();

        // Assert
        assert!(matches!(outcome, RestartOutcome::Failed(msg) if msg.contains("canceled")));
        let (path, _, _) = launcher.launches.lock()[0].clone();
        assert!(!path.exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_helper_file_fails_without_launching() {
        // Arrange
        let dir = scratch_dir("missing");
        let launcher = RecordingLauncher::default();
        let restart = HelperRestart::new(
            HelperImage::File(dir.join("does-not-exist.exe")),
            DEFAULT_ARGUMENTS,
            launcher.clone(),
        )
        .with_temp_dir(&dir);

        // Act
        let outcome = restart.restart();

        // Assert
        assert!(matches!(outcome, RestartOutcome::Failed(_)));
        assert!(launcher.launches.lock().is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unwritable_temp_dir_fails_without_launching() {
        // Arrange
        let dir = scratch_dir("unwritable").join("no-such-subdir");
        let launcher = RecordingLauncher::default();
        let restart =
            HelperRestart::new(image(), DEFAULT_ARGUMENTS, launcher.clone()).with_temp_dir(&dir);

        // Act
        let outcome = restart.restart();

        // Assert
        assert!(matches!(outcome, RestartOutcome::Failed(_)));
        assert!(launcher.launches.lock().is_empty());
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn helper_file_image_is_copied() {
        // Arrange
        let dir = scratch_dir("file-image");
        let source = dir.join("devcon64.exe");
        fs::write(&source, b"MZ installed helper").unwrap();

        // Act
        let helper = TempHelper::materialize(&HelperImage::File(source.clone()), &dir).unwrap();

        // Assert
        assert_eq!(fs::read(helper.path()).unwrap(), b"MZ installed helper");
        let copy = helper.path().to_path_buf();
        drop(helper);
        assert!(!copy.exists());
        assert!(source.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn disabled_restart_is_skipped() {
        assert_eq!(DisabledRestart.restart(), RestartOutcome::Skipped);
    }
}
