//! Mutation notices for page files.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::monitor::MonitorHandle;
use crate::trigger::Trigger;

/// Default polling period of [`spawn_file_watcher`].
pub const DEFAULT_WATCH_POLL: Duration = Duration::from_millis(250);

/// What identifies one version of the file on disk.
type Fingerprint = Option<(SystemTime, u64)>;

async fn fingerprint(path: &Path) -> Fingerprint {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    Some((metadata.modified().ok()?, metadata.len()))
}

/// Send [`Trigger::Mutation`] whenever the file at `path` changes.
///
/// Compares modification time and length every `poll`. Creating or removing
/// the file also counts as a change. The task ends once the monitor stops.
pub fn spawn_file_watcher(
    path: impl Into<PathBuf>,
    handle: MonitorHandle,
    poll: Duration,
) -> JoinHandle<()> {
    let path = path.into();
    tokio::spawn(async move {
        let mut last = fingerprint(&path).await;
        let mut interval = tokio::time::interval(poll);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if handle.is_closed() {
                break;
            }
            let current = fingerprint(&path).await;
            if current == last {
                trace!(path = %path.display(), "page file unchanged");
                continue;
            }
            last = current;
            debug!(path = %path.display(), "page file changed");
            if handle.try_notify(Trigger::Mutation).is_err() {
                break;
            }
        }
    })
}
