//! Mounting the chart into a host surface identified by id.
//!
//! The host may create the mount point after `mount` is called. Missing mount
//! points are retried once per cooperative `tick`, never by blocking. Each
//! mount returns a `MountHandle` that observes progress and can cancel the
//! retry loop.
//!
//! Callers must not mount twice concurrently into the same mount point id.

mod host;

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};

use crate::chart::{MuscleBarChart, VisualTree};
use crate::core::ChartConfiguration;
use crate::error::ChartResult;

pub use host::{InMemoryHost, MountedChart};

/// Host surface the chart is rendered into.
pub trait MountHost {
    fn has_mount_point(&self, mount_point_id: &str) -> bool;

    /// Replaces whatever is mounted at `mount_point_id` with `tree`.
    fn render_into(&mut self, mount_point_id: &str, tree: &VisualTree) -> ChartResult<()>;
}

/// How long a mount keeps waiting for its mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// Retry on every tick until the mount point appears or the handle is cancelled.
    #[default]
    Unbounded,
    /// Give up after `max_attempts` lookups, counting the immediate one.
    Bounded { max_attempts: u32 },
}

impl RetryPolicy {
    fn allows(self, attempts: u32) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Bounded { max_attempts } => attempts < max_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountStatus {
    /// Waiting for the mount point; `attempts` lookups have missed so far.
    Pending { attempts: u32 },
    Mounted,
    /// The chart could not be built or rendered. The error was logged.
    Failed,
    Cancelled,
    Exhausted,
}

impl MountStatus {
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, MountStatus::Pending { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MountTaskId(u64);

/// Caller-held capability for one scheduled mount.
///
/// Dropping the handle does not cancel the mount.
#[derive(Debug, Clone)]
pub struct MountHandle {
    id: MountTaskId,
    status: Rc<Cell<MountStatus>>,
}

impl MountHandle {
    #[must_use]
    pub fn id(&self) -> MountTaskId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> MountStatus {
        self.status.get()
    }

    /// Stops further retries. Returns `false` when the mount already settled.
    pub fn cancel(&self) -> bool {
        if !self.status.get().is_pending() {
            return false;
        }
        self.status.set(MountStatus::Cancelled);
        debug!(task = self.id.0, "mount cancelled");
        true
    }
}

/// Arguments of the chaining entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest<T> {
    pub mount_point_id: String,
    pub config: ChartConfiguration,
    pub passthrough: T,
}

impl<T> RenderRequest<T> {
    #[must_use]
    pub fn new(mount_point_id: impl Into<String>, config: ChartConfiguration, passthrough: T) -> Self {
        Self {
            mount_point_id: mount_point_id.into(),
            config,
            passthrough,
        }
    }
}

#[derive(Debug)]
struct PendingMount {
    id: MountTaskId,
    mount_point_id: String,
    config: ChartConfiguration,
    policy: RetryPolicy,
    status: Rc<Cell<MountStatus>>,
}

/// Owns the host and every mount still waiting for its mount point.
#[derive(Debug)]
pub struct MountScheduler<H: MountHost> {
    host: H,
    pending: VecDeque<PendingMount>,
    next_task_id: u64,
}

impl<H: MountHost> MountScheduler<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            pending: VecDeque::new(),
            next_task_id: 0,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Mounts still waiting, excluding cancelled ones not yet swept by `tick`.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending
            .iter()
            .filter(|task| task.status.get().is_pending())
            .count()
    }

    /// Chaining entry point: mounts with unbounded retry and hands back
    /// `passthrough` unchanged whatever the outcome.
    pub fn render<T>(&mut self, request: RenderRequest<T>) -> T {
        let RenderRequest {
            mount_point_id,
            config,
            passthrough,
        } = request;
        let _handle = self.mount(mount_point_id, config, RetryPolicy::Unbounded);
        passthrough
    }

    /// Attempts the mount now and schedules retries when the mount point is missing.
    ///
    /// Never fails: build and render errors are logged and reported through
    /// `MountStatus::Failed`.
    pub fn mount(
        &mut self,
        mount_point_id: impl Into<String>,
        config: ChartConfiguration,
        policy: RetryPolicy,
    ) -> MountHandle {
        let mount_point_id = mount_point_id.into();
        if self.pending.iter().any(|task| {
            task.mount_point_id == mount_point_id && task.status.get().is_pending()
        }) {
            warn!(
                mount_point_id = %mount_point_id,
                "mount requested while another mount is pending for the same id"
            );
        }

        let id = MountTaskId(self.next_task_id);
        self.next_task_id += 1;
        let status = Rc::new(Cell::new(MountStatus::Pending { attempts: 0 }));
        let handle = MountHandle {
            id,
            status: Rc::clone(&status),
        };
        let task = PendingMount {
            id,
            mount_point_id,
            config,
            policy,
            status,
        };

        if self.attempt(&task) {
            self.pending.push_back(task);
        }
        handle
    }

    /// Runs one cooperative scheduling tick: every pending mount is attempted
    /// exactly once. Returns the number of mounts still pending afterwards.
    pub fn tick(&mut self) -> usize {
        let due = self.pending.len();
        for _ in 0..due {
            let Some(task) = self.pending.pop_front() else {
                break;
            };
            if !task.status.get().is_pending() {
                trace!(task = task.id.0, "dropping settled mount");
                continue;
            }
            if self.attempt(&task) {
                self.pending.push_back(task);
            }
        }
        self.pending.len()
    }

    /// Returns `true` when the task must be retried on a later tick.
    fn attempt(&mut self, task: &PendingMount) -> bool {
        let MountStatus::Pending { attempts } = task.status.get() else {
            return false;
        };

        if !self.host.has_mount_point(&task.mount_point_id) {
            let attempts = attempts + 1;
            if !task.policy.allows(attempts) {
                warn!(
                    task = task.id.0,
                    mount_point_id = %task.mount_point_id,
                    attempts,
                    "mount point never appeared; giving up"
                );
                task.status.set(MountStatus::Exhausted);
                return false;
            }
            trace!(
                task = task.id.0,
                mount_point_id = %task.mount_point_id,
                attempts,
                "mount point not ready; retrying next tick"
            );
            task.status.set(MountStatus::Pending { attempts });
            return true;
        }

        let outcome = MuscleBarChart::from_configuration(&task.config)
            .and_then(|tree| self.host.render_into(&task.mount_point_id, &tree));
        match outcome {
            Ok(()) => {
                debug!(
                    task = task.id.0,
                    mount_point_id = %task.mount_point_id,
                    attempts = attempts + 1,
                    "bar chart mounted"
                );
                task.status.set(MountStatus::Mounted);
            }
            Err(err) => {
                error!(
                    task = task.id.0,
                    mount_point_id = %task.mount_point_id,
                    error = %err,
                    "bar chart rendering failed"
                );
                task.status.set(MountStatus::Failed);
            }
        }
        false
    }
}
