//! Training session lifecycle.
//!
//! Sessions move through `inpreparation -> openedregistration -> inprogress ->
//! completed -> archived`, with `cancelled` reachable before completion. The
//! date-driven steps are run by [`SessionTasks`].

mod status;
mod tasks;

pub use status::{Session, SessionId, SessionStatus, TransitionError};
pub use tasks::{SessionTasks, Task, TaskReport};
