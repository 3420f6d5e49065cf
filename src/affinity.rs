//! Placement of the measuring thread.
//!
//! Pinning avoids migrations between cores (and their private caches) in the middle of a
//! sweep, and maximum priority makes preemption during a trial less likely. Neither is
//! required for a valid measurement so failures are only logged.
use log::{info, warn};

/// Pin the current thread to `core` and/or raise it to maximum priority
pub fn place_current_thread(core: Option<usize>, max_priority: bool) {
    if let Some(cpu_num) = core {
        let core_id = core_affinity::CoreId { id: cpu_num };
        if core_affinity::set_for_current(core_id) {
            info!("Pinned measuring thread to CPU core {cpu_num}");
        } else {
            warn!("Couldn't pin measuring thread to CPU core {cpu_num} (NOTE: this is expected on macOS)");
        }
    }

    if max_priority {
        if thread_priority::set_current_thread_priority(thread_priority::ThreadPriority::Max).is_err() {
            warn!("Couldn't set measuring thread to maximum thread priority");
        } else {
            info!("Measuring thread running at maximum priority");
        }
    }
}
