//! Best-effort timing protection for the polling loops.
//!
//! Cycle counting is only as stable as the thread doing the counting. A
//! preemption in the middle of a 70 us pulse skews the count and usually
//! costs the attempt a checksum failure, so callers may elevate the thread
//! to a real-time scheduling class and pin its pages before reading. This
//! is a mitigation, not a guarantee: when the process lacks the privilege
//! (`CAP_SYS_NICE`, `RLIMIT_MEMLOCK`), reads still work, just with a higher
//! intrinsic error rate.

use std::io;

/// Moves the calling thread to `SCHED_FIFO` at maximum priority and locks
/// all current and future pages into memory.
///
/// Call once before the first read. Failure must be treated as advisory;
/// do not abort the read over it.
pub fn elevate() -> io::Result<()> {
    // SAFETY: both calls only mutate scheduling/memory attributes of the
    // calling process and read no memory besides the zeroed param struct.
    unsafe {
        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = libc::sched_get_priority_max(libc::SCHED_FIFO);
        if libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) != 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::mlockall(libc::MCL_CURRENT | libc::MCL_FUTURE) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
