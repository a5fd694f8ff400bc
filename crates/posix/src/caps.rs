//! The capability table.
//!
//! Optional POSIX option groups are probed once, then masked by the `POSIXGLUE_DISABLE` switch.

use std::{fmt, sync::OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    MessageQueues,
    Semaphores,
    SharedMemory,
    Timers,
    RealtimeSignals,
    CpuClocks,
    Mremap,
}
impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::MessageQueues,
        Feature::Semaphores,
        Feature::SharedMemory,
        Feature::Timers,
        Feature::RealtimeSignals,
        Feature::CpuClocks,
        Feature::Mremap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MessageQueues => "message-queues",
            Self::Semaphores => "semaphores",
            Self::SharedMemory => "shared-memory",
            Self::Timers => "timers",
            Self::RealtimeSignals => "realtime-signals",
            Self::CpuClocks => "cpu-clocks",
            Self::Mremap => "mremap",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.name() == name)
    }

    fn probe(self) -> bool {
        match self {
            Self::MessageQueues => sysconf_option(libc::_SC_MESSAGE_PASSING),
            Self::Semaphores => sysconf_option(libc::_SC_SEMAPHORES),
            Self::SharedMemory => sysconf_option(libc::_SC_SHARED_MEMORY_OBJECTS),
            Self::Timers => sysconf_option(libc::_SC_TIMERS),
            Self::RealtimeSignals => sysconf_option(libc::_SC_REALTIME_SIGNALS),
            Self::CpuClocks => sysconf_option(libc::_SC_CPUTIME),
            Self::Mremap => cfg!(target_os = "linux"),
        }
    }
}
impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sysconf_option(name: libc::c_int) -> bool {
    unsafe { libc::sysconf(name) > 0 }
}

fn resolve(disabled: &[String]) -> [(Feature, bool); 7] {
    Feature::ALL.map(|feature| {
        let off = disabled.iter().any(|x| x == feature.name());
        (feature, !off && feature.probe())
    })
}

/// Returns the capability table, resolving it on first use.
pub fn table() -> &'static [(Feature, bool)] {
    static TABLE: OnceLock<[(Feature, bool); 7]> = OnceLock::new();
    TABLE.get_or_init(|| resolve(&crate::config::disabled_features()))
}

/// Returns `true` if `feature` is usable on this system.
#[inline]
pub fn available(feature: Feature) -> bool {
    table().iter().any(|&(x, on)| x == feature && on)
}
