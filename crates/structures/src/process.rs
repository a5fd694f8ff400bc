use crate::{FromNative, ToNative, error::Errno, time::Timeval, unixvariants};
use bitflags::bitflags;
use libc::c_int;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct WaitOptions: c_int {
        const WNOHANG = libc::WNOHANG;
        const WUNTRACED = libc::WUNTRACED;
        const WCONTINUED = libc::WCONTINUED;
    }
}

/// A status word as filled in by `wait`/`waitpid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct WaitStatus(pub c_int);
impl WaitStatus {
    pub fn exited(self) -> bool {
        libc::WIFEXITED(self.0)
    }

    pub fn exit_status(self) -> c_int {
        libc::WEXITSTATUS(self.0)
    }

    pub fn signaled(self) -> bool {
        libc::WIFSIGNALED(self.0)
    }

    pub fn term_sig(self) -> c_int {
        libc::WTERMSIG(self.0)
    }

    pub fn stopped(self) -> bool {
        libc::WIFSTOPPED(self.0)
    }

    pub fn stop_sig(self) -> c_int {
        libc::WSTOPSIG(self.0)
    }

    pub fn core_dumped(self) -> bool {
        libc::WCOREDUMP(self.0)
    }
}

unixvariants! {
    pub struct RUsageWho: c_int {
        const RUSAGE_SELF;
        const RUSAGE_CHILDREN;
        const RUSAGE_THREAD;
    }
}

unixvariants! {
    pub struct Resource: c_int {
        const RLIMIT_CPU;
        const RLIMIT_FSIZE;
        const RLIMIT_DATA;
        const RLIMIT_STACK;
        const RLIMIT_CORE;
        const RLIMIT_RSS;
        const RLIMIT_NPROC;
        const RLIMIT_NOFILE;
        const RLIMIT_MEMLOCK;
        const RLIMIT_AS;
        const RLIMIT_LOCKS;
        const RLIMIT_SIGPENDING;
        const RLIMIT_MSGQUEUE;
        const RLIMIT_NICE;
        const RLIMIT_RTPRIO;
        const RLIMIT_RTTIME;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RLimit {
    pub cur: u64,
    pub max: u64,
}
impl FromNative for RLimit {
    type Native = libc::rlimit;

    fn from_native(native: libc::rlimit) -> Result<Self, Errno> {
        Ok(Self {
            cur: native.rlim_cur as _,
            max: native.rlim_max as _,
        })
    }
}
impl ToNative for RLimit {
    type Native = libc::rlimit;

    fn to_native(self) -> Result<libc::rlimit, Errno> {
        Ok(libc::rlimit {
            rlim_cur: self.cur as _,
            rlim_max: self.max as _,
        })
    }
}

/// Resource usage, in the field order the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RUsage {
    pub utime: Timeval,
    pub stime: Timeval,
    pub maxrss: i64,
    pub ixrss: i64,
    pub idrss: i64,
    pub isrss: i64,
    pub minflt: i64,
    pub majflt: i64,
    pub nswap: i64,
    pub inblock: i64,
    pub oublock: i64,
    pub msgsnd: i64,
    pub msgrcv: i64,
    pub nsignals: i64,
    pub nvcsw: i64,
    pub nivcsw: i64,
}
impl FromNative for RUsage {
    type Native = libc::rusage;

    fn from_native(native: libc::rusage) -> Result<Self, Errno> {
        Ok(Self {
            utime: Timeval::from_native(native.ru_utime)?,
            stime: Timeval::from_native(native.ru_stime)?,
            maxrss: native.ru_maxrss as _,
            ixrss: native.ru_ixrss as _,
            idrss: native.ru_idrss as _,
            isrss: native.ru_isrss as _,
            minflt: native.ru_minflt as _,
            majflt: native.ru_majflt as _,
            nswap: native.ru_nswap as _,
            inblock: native.ru_inblock as _,
            oublock: native.ru_oublock as _,
            msgsnd: native.ru_msgsnd as _,
            msgrcv: native.ru_msgrcv as _,
            nsignals: native.ru_nsignals as _,
            nvcsw: native.ru_nvcsw as _,
            nivcsw: native.ru_nivcsw as _,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_status_decodes_exit_code() {
        // Exit status 3, as encoded by the kernel.
        let status = WaitStatus(3 << 8);
        assert!(status.exited());
        assert!(!status.signaled());
        assert_eq!(status.exit_status(), 3);
    }

    #[test]
    fn wait_status_decodes_signal() {
        let status = WaitStatus(libc::SIGKILL);
        assert!(status.signaled());
        assert_eq!(status.term_sig(), libc::SIGKILL);
    }

    #[test]
    fn rusage_keeps_microseconds() {
        let mut native: libc::rusage = unsafe { std::mem::zeroed() };
        native.ru_utime.tv_sec = 5;
        native.ru_utime.tv_usec = 250;
        native.ru_stime.tv_sec = 6;
        native.ru_stime.tv_usec = 500;
        native.ru_nivcsw = 9;
        let usage = RUsage::from_native(native).unwrap();
        assert_eq!((usage.utime.tv_sec, usage.utime.tv_usec), (5, 250));
        assert_eq!((usage.stime.tv_sec, usage.stime.tv_usec), (6, 500));
        assert_eq!(usage.nivcsw, 9);
    }
}
