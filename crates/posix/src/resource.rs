use crate::posix_bi;
use structures::{
    FromNative, ToNative,
    error::Errno,
    process::{RLimit, RUsage, RUsageWho, Resource},
};

pub const RLIM_INFINITY: u64 = libc::RLIM_INFINITY as u64;

pub fn getrlimit(resource: Resource) -> Result<RLimit, Errno> {
    let resource = resource.to_native()?;
    let mut native = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    unsafe { posix_bi!(libc::getrlimit(resource as _, &mut native))? };
    RLimit::from_native(native)
}

pub fn setrlimit(resource: Resource, limit: RLimit) -> Result<(), Errno> {
    let resource = resource.to_native()?;
    let native = limit.to_native()?;
    unsafe { posix_bi!(libc::setrlimit(resource as _, &native)) }
}

pub fn getrusage(who: RUsageWho) -> Result<RUsage, Errno> {
    let who = who.to_native()?;
    let mut native: libc::rusage = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::getrusage(who as _, &mut native))? };
    RUsage::from_native(native)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowering_the_soft_core_limit() {
        let old = getrlimit(Resource::RLIMIT_CORE).unwrap();
        let lowered = RLimit { cur: 0, ..old };
        setrlimit(Resource::RLIMIT_CORE, lowered).unwrap();
        assert_eq!(getrlimit(Resource::RLIMIT_CORE), Ok(lowered));
        setrlimit(Resource::RLIMIT_CORE, old).unwrap();
    }

    #[test]
    fn soft_limit_above_hard_is_rejected() {
        let old = getrlimit(Resource::RLIMIT_NOFILE).unwrap();
        if old.max == RLIM_INFINITY {
            return;
        }
        let bad = RLimit {
            cur: old.max + 1,
            max: old.max,
        };
        assert_eq!(setrlimit(Resource::RLIMIT_NOFILE, bad), Err(Errno::EINVAL));
    }

    #[test]
    fn own_usage() {
        let usage = getrusage(RUsageWho::RUSAGE_SELF).unwrap();
        assert!(usage.maxrss > 0);
        assert!(usage.utime.tv_usec < 1_000_000);
        assert_eq!(getrusage(RUsageWho(42)), Err(Errno::EINVAL));
    }
}
