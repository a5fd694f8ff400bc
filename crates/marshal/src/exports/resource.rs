use crate::Export;
use macros::export;
use posix::resource;
use structures::{
    error::Errno,
    process::{RLimit, RUsage, RUsageWho, Resource},
};

#[export(name = "RLIM_INFINITY")]
fn rlim_infinity() -> u64 {
    resource::RLIM_INFINITY
}

/// `[cur max]`.
#[export]
fn getrlimit(resource: Resource) -> Result<RLimit, Errno> {
    resource::getrlimit(resource)
}

#[export]
fn setrlimit(resource: Resource, limit: RLimit) -> Result<(), Errno> {
    resource::setrlimit(resource, limit)
}

#[export]
fn getrusage(who: RUsageWho) -> Result<RUsage, Errno> {
    resource::getrusage(who)
}

pub const EXPORTS: &[Export] = &[RLIM_INFINITY, GETRLIMIT, SETRLIMIT, GETRUSAGE];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    #[test]
    fn infinity_constant() {
        let ret = invoke("RLIM_INFINITY", &mut []);
        assert_eq!(ret, Ok(Value::Integer(libc::RLIM_INFINITY as i128)));
    }

    #[test]
    fn soft_limit_can_be_lowered() {
        let which = Value::Integer(libc::RLIMIT_CORE as i128);
        let old = invoke("getrlimit", &mut [which.clone()]).unwrap();
        let Value::Struct(ref fields) = old else {
            panic!("getrlimit returned {old}");
        };
        let lowered = Value::Struct(vec![Value::Integer(0), fields[1].clone()]);
        assert_eq!(invoke("setrlimit", &mut [which.clone(), lowered.clone()]), Ok(Value::Integer(0)));
        assert_eq!(invoke("getrlimit", &mut [which.clone()]), Ok(lowered));
        assert_eq!(invoke("setrlimit", &mut [which, old.clone()]), Ok(Value::Integer(0)));
    }

    #[test]
    fn usage_times_are_pairs() {
        let usage = invoke("getrusage", &mut [Value::Integer(libc::RUSAGE_SELF as i128)]).unwrap();
        let Value::Struct(fields) = usage else {
            panic!("getrusage returned {usage}");
        };
        assert_eq!(fields.len(), 16);
        assert!(matches!(fields[0], Value::Struct(ref tv) if tv.len() == 2));
        let bad = invoke("getrusage", &mut [Value::Integer(12345)]);
        assert_eq!(bad, Ok(Value::Integer(-(libc::EINVAL as i128))));
    }
}
