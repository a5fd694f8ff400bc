use crate::posix_bi;
use libc::{c_int, socklen_t};
use structures::{error::Errno, net::Linger};

/// Reads an option into `buf`, returning the length the kernel filled in.
pub fn getsockopt(fd: c_int, level: c_int, name: c_int, buf: &mut [u8]) -> Result<usize, Errno> {
    let mut len = buf.len() as socklen_t;
    unsafe {
        posix_bi!(libc::getsockopt(
            fd,
            level,
            name,
            buf.as_mut_ptr().cast(),
            &mut len
        ))?
    };
    Ok(len as usize)
}

pub fn setsockopt(fd: c_int, level: c_int, name: c_int, buf: &[u8]) -> Result<(), Errno> {
    unsafe {
        posix_bi!(libc::setsockopt(
            fd,
            level,
            name,
            buf.as_ptr().cast(),
            buf.len() as socklen_t
        ))
    }
}

/// A value an option is read and written as.
pub trait OptValue: Sized {
    type Native: Copy;

    fn from_opt(native: Self::Native) -> Self;
    fn to_opt(self) -> Self::Native;
}
impl OptValue for c_int {
    type Native = c_int;

    fn from_opt(native: c_int) -> Self {
        native
    }

    fn to_opt(self) -> c_int {
        self
    }
}
impl OptValue for usize {
    type Native = usize;

    fn from_opt(native: usize) -> Self {
        native
    }

    fn to_opt(self) -> usize {
        self
    }
}
impl OptValue for Linger {
    type Native = libc::linger;

    fn from_opt(native: libc::linger) -> Self {
        Linger::from_native(native)
    }

    fn to_opt(self) -> libc::linger {
        self.to_native()
    }
}

pub fn get<T: OptValue>(fd: c_int, level: c_int, name: c_int) -> Result<T, Errno> {
    let mut native: T::Native = unsafe { std::mem::zeroed() };
    let mut len = size_of::<T::Native>() as socklen_t;
    unsafe {
        posix_bi!(libc::getsockopt(
            fd,
            level,
            name,
            (&raw mut native).cast(),
            &mut len
        ))?
    };
    Ok(T::from_opt(native))
}

pub fn set<T: OptValue>(fd: c_int, level: c_int, name: c_int, value: T) -> Result<(), Errno> {
    let native = value.to_opt();
    unsafe {
        posix_bi!(libc::setsockopt(
            fd,
            level,
            name,
            (&raw const native).cast(),
            size_of::<T::Native>() as socklen_t
        ))
    }
}

/// How a named option's value is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptKind {
    Int,
    Size,
    Linger,
}

/// A socket option known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SockOpt {
    pub name: &'static str,
    pub level: c_int,
    pub option: c_int,
    pub kind: OptKind,
}

macro_rules! sockopt_table {
    ($($level:ident: $($opt:ident => $kind:ident),* ;)*) => {
        &[$($(SockOpt {
            name: stringify!($opt),
            level: libc::$level,
            option: libc::$opt,
            kind: OptKind::$kind,
        },)*)*]
    };
}

pub const SOCKOPTS: &[SockOpt] = sockopt_table! {
    SOL_SOCKET:
        SO_DEBUG => Int, SO_REUSEADDR => Int, SO_REUSEPORT => Int, SO_KEEPALIVE => Int,
        SO_DONTROUTE => Int, SO_BROADCAST => Int, SO_OOBINLINE => Int, SO_RCVBUF => Int,
        SO_SNDBUF => Int, SO_RCVLOWAT => Int, SO_SNDLOWAT => Int, SO_TYPE => Int,
        SO_ERROR => Int, SO_ACCEPTCONN => Int, SO_LINGER => Linger;
    IPPROTO_TCP:
        TCP_NODELAY => Int, TCP_MAXSEG => Int, TCP_KEEPIDLE => Int, TCP_KEEPINTVL => Int,
        TCP_KEEPCNT => Int;
    IPPROTO_IP:
        IP_TTL => Int, IP_TOS => Int, IP_MULTICAST_TTL => Int, IP_MULTICAST_LOOP => Int;
    IPPROTO_IPV6:
        IPV6_V6ONLY => Int, IPV6_UNICAST_HOPS => Int, IPV6_MULTICAST_HOPS => Int,
        IPV6_MULTICAST_LOOP => Int;
};

/// Looks up an option by its symbolic name, such as `SO_REUSEADDR`.
pub fn lookup(name: &str) -> Option<&'static SockOpt> {
    SOCKOPTS.iter().find(|opt| opt.name == name)
}
