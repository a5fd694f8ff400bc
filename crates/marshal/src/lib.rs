//! Marshalling between host values and the POSIX layer.
//!
//! Every exported wrapper takes its arguments as [`Value`]s, decodes them with [`FromHost`] or [`FromHostMut`],
//! calls into [`posix`] and encodes the outcome with [`ToHost`]. OS failures never surface as Rust errors here;
//! they are encoded into the returned value the way the host expects.

pub mod error;
pub mod exports;
pub mod reader;
pub mod records;
pub mod value;

mod registry;

pub use error::MarshalError;
pub use posix::caps::Feature;
pub use registry::{Export, invoke, lookup, registered, require};
pub use value::Value;

use libc::pollfd;
use structures::{
    error::Errno,
    fs::{AccessMode, LockfCmd, OpenFlags, Whence},
    net::{AddressFamily, GaiError, HostErrno, ShutdownHow},
    process::{RUsageWho, Resource, WaitOptions, WaitStatus},
    time::{ItimerWhich, TimerFlags},
};

/// Names the kind of host value a decoding expected but did not get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected(pub &'static str);

/// Decodes a Rust value from a borrowed host value.
pub trait FromHost<'a>: Sized {
    fn from_host(value: &'a Value) -> Result<Self, Expected>;
}

/// Decodes a Rust value that may write back into the host value, such as an in-place buffer.
pub trait FromHostMut<'a>: Sized {
    fn from_host_mut(value: &'a mut Value) -> Result<Self, Expected>;
}

/// Encodes a Rust value as a host value.
pub trait ToHost {
    fn to_host(self) -> Value;
}

/// An error code that is reported to the host as a plain integer.
pub trait EncodedError {
    fn encoded(self) -> i64;
}
impl EncodedError for Errno {
    fn encoded(self) -> i64 {
        Errno::encoded(self)
    }
}
impl EncodedError for HostErrno {
    fn encoded(self) -> i64 {
        HostErrno::encoded(self)
    }
}
impl EncodedError for GaiError {
    fn encoded(self) -> i64 {
        GaiError::encoded(self)
    }
}

/// The host's unspecified value, returned by wrappers around `void` functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Void;

/// A proper host list of `T`.
///
/// `Vec<u8>` maps to a bytevector, so lists need a type of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T>(pub Vec<T>);

macro_rules! impl_from_to_host_plain {
    ($t:ty) => {
        impl<'a> FromHost<'a> for $t {
            fn from_host(value: &'a Value) -> Result<Self, Expected> {
                match value {
                    Value::Integer(n) => <$t>::try_from(*n)
                        .map_err(|_| Expected(concat!("an integer fitting ", stringify!($t)))),
                    _ => Err(Expected("an integer")),
                }
            }
        }
        impl ToHost for $t {
            fn to_host(self) -> Value {
                Value::Integer(self as i128)
            }
        }
    };
    ($($t:ty);*) => {
        $(
            impl_from_to_host_plain!($t);
        )*
    };
}
macro_rules! impl_from_to_host_bitflags {
    ($t:ty) => {
        impl<'a> FromHost<'a> for $t {
            fn from_host(value: &'a Value) -> Result<Self, Expected> {
                FromHost::from_host(value).map(Self::from_bits_retain)
            }
        }
        impl ToHost for $t {
            fn to_host(self) -> Value {
                ToHost::to_host(self.bits())
            }
        }
    };
    ($($t:ty);*) => {
        $(
            impl_from_to_host_bitflags!($t);
        )*
    };
}
macro_rules! impl_from_to_host_newtype {
    ($t:ty) => {
        impl<'a> FromHost<'a> for $t {
            fn from_host(value: &'a Value) -> Result<Self, Expected> {
                FromHost::from_host(value).map(Self)
            }
        }
        impl ToHost for $t {
            fn to_host(self) -> Value {
                ToHost::to_host(self.0)
            }
        }
    };
    ($($t:ty);*) => {
        $(
            impl_from_to_host_newtype!($t);
        )*
    };
}
impl_from_to_host_plain!(i8; u8; i16; u16; i32; u32; i64; u64; isize; usize);
impl_from_to_host_bitflags!(AccessMode; OpenFlags; WaitOptions; TimerFlags);
impl_from_to_host_newtype!(
    Whence; LockfCmd; ItimerWhich; RUsageWho; Resource; AddressFamily; ShutdownHow; WaitStatus
);

impl<'a> FromHost<'a> for f64 {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        match *value {
            Value::Flonum(x) => Ok(x),
            Value::Integer(n) => Ok(n as f64),
            _ => Err(Expected("a real number")),
        }
    }
}
impl ToHost for f64 {
    fn to_host(self) -> Value {
        Value::Flonum(self)
    }
}

/// Any value but `#f` is true.
impl<'a> FromHost<'a> for bool {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        Ok(!value.is_false())
    }
}
impl ToHost for bool {
    fn to_host(self) -> Value {
        Value::Bool(self)
    }
}

impl<'a> FromHost<'a> for &'a Value {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        Ok(value)
    }
}
impl<'a> FromHostMut<'a> for &'a mut Value {
    fn from_host_mut(value: &'a mut Value) -> Result<Self, Expected> {
        Ok(value)
    }
}
impl ToHost for Value {
    fn to_host(self) -> Value {
        self
    }
}

// -== Buffers ==-

/// Reads a byte buffer. Memory blocks are trusted to describe live foreign memory owned by the host.
impl<'a> FromHost<'a> for &'a [u8] {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        match *value {
            Value::Bytevector(ref bytes) => Ok(bytes.as_slice()),
            Value::MemoryBlock { size: 0, .. } => Ok(&[][..]),
            Value::MemoryBlock { addr: 0, .. } => Err(Expected("a non-null memory block")),
            Value::MemoryBlock { addr, size } => unsafe {
                Ok(std::slice::from_raw_parts(addr as *const u8, size))
            },
            _ => Err(Expected("a bytevector or memory block")),
        }
    }
}
impl<'a> FromHostMut<'a> for &'a mut [u8] {
    fn from_host_mut(value: &'a mut Value) -> Result<Self, Expected> {
        match *value {
            Value::Bytevector(ref mut bytes) => Ok(bytes.as_mut_slice()),
            Value::MemoryBlock { size: 0, .. } => Ok(&mut [][..]),
            Value::MemoryBlock { addr: 0, .. } => Err(Expected("a non-null memory block")),
            Value::MemoryBlock { addr, size } => unsafe {
                Ok(std::slice::from_raw_parts_mut(addr as *mut u8, size))
            },
            _ => Err(Expected("a bytevector or memory block")),
        }
    }
}
impl<'a> FromHost<'a> for Vec<u8> {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        <&[u8]>::from_host(value).map(<[u8]>::to_vec)
    }
}
impl ToHost for Vec<u8> {
    fn to_host(self) -> Value {
        Value::Bytevector(self)
    }
}

impl<'a, T> FromHost<'a> for *mut T {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        match *value {
            Value::Pointer(addr) | Value::MemoryBlock { addr, .. } => Ok(addr as *mut T),
            _ => Err(Expected("a pointer")),
        }
    }
}
impl<T> ToHost for *mut T {
    fn to_host(self) -> Value {
        Value::Pointer(self as usize)
    }
}
impl<'a, T> FromHost<'a> for *const T {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        <*mut T>::from_host(value).map(<*mut T>::cast_const)
    }
}

// -== Composites ==-

impl<'a, T: FromHost<'a>> FromHost<'a> for Option<T> {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        match value {
            Value::Bool(false) => Ok(None),
            other => T::from_host(other).map(Some),
        }
    }
}
impl<T: ToHost> ToHost for Option<T> {
    fn to_host(self) -> Value {
        match self {
            Some(x) => x.to_host(),
            None => Value::Bool(false),
        }
    }
}

impl<'a, T: FromHost<'a>> FromHost<'a> for List<T> {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let items = value.list_items().ok_or(Expected("a proper list"))?;
        items.into_iter().map(T::from_host).collect::<Result<_, _>>().map(List)
    }
}
impl<T: ToHost> ToHost for List<T> {
    fn to_host(self) -> Value {
        Value::list(self.0.into_iter().map(ToHost::to_host))
    }
}

impl<A: ToHost, B: ToHost> ToHost for (A, B) {
    fn to_host(self) -> Value {
        Value::cons(self.0.to_host(), self.1.to_host())
    }
}

impl<T: ToHost, E: EncodedError> ToHost for Result<T, E> {
    fn to_host(self) -> Value {
        match self {
            Ok(x) => x.to_host(),
            Err(err) => Value::Integer(err.encoded() as i128),
        }
    }
}
impl ToHost for () {
    fn to_host(self) -> Value {
        Value::Integer(0)
    }
}
impl ToHost for Void {
    fn to_host(self) -> Value {
        Value::Void
    }
}

impl<'a> FromHost<'a> for pollfd {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [fd, events, revents] = records::fields(value)?;
        Ok(pollfd {
            fd: FromHost::from_host(fd)?,
            events: FromHost::from_host(events)?,
            revents: FromHost::from_host(revents)?,
        })
    }
}
