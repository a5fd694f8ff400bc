//! Structures and definitions of POSIX records, along with utilities converting them from and to the native ones.

pub mod error;
pub mod fs;
pub mod ipc;
pub mod misc;
pub mod net;
pub mod process;
pub mod signal;
pub mod time;
pub mod user;
pub mod util;

/// Converts a value from the native (libc) representation.
pub trait FromNative: Sized {
    /// The type of the native representation.
    type Native;

    /// Converts a value from the native representation.
    fn from_native(native: Self::Native) -> Result<Self, error::Errno>;
}

/// Converts a value to the native (libc) representation.
pub trait ToNative {
    /// The type of the native representation.
    type Native;

    /// Converts a value to the native representation.
    fn to_native(self) -> Result<Self::Native, error::Errno>;
}

/// Declares a newtype over a native integer that only accepts a fixed set of libc constants.
///
/// Conversion from an unknown native value fails with `EINVAL`.
#[macro_export]
macro_rules! unixvariants {
    {
        $(#[$outer:meta])*
        $v:vis struct $n:ident: $t:ty {
            $(const $j:ident;)*
        }
    } => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $v struct $n(pub $t);
        impl $n {
            $(
                pub const $j: Self = Self(libc::$j as $t);
            )*

            /// Returns the symbolic name of this value, if it is a known one.
            pub fn name(self) -> Option<&'static str> {
                $(
                    if self == Self::$j {
                        return Some(stringify!($j));
                    }
                )*
                None
            }
        }
        impl $crate::FromNative for $n {
            type Native = $t;

            fn from_native(native: $t) -> Result<Self, $crate::error::Errno> {
                let value = Self(native);
                match value.name() {
                    Some(_) => Ok(value),
                    None => Err($crate::error::Errno::EINVAL),
                }
            }
        }
        impl $crate::ToNative for $n {
            type Native = $t;

            fn to_native(self) -> Result<$t, $crate::error::Errno> {
                Ok(self.0)
            }
        }
    };
}
