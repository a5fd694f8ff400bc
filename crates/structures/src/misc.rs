use crate::{FromNative, error::Errno, util::array_bytes};

/// System identification, as returned by `uname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtsName {
    pub sysname: Vec<u8>,
    pub nodename: Vec<u8>,
    pub release: Vec<u8>,
    pub version: Vec<u8>,
    pub machine: Vec<u8>,
}
impl FromNative for UtsName {
    type Native = libc::utsname;

    fn from_native(native: libc::utsname) -> Result<Self, Errno> {
        Ok(Self {
            sysname: array_bytes(&native.sysname),
            nodename: array_bytes(&native.nodename),
            release: array_bytes(&native.release),
            version: array_bytes(&native.version),
            machine: array_bytes(&native.machine),
        })
    }
}
