use crate::{ffi, util::c_path};
use libc::c_char;
use structures::{error::Errno, net::AddressFamily, util::c_bytes};

pub const IN6ADDR_ANY: [u8; 16] = [0; 16];
/// Longest textual IPv6 address, including the terminating NUL.
const INET6_ADDRSTRLEN: usize = 46;

pub const IN6ADDR_LOOPBACK: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];

/// Parses a dotted IPv4 address in any of the forms `inet_aton` accepts. Returns [`None`] if `text` is not one.
pub fn inet_aton(text: &[u8]) -> Result<Option<[u8; 4]>, Errno> {
    let text = c_path(text)?;
    let mut addr = libc::in_addr { s_addr: 0 };
    match unsafe { ffi::inet_aton(text.as_ptr(), &mut addr) } {
        0 => Ok(None),
        _ => Ok(Some(addr.s_addr.to_ne_bytes())),
    }
}

pub fn inet_ntoa(addr: [u8; 4]) -> Vec<u8> {
    let addr = libc::in_addr {
        s_addr: u32::from_ne_bytes(addr),
    };
    unsafe { c_bytes(ffi::inet_ntoa(addr)) }
}

/// Parses `text` as an address of family `af`. Returns [`None`] if `text` is not one.
pub fn inet_pton(af: AddressFamily, text: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    let len = af.addr_len().ok_or(Errno::EAFNOSUPPORT)?;
    let text = c_path(text)?;
    let mut buf = [0u8; 16];
    crate::util::clear_errno();
    match unsafe { ffi::inet_pton(af.0, text.as_ptr(), buf.as_mut_ptr().cast()) } {
        0 => Ok(None),
        -1 => Err(Errno::last()),
        _ => Ok(Some(buf[..len].to_vec())),
    }
}

/// Formats a binary address of family `af`. Returns [`None`] if `addr` has the wrong length for it.
pub fn inet_ntop(af: AddressFamily, addr: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    let len = af.addr_len().ok_or(Errno::EAFNOSUPPORT)?;
    if addr.len() != len {
        return Ok(None);
    }
    let mut buf = [0 as c_char; INET6_ADDRSTRLEN];
    crate::util::clear_errno();
    let text = unsafe {
        ffi::inet_ntop(
            af.0,
            addr.as_ptr().cast(),
            buf.as_mut_ptr(),
            buf.len() as u32,
        )
    };
    match text.is_null() {
        true => Err(Errno::last()),
        false => Ok(Some(structures::util::array_bytes(&buf))),
    }
}
