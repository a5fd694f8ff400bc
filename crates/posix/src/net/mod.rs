pub mod addr;
pub mod netdb;
pub mod sockopt;

use crate::{posix_bi, posix_num, util::transfer_size};
use libc::{c_int, socklen_t};
use structures::{ToNative, error::Errno, net::ShutdownHow};

/// Calls `f` with an empty socket address buffer, returning the bytes it filled in.
fn with_sockaddr_out<T>(
    f: impl FnOnce(*mut libc::sockaddr, *mut socklen_t) -> Result<T, Errno>,
) -> Result<(T, Vec<u8>), Errno> {
    let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
    let mut len = size_of::<libc::sockaddr_storage>() as socklen_t;
    let value = f((&raw mut storage).cast(), &mut len)?;
    let len = (len as usize).min(size_of::<libc::sockaddr_storage>());
    let bytes = structures::util::struct_bytes(&storage);
    Ok((value, bytes[..len].to_vec()))
}

pub fn socket(domain: c_int, ty: c_int, protocol: c_int) -> Result<c_int, Errno> {
    unsafe { posix_num!(libc::socket(domain, ty, protocol)) }
}

pub fn socketpair(domain: c_int, ty: c_int, protocol: c_int) -> Result<(c_int, c_int), Errno> {
    let mut fds = [-1; 2];
    unsafe { posix_bi!(libc::socketpair(domain, ty, protocol, fds.as_mut_ptr()))? };
    Ok((fds[0], fds[1]))
}

pub fn shutdown(fd: c_int, how: ShutdownHow) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::shutdown(fd, how.to_native()?)) }
}

pub fn connect(fd: c_int, addr: &[u8]) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::connect(fd, addr.as_ptr().cast(), addr.len() as _)) }
}

pub fn bind(fd: c_int, addr: &[u8]) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::bind(fd, addr.as_ptr().cast(), addr.len() as _)) }
}

pub fn listen(fd: c_int, backlog: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::listen(fd, backlog)) }
}

/// Accepts a connection, returning the new descriptor and the peer address.
pub fn accept(fd: c_int) -> Result<(c_int, Vec<u8>), Errno> {
    with_sockaddr_out(|addr, len| unsafe { posix_num!(libc::accept(fd, addr, len)) })
}

pub fn getpeername(fd: c_int) -> Result<Vec<u8>, Errno> {
    with_sockaddr_out(|addr, len| unsafe { posix_bi!(libc::getpeername(fd, addr, len)) })
        .map(|(_, addr)| addr)
}

pub fn getsockname(fd: c_int) -> Result<Vec<u8>, Errno> {
    with_sockaddr_out(|addr, len| unsafe { posix_bi!(libc::getsockname(fd, addr, len)) })
        .map(|(_, addr)| addr)
}

pub fn send(fd: c_int, buf: &[u8], size: Option<usize>, flags: c_int) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe { posix_num!(libc::send(fd, buf.as_ptr().cast(), size, flags)) }
}

pub fn recv(fd: c_int, buf: &mut [u8], size: Option<usize>, flags: c_int) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe { posix_num!(libc::recv(fd, buf.as_mut_ptr().cast(), size, flags)) }
}

pub fn sendto(
    fd: c_int,
    buf: &[u8],
    size: Option<usize>,
    flags: c_int,
    addr: &[u8],
) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe {
        posix_num!(libc::sendto(
            fd,
            buf.as_ptr().cast(),
            size,
            flags,
            addr.as_ptr().cast(),
            addr.len() as _
        ))
    }
}

/// Receives a datagram, returning the byte count and the sender address.
pub fn recvfrom(
    fd: c_int,
    buf: &mut [u8],
    size: Option<usize>,
    flags: c_int,
) -> Result<(usize, Vec<u8>), Errno> {
    let size = transfer_size(buf.len(), size)?;
    with_sockaddr_out(|addr, len| unsafe {
        posix_num!(libc::recvfrom(
            fd,
            buf.as_mut_ptr().cast(),
            size,
            flags,
            addr,
            len
        ))
    })
}
