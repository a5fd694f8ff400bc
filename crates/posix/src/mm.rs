use crate::posix_bi;
use libc::{c_int, c_void, off_t};
use structures::error::Errno;

/// # Safety
/// Mapping over an existing address range (`MAP_FIXED`) invalidates whatever lived there.
pub unsafe fn mmap(
    addr: Option<usize>,
    len: usize,
    prot: c_int,
    flags: c_int,
    fd: c_int,
    off: off_t,
) -> Result<*mut c_void, Errno> {
    crate::util::clear_errno();
    let addr = addr.unwrap_or(0) as *mut c_void;
    let ptr = unsafe { libc::mmap(addr, len, prot, flags, fd, off) };
    match ptr == libc::MAP_FAILED {
        true => Err(Errno::last()),
        false => Ok(ptr),
    }
}

/// # Safety
/// Nothing may access the range afterwards.
pub unsafe fn munmap(addr: *mut c_void, len: usize) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::munmap(addr, len)) }
}

/// # Safety
/// `addr` must be the start of a mapping.
pub unsafe fn msync(addr: *mut c_void, len: usize, flags: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::msync(addr, len, flags)) }
}

/// # Safety
/// `addr` must be the start of a mapping of `old_len` bytes. It may move.
#[cfg(target_os = "linux")]
pub unsafe fn mremap(
    addr: *mut c_void,
    old_len: usize,
    new_len: usize,
    flags: c_int,
) -> Result<*mut c_void, Errno> {
    crate::util::clear_errno();
    let ptr = unsafe { libc::mremap(addr, old_len, new_len, flags) };
    match ptr == libc::MAP_FAILED {
        true => Err(Errno::last()),
        false => Ok(ptr),
    }
}

/// # Safety
/// Some advice (such as `MADV_DONTNEED`) discards the contents of the range.
pub unsafe fn madvise(addr: *mut c_void, len: usize, advice: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::madvise(addr, len, advice)) }
}

/// # Safety
/// `addr` must point into mapped memory.
pub unsafe fn mlock(addr: *const c_void, len: usize) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::mlock(addr, len)) }
}

/// # Safety
/// `addr` must point into mapped memory.
pub unsafe fn munlock(addr: *const c_void, len: usize) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::munlock(addr, len)) }
}

pub fn mlockall(flags: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::mlockall(flags)) }
}

pub fn munlockall() -> Result<(), Errno> {
    unsafe { posix_bi!(libc::munlockall()) }
}

/// # Safety
/// Removing access from memory still in use faults its next user.
pub unsafe fn mprotect(addr: *mut c_void, len: usize, prot: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::mprotect(addr, len, prot)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: usize = 4096;

    #[test]
    fn anonymous_mapping_lifecycle() {
        unsafe {
            let ptr = mmap(
                None,
                PAGE,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
            .unwrap();
            ptr.cast::<u8>().write(0x5a);
            mprotect(ptr, PAGE, libc::PROT_READ).unwrap();
            assert_eq!(ptr.cast::<u8>().read(), 0x5a);
            madvise(ptr, PAGE, libc::MADV_NORMAL).unwrap();
            munmap(ptr, PAGE).unwrap();
        }
    }

    #[test]
    fn mmap_of_bad_descriptor_fails() {
        let result = unsafe { mmap(None, PAGE, libc::PROT_READ, libc::MAP_PRIVATE, -1, 0) };
        assert_eq!(result.unwrap_err(), Errno::EBADF);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn mremap_grows_mapping() {
        unsafe {
            let ptr = mmap(
                None,
                PAGE,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
            .unwrap();
            ptr.cast::<u8>().write(7);
            let grown = mremap(ptr, PAGE, PAGE * 2, libc::MREMAP_MAYMOVE).unwrap();
            assert_eq!(grown.cast::<u8>().read(), 7);
            munmap(grown, PAGE * 2).unwrap();
        }
    }
}
