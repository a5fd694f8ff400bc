use crate::Export;
use libc::{c_int, c_void, off_t};
use macros::export;
use posix::mm;
use structures::error::Errno;

#[export]
unsafe fn mmap(
    addr: Option<*mut c_void>,
    len: usize,
    prot: c_int,
    flags: c_int,
    fd: c_int,
    off: off_t,
) -> Result<*mut c_void, Errno> {
    unsafe { mm::mmap(addr.map(|x| x as usize), len, prot, flags, fd, off) }
}

#[export]
unsafe fn munmap(addr: *mut c_void, len: usize) -> Result<(), Errno> {
    unsafe { mm::munmap(addr, len) }
}

#[export]
unsafe fn msync(addr: *mut c_void, len: usize, flags: c_int) -> Result<(), Errno> {
    unsafe { mm::msync(addr, len, flags) }
}

#[export(requires = Mremap)]
unsafe fn mremap(
    addr: *mut c_void,
    old_len: usize,
    new_len: usize,
    flags: c_int,
) -> Result<*mut c_void, Errno> {
    #[cfg(target_os = "linux")]
    return unsafe { mm::mremap(addr, old_len, new_len, flags) };
    #[cfg(not(target_os = "linux"))]
    {
        _ = (addr, old_len, new_len, flags);
        Err(Errno::ENOSYS)
    }
}

#[export]
unsafe fn madvise(addr: *mut c_void, len: usize, advice: c_int) -> Result<(), Errno> {
    unsafe { mm::madvise(addr, len, advice) }
}

#[export]
unsafe fn mlock(addr: *const c_void, len: usize) -> Result<(), Errno> {
    unsafe { mm::mlock(addr, len) }
}

#[export]
unsafe fn munlock(addr: *const c_void, len: usize) -> Result<(), Errno> {
    unsafe { mm::munlock(addr, len) }
}

#[export]
fn mlockall(flags: c_int) -> Result<(), Errno> {
    mm::mlockall(flags)
}

#[export]
fn munlockall() -> Result<(), Errno> {
    mm::munlockall()
}

#[export]
unsafe fn mprotect(addr: *mut c_void, len: usize, prot: c_int) -> Result<(), Errno> {
    unsafe { mm::mprotect(addr, len, prot) }
}

pub const EXPORTS: &[Export] = &[
    MMAP, MUNMAP, MSYNC, MREMAP, MADVISE, MLOCK, MUNLOCK, MLOCKALL, MUNLOCKALL, MPROTECT,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    const PAGE: i128 = 4096;

    fn int(n: impl Into<i128>) -> Value {
        Value::Integer(n.into())
    }

    #[test]
    fn anonymous_mapping_through_exports() {
        let ptr = invoke(
            "mmap",
            &mut [
                Value::Bool(false),
                int(PAGE),
                int(libc::PROT_READ | libc::PROT_WRITE),
                int(libc::MAP_PRIVATE | libc::MAP_ANONYMOUS),
                int(-1),
                int(0),
            ],
        )
        .unwrap();
        let Value::Pointer(addr) = ptr else {
            panic!("mmap returned {ptr}");
        };
        unsafe { (addr as *mut u8).write(7) };
        let ret = invoke("mprotect", &mut [ptr.clone(), int(PAGE), int(libc::PROT_READ)]);
        assert_eq!(ret, Ok(int(0)));
        assert_eq!(unsafe { (addr as *const u8).read() }, 7);
        assert_eq!(invoke("munmap", &mut [ptr, int(PAGE)]), Ok(int(0)));
    }

    #[test]
    fn failed_mapping_is_encoded() {
        let ret = invoke(
            "mmap",
            &mut [
                Value::Bool(false),
                int(PAGE),
                int(libc::PROT_READ),
                int(libc::MAP_PRIVATE),
                int(-1),
                int(0),
            ],
        );
        assert_eq!(ret, Ok(int(-(libc::EBADF as i128))));
    }
}
