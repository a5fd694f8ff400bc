use crate::{posix_bi, posix_num, util::c_path};
use libc::{c_int, c_uint, mode_t, sem_t};
use structures::{ToNative, error::Errno, time::Timespec};

pub const fn sizeof_sem_t() -> usize {
    size_of::<sem_t>()
}

// -== Named semaphores ==-

pub fn sem_open(name: &[u8], oflag: c_int, mode: mode_t, value: c_uint) -> Result<*mut sem_t, Errno> {
    let name = c_path(name)?;
    crate::util::clear_errno();
    let sem = unsafe { libc::sem_open(name.as_ptr(), oflag, mode, value) };
    match sem == libc::SEM_FAILED {
        true => Err(Errno::last()),
        false => Ok(sem),
    }
}

/// # Safety
/// `sem` must come from [`sem_open`] and must not be used afterwards.
pub unsafe fn sem_close(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::sem_close(sem)) }
}

pub fn sem_unlink(name: &[u8]) -> Result<(), Errno> {
    let name = c_path(name)?;
    unsafe { posix_bi!(libc::sem_unlink(name.as_ptr())) }
}

// -== Unnamed semaphores ==-

/// # Safety
/// `sem` must point to [`sizeof_sem_t`] writable bytes that stay in place until [`sem_destroy`].
pub unsafe fn sem_init(sem: *mut sem_t, pshared: bool, value: c_uint) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::sem_init(sem, pshared as c_int, value)) }
}

/// # Safety
/// `sem` must be an initialized unnamed semaphore nobody waits on.
pub unsafe fn sem_destroy(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::sem_destroy(sem)) }
}

// -== Operations ==-

/// # Safety
/// `sem` must be a live semaphore.
pub unsafe fn sem_post(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::sem_post(sem)) }
}

/// # Safety
/// `sem` must be a live semaphore.
pub unsafe fn sem_wait(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::sem_wait(sem)) }
}

/// Decrements `sem` if it can do so without blocking. Returns `false` if it cannot.
///
/// # Safety
/// `sem` must be a live semaphore.
pub unsafe fn sem_trywait(sem: *mut sem_t) -> Result<bool, Errno> {
    match unsafe { posix_bi!(libc::sem_trywait(sem)) } {
        Ok(()) => Ok(true),
        Err(Errno::EAGAIN) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Waits on `sem` until the absolute `CLOCK_REALTIME` instant `deadline`. Returns `false` if it passes.
///
/// # Safety
/// `sem` must be a live semaphore.
pub unsafe fn sem_timedwait(sem: *mut sem_t, deadline: Timespec) -> Result<bool, Errno> {
    let deadline = deadline.to_native()?;
    match unsafe { posix_bi!(libc::sem_timedwait(sem, &deadline)) } {
        Ok(()) => Ok(true),
        Err(Errno::ETIMEDOUT) => Ok(false),
        Err(err) => Err(err),
    }
}

/// # Safety
/// `sem` must be a live semaphore.
pub unsafe fn sem_getvalue(sem: *mut sem_t) -> Result<c_int, Errno> {
    let mut value: c_int = 0;
    unsafe { posix_bi!(libc::sem_getvalue(sem, &mut value))? };
    Ok(value)
}

// -== Shared memory ==-

pub fn shm_open(name: &[u8], oflag: c_int, mode: mode_t) -> Result<c_int, Errno> {
    let name = c_path(name)?;
    unsafe { posix_num!(libc::shm_open(name.as_ptr(), oflag, mode)) }
}

pub fn shm_unlink(name: &[u8]) -> Result<(), Errno> {
    let name = c_path(name)?;
    unsafe { posix_bi!(libc::shm_unlink(name.as_ptr())) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;

    #[test]
    fn unnamed_semaphore_counts() {
        let mut storage = MaybeUninit::<sem_t>::uninit();
        let sem = storage.as_mut_ptr();
        unsafe {
            sem_init(sem, false, 1).unwrap();
            assert_eq!(sem_getvalue(sem), Ok(1));
            assert_eq!(sem_trywait(sem), Ok(true));
            assert_eq!(sem_trywait(sem), Ok(false));
            assert_eq!(sem_timedwait(sem, Timespec::default()), Ok(false));
            sem_post(sem).unwrap();
            sem_wait(sem).unwrap();
            assert_eq!(sem_getvalue(sem), Ok(0));
            sem_destroy(sem).unwrap();
        }
    }

    #[test]
    fn named_semaphore_lifecycle() {
        let name = format!("/posixglue-sem-{}", std::process::id()).into_bytes();
        let sem = sem_open(&name, libc::O_CREAT | libc::O_EXCL, 0o600, 2).unwrap();
        unsafe {
            assert_eq!(sem_getvalue(sem), Ok(2));
            sem_close(sem).unwrap();
        }
        sem_unlink(&name).unwrap();
        assert_eq!(sem_unlink(&name), Err(Errno::ENOENT));
    }

    #[test]
    fn shared_memory_object() {
        let name = format!("/posixglue-shm-{}", std::process::id()).into_bytes();
        let fd = shm_open(&name, libc::O_CREAT | libc::O_EXCL | libc::O_RDWR, 0o600).unwrap();
        crate::io::ftruncate(fd, 4096).unwrap();
        assert_eq!(crate::fs::fstat(fd).unwrap().size, 4096);
        crate::io::close(fd).unwrap();
        shm_unlink(&name).unwrap();
        assert_eq!(shm_unlink(&name), Err(Errno::ENOENT));
    }

    #[test]
    fn sem_t_has_a_size() {
        assert!(sizeof_sem_t() >= 16);
    }
}
