use crate::posix_num;
use libc::{c_int, fd_set, pollfd};
use structures::{ToNative, error::Errno, time::Timeval};

pub const FD_SETSIZE: c_int = libc::FD_SETSIZE as c_int;

/// Readiness bits reported by [`select_fd`].
pub const SELECT_READABLE: u8 = 1;
pub const SELECT_WRITABLE: u8 = 2;
pub const SELECT_EXCEPTIONAL: u8 = 4;

fn check_fd(fd: c_int) -> Result<(), Errno> {
    match (0..FD_SETSIZE).contains(&fd) {
        true => Ok(()),
        false => Err(Errno::EINVAL),
    }
}

fn empty_set() -> fd_set {
    unsafe {
        let mut set = std::mem::zeroed();
        libc::FD_ZERO(&mut set);
        set
    }
}

fn fill_set(fds: &[c_int]) -> Result<fd_set, Errno> {
    let mut set = empty_set();
    for &fd in fds {
        check_fd(fd)?;
        unsafe { libc::FD_SET(fd, &mut set) };
    }
    Ok(set)
}

fn ready_in(fds: &[c_int], set: &fd_set) -> Vec<c_int> {
    fds.iter()
        .copied()
        .filter(|&fd| unsafe { libc::FD_ISSET(fd, set) })
        .collect()
}

fn timeout_ptr(timeout: &mut Option<libc::timeval>) -> *mut libc::timeval {
    timeout
        .as_mut()
        .map_or(std::ptr::null_mut(), |x| x as *mut libc::timeval)
}

/// Descriptors found ready by [`select`], each list in the order it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: Vec<c_int>,
    pub writable: Vec<c_int>,
    pub exceptional: Vec<c_int>,
}

/// Waits on lists of descriptors. Returns [`None`] on timeout.
///
/// With no `nfds`, one more than the highest listed descriptor is used. A missing timeout blocks.
pub fn select(
    nfds: Option<c_int>,
    read: &[c_int],
    write: &[c_int],
    except: &[c_int],
    timeout: Option<Timeval>,
) -> Result<Option<Readiness>, Errno> {
    let mut rset = fill_set(read)?;
    let mut wset = fill_set(write)?;
    let mut eset = fill_set(except)?;
    let nfds = nfds.unwrap_or_else(|| {
        read.iter()
            .chain(write)
            .chain(except)
            .copied()
            .max()
            .map_or(0, |x| x + 1)
    });
    let mut timeout = timeout.map(Timeval::to_native).transpose()?;
    let count: c_int = unsafe {
        posix_num!(libc::select(
            nfds,
            &mut rset,
            &mut wset,
            &mut eset,
            timeout_ptr(&mut timeout)
        ))?
    };
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(Readiness {
        readable: ready_in(read, &rset),
        writable: ready_in(write, &wset),
        exceptional: ready_in(except, &eset),
    }))
}

/// Waits on a single descriptor. Returns [`None`] on timeout, otherwise a mask of `SELECT_*` bits.
pub fn select_fd(fd: c_int, timeout: Option<Timeval>) -> Result<Option<u8>, Errno> {
    let ready = select(None, &[fd], &[fd], &[fd], timeout)?;
    Ok(ready.map(|ready| {
        let mut mask = 0;
        if !ready.readable.is_empty() {
            mask |= SELECT_READABLE;
        }
        if !ready.writable.is_empty() {
            mask |= SELECT_WRITABLE;
        }
        if !ready.exceptional.is_empty() {
            mask |= SELECT_EXCEPTIONAL;
        }
        mask
    }))
}

/// Waits until `fd` is ready for one kind of event. Returns [`None`] on timeout.
pub fn select_is(fd: c_int, kind: u8, timeout: Option<Timeval>) -> Result<Option<bool>, Errno> {
    check_fd(fd)?;
    let fds = [fd];
    let pick = |bit: u8| match kind & bit {
        0 => &fds[..0],
        _ => &fds[..],
    };
    let ready = select(
        Some(fd + 1),
        pick(SELECT_READABLE),
        pick(SELECT_WRITABLE),
        pick(SELECT_EXCEPTIONAL),
        timeout,
    )?;
    Ok(ready.map(|ready| {
        !(ready.readable.is_empty() && ready.writable.is_empty() && ready.exceptional.is_empty())
    }))
}

/// Polls descriptors, updating each `revents` in place. Returns the number of ready entries.
pub fn poll(fds: &mut [pollfd], timeout: c_int) -> Result<usize, Errno> {
    unsafe { posix_num!(libc::poll(fds.as_mut_ptr(), fds.len() as _, timeout)) }
}

// -== fd_set Buffers ==-

/// Size in bytes of a single `fd_set`.
pub const FD_SET_BYTES: usize = size_of::<fd_set>();

/// Returns the size in bytes of `count` consecutive `fd_set`s, or `EINVAL` if that overflows.
pub fn sizeof_fd_set(count: usize) -> Result<usize, Errno> {
    count.checked_mul(FD_SET_BYTES).ok_or(Errno::EINVAL)
}

/// Byte range of the `idx`-th `fd_set` in a buffer of `len` bytes.
fn slot(len: usize, idx: usize) -> Result<std::ops::Range<usize>, Errno> {
    let start = sizeof_fd_set(idx)?;
    let end = start.checked_add(FD_SET_BYTES).ok_or(Errno::EINVAL)?;
    match end <= len {
        true => Ok(start..end),
        false => Err(Errno::EINVAL),
    }
}

/// Reads the `idx`-th `fd_set` out of a byte buffer, which need not be aligned.
fn load(buf: &[u8], idx: usize) -> Result<fd_set, Errno> {
    let range = slot(buf.len(), idx)?;
    Ok(unsafe { buf[range].as_ptr().cast::<fd_set>().read_unaligned() })
}

fn store(buf: &mut [u8], idx: usize, set: &fd_set) -> Result<(), Errno> {
    let range = slot(buf.len(), idx)?;
    unsafe {
        buf[range]
            .as_mut_ptr()
            .cast::<fd_set>()
            .write_unaligned(*set)
    };
    Ok(())
}

pub fn fd_zero(buf: &mut [u8], idx: usize) -> Result<(), Errno> {
    store(buf, idx, &empty_set())
}

pub fn fd_set(fd: c_int, buf: &mut [u8], idx: usize) -> Result<(), Errno> {
    check_fd(fd)?;
    let mut set = load(buf, idx)?;
    unsafe { libc::FD_SET(fd, &mut set) };
    store(buf, idx, &set)
}

pub fn fd_clr(fd: c_int, buf: &mut [u8], idx: usize) -> Result<(), Errno> {
    check_fd(fd)?;
    let mut set = load(buf, idx)?;
    unsafe { libc::FD_CLR(fd, &mut set) };
    store(buf, idx, &set)
}

pub fn fd_isset(fd: c_int, buf: &[u8], idx: usize) -> Result<bool, Errno> {
    check_fd(fd)?;
    let set = load(buf, idx)?;
    Ok(unsafe { libc::FD_ISSET(fd, &set) })
}

/// Runs `select` over caller-managed `fd_set` buffers, writing the results back into them.
///
/// Returns the number of ready descriptors; zero means the timeout expired. With no `nfds`, `FD_SETSIZE` is used.
pub fn select_from_sets(
    nfds: Option<c_int>,
    read: Option<&mut [u8]>,
    write: Option<&mut [u8]>,
    except: Option<&mut [u8]>,
    timeout: Option<Timeval>,
) -> Result<usize, Errno> {
    let mut sets = [read, write, except];
    let mut natives = [None, None, None];
    for (native, buf) in natives.iter_mut().zip(&sets) {
        if let Some(buf) = buf {
            *native = Some(load(buf, 0)?);
        }
    }
    let mut timeout = timeout.map(Timeval::to_native).transpose()?;
    let ptr = |x: &mut Option<fd_set>| x.as_mut().map_or(std::ptr::null_mut(), |x| x as *mut _);
    let [r, w, e] = &mut natives;
    let count: usize = unsafe {
        posix_num!(libc::select(
            nfds.unwrap_or(FD_SETSIZE),
            ptr(r),
            ptr(w),
            ptr(e),
            timeout_ptr(&mut timeout)
        ))?
    };
    for (native, buf) in natives.iter().zip(sets.iter_mut()) {
        if let (Some(native), Some(buf)) = (native, buf) {
            store(buf, 0, native)?;
        }
    }
    Ok(count)
}

/// Like [`select_from_sets`], with the read, write and exception sets at indexes 0, 1 and 2 of one buffer.
pub fn select_from_sets_array(
    nfds: Option<c_int>,
    sets: &mut [u8],
    timeout: Option<Timeval>,
) -> Result<usize, Errno> {
    slot(sets.len(), 2)?;
    let (read, rest) = sets.split_at_mut(FD_SET_BYTES);
    let (write, except) = rest.split_at_mut(FD_SET_BYTES);
    select_from_sets(nfds, Some(read), Some(write), Some(except), timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{close, pipe, write};

    const NOW: Option<Timeval> = Some(Timeval {
        tv_sec: 0,
        tv_usec: 0,
    });

    #[test]
    fn select_times_out_on_empty_pipe() {
        let (r, w) = pipe().unwrap();
        assert_eq!(select(None, &[r], &[], &[], NOW), Ok(None));
        assert_eq!(select_is(r, SELECT_READABLE, NOW), Ok(None));
        close(r).unwrap();
        close(w).unwrap();
    }

    #[test]
    fn select_keeps_input_order() {
        let (r1, w1) = pipe().unwrap();
        let (r2, w2) = pipe().unwrap();
        write(w1, b"a", None).unwrap();
        write(w2, b"b", None).unwrap();

        let ready = select(None, &[r2, r1], &[w1], &[], NOW).unwrap().unwrap();
        assert_eq!(ready.readable, vec![r2, r1]);
        assert_eq!(ready.writable, vec![w1]);
        assert!(ready.exceptional.is_empty());
        for fd in [r1, w1, r2, w2] {
            close(fd).unwrap();
        }
    }

    #[test]
    fn select_fd_mask() {
        let (r, w) = pipe().unwrap();
        assert_eq!(select_fd(w, NOW), Ok(Some(SELECT_WRITABLE)));
        write(w, b"x", None).unwrap();
        assert_eq!(select_fd(r, NOW), Ok(Some(SELECT_READABLE)));
        assert_eq!(select_is(r, SELECT_READABLE, NOW), Ok(Some(true)));
        close(r).unwrap();
        close(w).unwrap();
    }

    #[test]
    fn poll_updates_revents() {
        let (r, w) = pipe().unwrap();
        write(w, b"x", None).unwrap();
        let mut fds = [
            pollfd {
                fd: r,
                events: libc::POLLIN,
                revents: 0,
            },
            pollfd {
                fd: w,
                events: libc::POLLIN,
                revents: 0,
            },
        ];
        assert_eq!(poll(&mut fds, 0), Ok(1));
        assert_ne!(fds[0].revents & libc::POLLIN, 0);
        assert_eq!(fds[1].revents, 0);
        close(r).unwrap();
        close(w).unwrap();
    }

    #[test]
    fn fd_set_buffers() {
        let mut buf = vec![0u8; 2 * FD_SET_BYTES + 1];
        let unaligned = &mut buf[1..];
        fd_zero(unaligned, 1).unwrap();
        fd_set(5, unaligned, 1).unwrap();
        assert_eq!(fd_isset(5, unaligned, 1), Ok(true));
        assert_eq!(fd_isset(5, unaligned, 0), Ok(false));
        fd_clr(5, unaligned, 1).unwrap();
        assert_eq!(fd_isset(5, unaligned, 1), Ok(false));
        assert_eq!(fd_set(5, unaligned, 2), Err(Errno::EINVAL));
        assert_eq!(fd_set(FD_SETSIZE, unaligned, 0), Err(Errno::EINVAL));
    }

    #[test]
    fn huge_set_indexes_are_rejected() {
        let mut buf = vec![0u8; FD_SET_BYTES];
        fd_set(3, &mut buf, 0).unwrap();
        assert_eq!(fd_isset(3, &buf, 1 << 57), Err(Errno::EINVAL));
        assert_eq!(fd_isset(3, &buf, usize::MAX), Err(Errno::EINVAL));
        assert_eq!(sizeof_fd_set(usize::MAX), Err(Errno::EINVAL));
        assert_eq!(sizeof_fd_set(2), Ok(2 * FD_SET_BYTES));
    }

    #[test]
    fn select_from_sets_writes_back() {
        let (r, w) = pipe().unwrap();
        write(w, b"x", None).unwrap();
        let mut sets = vec![0u8; 3 * FD_SET_BYTES];
        fd_set(r, &mut sets, 0).unwrap();
        fd_set(w, &mut sets, 0).unwrap();

        assert_eq!(select_from_sets_array(None, &mut sets, NOW), Ok(1));
        assert_eq!(fd_isset(r, &sets, 0), Ok(true));
        assert_eq!(fd_isset(w, &sets, 0), Ok(false));
        close(r).unwrap();
        close(w).unwrap();
    }
}
