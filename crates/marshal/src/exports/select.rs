use super::timeval;
use crate::{Export, FromHost, FromHostMut, List, ToHost, Value, Void};
use libc::{c_int, c_void, pollfd};
use macros::export;
use posix::io;
use structures::error::Errno;

// -== Descriptor lists ==-

/// `0` on timeout, otherwise `#(readable writable exceptional)`, each in the order given.
#[export]
fn select(
    nfds: Option<c_int>,
    read: List<c_int>,
    write: List<c_int>,
    except: List<c_int>,
    sec: Option<i64>,
    usec: i64,
) -> Result<Value, Errno> {
    let ready = io::select(nfds, &read.0, &write.0, &except.0, timeval(sec, usec))?;
    Ok(match ready {
        None => Value::Integer(0),
        Some(ready) => Value::Vector(vec![
            List(ready.readable).to_host(),
            List(ready.writable).to_host(),
            List(ready.exceptional).to_host(),
        ]),
    })
}

/// `0` on timeout, otherwise a mask: 1 readable, 2 writable, 4 exceptional.
#[export]
fn select_fd(fd: c_int, sec: Option<i64>, usec: i64) -> Result<u8, Errno> {
    io::select_fd(fd, timeval(sec, usec)).map(Option::unwrap_or_default)
}

#[export]
fn select_is_readable(fd: c_int, sec: Option<i64>, usec: i64) -> Result<bool, Errno> {
    io::select_is(fd, io::SELECT_READABLE, timeval(sec, usec)).map(Option::unwrap_or_default)
}

#[export]
fn select_is_writable(fd: c_int, sec: Option<i64>, usec: i64) -> Result<bool, Errno> {
    io::select_is(fd, io::SELECT_WRITABLE, timeval(sec, usec)).map(Option::unwrap_or_default)
}

#[export]
fn select_is_exceptional(fd: c_int, sec: Option<i64>, usec: i64) -> Result<bool, Errno> {
    io::select_is(fd, io::SELECT_EXCEPTIONAL, timeval(sec, usec)).map(Option::unwrap_or_default)
}

/// Polls a vector of `[fd events revents]` records, storing each `revents` back into its record.
#[export]
fn poll(fds: &mut Value, timeout: c_int) -> Result<usize, Errno> {
    let Value::Vector(entries) = fds else {
        return Err(Errno::EINVAL);
    };
    let mut natives = entries
        .iter()
        .map(pollfd::from_host)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| Errno::EINVAL)?;
    let count = io::poll(&mut natives, timeout)?;
    for (entry, native) in entries.iter_mut().zip(&natives) {
        if let Value::Struct(fields) = entry {
            fields[2] = native.revents.to_host();
        }
    }
    Ok(count)
}

// -== fd_set buffers ==-

#[export]
fn sizeof_fd_set(count: usize) -> Result<usize, Errno> {
    io::sizeof_fd_set(count)
}

#[export]
fn make_fd_set_bytevector(count: usize) -> Result<Vec<u8>, Errno> {
    Ok(vec![0; io::sizeof_fd_set(count)?])
}

fn alloc_fd_sets(count: usize) -> Result<*mut c_void, Errno> {
    io::sizeof_fd_set(count)?;
    let ptr = unsafe { libc::calloc(count.max(1), io::FD_SET_BYTES) };
    match ptr.is_null() {
        true => Err(Errno::ENOMEM),
        false => Ok(ptr),
    }
}

/// Allocates zeroed foreign memory for `count` sets, released with `free_fd_set_pointer`.
#[export]
fn make_fd_set_pointer(count: usize) -> Result<*mut c_void, Errno> {
    alloc_fd_sets(count)
}

/// Like `make_fd_set_pointer`, but the block carries its size.
#[export]
fn make_fd_set_memory_block(count: usize) -> Result<Value, Errno> {
    let addr = alloc_fd_sets(count)? as usize;
    Ok(Value::MemoryBlock {
        addr,
        size: io::sizeof_fd_set(count.max(1))?,
    })
}

#[export]
unsafe fn free_fd_set_pointer(ptr: *mut c_void) -> Void {
    unsafe { libc::free(ptr) };
    Void
}

/// Views a set buffer. A bare pointer carries no size, so it is taken to hold exactly the sets up to `idx`.
fn set_buffer(value: &mut Value, idx: usize) -> Result<&mut [u8], Errno> {
    match *value {
        Value::Pointer(0) => Err(Errno::EFAULT),
        Value::Pointer(addr) => {
            let len = idx
                .checked_add(1)
                .ok_or(Errno::EINVAL)
                .and_then(io::sizeof_fd_set)?;
            Ok(unsafe { std::slice::from_raw_parts_mut(addr as *mut u8, len) })
        }
        ref mut other => <&mut [u8]>::from_host_mut(other).map_err(|_| Errno::EINVAL),
    }
}

#[export]
fn fd_zero(set: &mut Value, idx: usize) -> Result<(), Errno> {
    io::fd_zero(set_buffer(set, idx)?, idx)
}

#[export]
fn fd_set(fd: c_int, set: &mut Value, idx: usize) -> Result<(), Errno> {
    io::fd_set(fd, set_buffer(set, idx)?, idx)
}

#[export]
fn fd_clr(fd: c_int, set: &mut Value, idx: usize) -> Result<(), Errno> {
    io::fd_clr(fd, set_buffer(set, idx)?, idx)
}

#[export]
fn fd_isset(fd: c_int, set: &mut Value, idx: usize) -> Result<bool, Errno> {
    io::fd_isset(fd, set_buffer(set, idx)?, idx)
}

fn optional_set(value: &mut Value) -> Result<Option<&mut [u8]>, Errno> {
    match value.is_false() {
        true => Ok(None),
        false => set_buffer(value, 0).map(Some),
    }
}

fn sets_outcome(count: usize) -> Value {
    match count {
        0 => Value::Integer(0),
        _ => Value::Bool(false),
    }
}

/// `0` on timeout, `#f` when descriptors are ready; the sets then hold the ready descriptors.
#[export]
fn select_from_sets(
    nfds: Option<c_int>,
    read: &mut Value,
    write: &mut Value,
    except: &mut Value,
    sec: Option<i64>,
    usec: i64,
) -> Result<Value, Errno> {
    let read = optional_set(read)?;
    let write = optional_set(write)?;
    let except = optional_set(except)?;
    io::select_from_sets(nfds, read, write, except, timeval(sec, usec)).map(sets_outcome)
}

/// Like `select_from_sets`, with the three sets at indexes 0, 1 and 2 of one buffer.
#[export]
fn select_from_sets_array(
    nfds: Option<c_int>,
    sets: &mut Value,
    sec: Option<i64>,
    usec: i64,
) -> Result<Value, Errno> {
    io::select_from_sets_array(nfds, set_buffer(sets, 2)?, timeval(sec, usec)).map(sets_outcome)
}

pub const EXPORTS: &[Export] = &[
    SELECT,
    SELECT_FD,
    SELECT_IS_READABLE,
    SELECT_IS_WRITABLE,
    SELECT_IS_EXCEPTIONAL,
    POLL,
    SIZEOF_FD_SET,
    MAKE_FD_SET_BYTEVECTOR,
    MAKE_FD_SET_POINTER,
    MAKE_FD_SET_MEMORY_BLOCK,
    FREE_FD_SET_POINTER,
    FD_ZERO,
    FD_SET,
    FD_CLR,
    FD_ISSET,
    SELECT_FROM_SETS,
    SELECT_FROM_SETS_ARRAY,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    fn int(n: impl Into<i128>) -> Value {
        Value::Integer(n.into())
    }

    fn pipe_with_data() -> (Value, Value) {
        let Value::Pair(r, w) = invoke("pipe", &mut []).unwrap() else {
            panic!("pipe failed");
        };
        invoke("write", &mut [(*w).clone(), Value::Bytevector(b"x".to_vec()), Value::Bool(false)])
            .unwrap();
        (*r, *w)
    }

    fn close(fds: [Value; 2]) {
        for fd in fds {
            invoke("close", &mut [fd]).unwrap();
        }
    }

    #[test]
    fn select_reports_vector_of_lists() {
        let (r, w) = pipe_with_data();
        let ret = invoke(
            "select",
            &mut [
                Value::Bool(false),
                Value::list([r.clone()]),
                Value::list([w.clone()]),
                Value::Null,
                int(0),
                int(0),
            ],
        );
        assert_eq!(
            ret,
            Ok(Value::Vector(vec![
                Value::list([r.clone()]),
                Value::list([w.clone()]),
                Value::Null,
            ]))
        );
        let mask = invoke("select_fd", &mut [r.clone(), int(0), int(0)]);
        assert_eq!(mask, Ok(int(1)));
        close([r, w]);
    }

    #[test]
    fn select_is_false_on_timeout() {
        let Value::Pair(r, w) = invoke("pipe", &mut []).unwrap() else {
            panic!("pipe failed");
        };
        let ret = invoke("select_is_readable", &mut [(*r).clone(), int(0), int(1000)]);
        assert_eq!(ret, Ok(Value::Bool(false)));
        assert_eq!(invoke("select_fd", &mut [(*r).clone(), int(0), int(0)]), Ok(int(0)));
        close([*r, *w]);
    }

    #[test]
    fn poll_updates_revents_in_place() {
        let (r, w) = pipe_with_data();
        let entry = |fd: &Value| Value::Struct(vec![fd.clone(), int(libc::POLLIN), int(0)]);
        let mut args = [Value::Vector(vec![entry(&r), entry(&w)]), int(0)];
        assert_eq!(invoke("poll", &mut args), Ok(int(1)));
        let Value::Vector(entries) = &args[0] else {
            panic!("poll replaced its argument");
        };
        assert_eq!(entries[0], Value::Struct(vec![r.clone(), int(libc::POLLIN), int(libc::POLLIN)]));
        assert_eq!(entries[1], entry(&w));
        close([r, w]);
    }

    #[test]
    fn fd_set_buffers() {
        let (r, w) = pipe_with_data();
        let set = invoke("make_fd_set_bytevector", &mut [int(3)]).unwrap();
        let mut args = [r.clone(), set, int(1)];
        assert_eq!(invoke("fd_set", &mut args), Ok(int(0)));
        assert_eq!(invoke("fd_isset", &mut args), Ok(Value::Bool(true)));
        args[2] = int(0);
        assert_eq!(invoke("fd_isset", &mut args), Ok(Value::Bool(false)));
        args[2] = int(3);
        assert_eq!(invoke("fd_isset", &mut args), Ok(int(-(libc::EINVAL as i128))));

        let sets = invoke("make_fd_set_memory_block", &mut [int(3)]).unwrap();
        let add = |fd: &Value, idx: i32| {
            let mut args = [fd.clone(), sets.clone(), int(idx)];
            invoke("fd_set", &mut args).unwrap();
        };
        add(&r, 0);
        add(&w, 1);
        let mut args = [Value::Bool(false), sets.clone(), int(0), int(0)];
        assert_eq!(invoke("select_from_sets_array", &mut args), Ok(Value::Bool(false)));
        let mut check = [r.clone(), sets.clone(), int(0)];
        assert_eq!(invoke("fd_isset", &mut check), Ok(Value::Bool(true)));
        assert_eq!(invoke("free_fd_set_pointer", &mut [sets]), Ok(Value::Void));
        close([r, w]);
    }

    #[test]
    fn sizeof_fd_set_scales() {
        let one = invoke("sizeof_fd_set", &mut [int(1)]).unwrap();
        assert_eq!(one, int(libc::FD_SETSIZE as i128 / 8));
        assert_eq!(invoke("sizeof_fd_set", &mut [int(2)]), Ok(int(libc::FD_SETSIZE as i128 / 4)));
        let einval = Ok(int(-(libc::EINVAL as i128)));
        assert_eq!(invoke("sizeof_fd_set", &mut [int(usize::MAX as i128)]), einval);
        assert_eq!(invoke("make_fd_set_bytevector", &mut [int(usize::MAX as i128)]), einval);
    }

    #[test]
    fn out_of_range_set_index() {
        let set = invoke("make_fd_set_bytevector", &mut [int(1)]).unwrap();
        let mut args = [int(3), set, int(0)];
        invoke("fd_set", &mut args).unwrap();
        args[2] = int(1i128 << 57);
        assert_eq!(invoke("fd_isset", &mut args), Ok(int(-(libc::EINVAL as i128))));

        let block = invoke("make_fd_set_pointer", &mut [int(1)]).unwrap();
        let mut args = [int(3), block.clone(), int(usize::MAX as i128)];
        assert_eq!(invoke("fd_isset", &mut args), Ok(int(-(libc::EINVAL as i128))));
        invoke("free_fd_set_pointer", &mut [block]).unwrap();
    }
}
