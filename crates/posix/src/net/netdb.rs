//! Lookups in the host, protocol, service and network databases.
//!
//! The C interfaces behind these return pointers into static storage and keep a cursor for enumeration, so every
//! call here holds [`NETDB_LOCK`] for as long as it touches that storage.

use crate::{ffi, util::c_path};
use libc::c_int;
use std::{
    ffi::CString,
    sync::{Mutex, MutexGuard, PoisonError},
};
use structures::{
    net::{
        AddrInfo, AddrInfoHints, AddressFamily, GaiError, HostEnt, HostErrno, NetEnt, ProtoEnt,
        ServEnt,
    },
    util::c_bytes,
};

static NETDB_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    NETDB_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

fn h_errno() -> HostErrno {
    HostErrno(unsafe { *ffi::__h_errno_location() })
}

/// Collects every entry of a database through its `set*ent`/`get*ent`/`end*ent` triple.
unsafe fn entries<R, T>(
    set: unsafe extern "C" fn(c_int),
    get: unsafe extern "C" fn() -> *mut R,
    end: unsafe extern "C" fn(),
    convert: unsafe fn(&R) -> T,
) -> Vec<T> {
    let _guard = lock();
    let mut out = Vec::new();
    unsafe {
        set(1);
        loop {
            let ent = get();
            if ent.is_null() {
                break;
            }
            out.push(convert(&*ent));
        }
        end();
    }
    out
}

// -== Hosts ==-

unsafe fn host_result(ent: *mut structures::net::raw::hostent) -> Result<HostEnt, HostErrno> {
    match ent.is_null() {
        true => Err(h_errno()),
        false => Ok(unsafe { HostEnt::from_raw(&*ent) }),
    }
}

pub fn gethostbyname(name: &[u8]) -> Result<HostEnt, HostErrno> {
    let name = c_path(name).map_err(|_| HostErrno::HOST_NOT_FOUND)?;
    let _guard = lock();
    unsafe { host_result(ffi::gethostbyname(name.as_ptr())) }
}

pub fn gethostbyname2(name: &[u8], af: AddressFamily) -> Result<HostEnt, HostErrno> {
    let name = c_path(name).map_err(|_| HostErrno::HOST_NOT_FOUND)?;
    let _guard = lock();
    unsafe { host_result(ffi::gethostbyname2(name.as_ptr(), af.0)) }
}

/// Reverse lookup. The family follows from the address length, and any length other than 4 or 16 fails with
/// [`HostErrno::NO_RECOVERY`].
pub fn gethostbyaddr(addr: &[u8]) -> Result<HostEnt, HostErrno> {
    let family = match addr.len() {
        4 => AddressFamily::AF_INET,
        16 => AddressFamily::AF_INET6,
        _ => return Err(HostErrno::NO_RECOVERY),
    };
    let _guard = lock();
    unsafe {
        host_result(ffi::gethostbyaddr(
            addr.as_ptr().cast(),
            addr.len() as u32,
            family.0,
        ))
    }
}

pub fn host_entries() -> Vec<HostEnt> {
    unsafe {
        entries(
            ffi::sethostent,
            ffi::gethostent,
            ffi::endhostent,
            HostEnt::from_raw,
        )
    }
}

// -== Address information ==-

pub fn getaddrinfo(
    node: Option<&[u8]>,
    service: Option<&[u8]>,
    hints: Option<AddrInfoHints>,
) -> Result<Vec<AddrInfo>, GaiError> {
    let cstr = |x: Option<&[u8]>| -> Result<Option<CString>, GaiError> {
        x.map(c_path)
            .transpose()
            .map_err(|_| GaiError(libc::EAI_NONAME))
    };
    let node = cstr(node)?;
    let service = cstr(service)?;
    let hints = hints.map(AddrInfoHints::to_native);

    let mut list: *mut libc::addrinfo = std::ptr::null_mut();
    let status = unsafe {
        libc::getaddrinfo(
            node.as_ref().map_or(std::ptr::null(), |x| x.as_ptr()),
            service.as_ref().map_or(std::ptr::null(), |x| x.as_ptr()),
            hints.as_ref().map_or(std::ptr::null(), |x| x as *const _),
            &mut list,
        )
    };
    if status != 0 {
        return Err(GaiError(status));
    }

    let mut out = Vec::new();
    let mut cursor = list;
    unsafe {
        while !cursor.is_null() {
            out.push(AddrInfo::from_raw(&*cursor));
            cursor = (*cursor).ai_next;
        }
        libc::freeaddrinfo(list);
    }
    Ok(out)
}

pub fn gai_strerror(code: c_int) -> Vec<u8> {
    unsafe { c_bytes(libc::gai_strerror(code)) }
}

// -== Protocols, services and networks ==-

pub fn getprotobyname(name: &[u8]) -> Option<ProtoEnt> {
    let name = c_path(name).ok()?;
    let _guard = lock();
    unsafe { ffi::getprotobyname(name.as_ptr()).as_ref().map(|x| ProtoEnt::from_raw(x)) }
}

pub fn getprotobynumber(proto: c_int) -> Option<ProtoEnt> {
    let _guard = lock();
    unsafe { ffi::getprotobynumber(proto).as_ref().map(|x| ProtoEnt::from_raw(x)) }
}

pub fn protocol_entries() -> Vec<ProtoEnt> {
    unsafe {
        entries(
            ffi::setprotoent,
            ffi::getprotoent,
            ffi::endprotoent,
            ProtoEnt::from_raw,
        )
    }
}

pub fn getservbyname(name: &[u8], proto: Option<&[u8]>) -> Option<ServEnt> {
    let name = c_path(name).ok()?;
    let proto = proto.map(c_path).transpose().ok()?;
    let _guard = lock();
    unsafe {
        ffi::getservbyname(
            name.as_ptr(),
            proto.as_ref().map_or(std::ptr::null(), |x| x.as_ptr()),
        )
        .as_ref()
        .map(|x| ServEnt::from_raw(x))
    }
}

/// Looks up a service by its port, given in host byte order.
pub fn getservbyport(port: u16, proto: Option<&[u8]>) -> Option<ServEnt> {
    let proto = proto.map(c_path).transpose().ok()?;
    let _guard = lock();
    unsafe {
        ffi::getservbyport(
            port.to_be() as c_int,
            proto.as_ref().map_or(std::ptr::null(), |x| x.as_ptr()),
        )
        .as_ref()
        .map(|x| ServEnt::from_raw(x))
    }
}

pub fn service_entries() -> Vec<ServEnt> {
    unsafe {
        entries(
            ffi::setservent,
            ffi::getservent,
            ffi::endservent,
            ServEnt::from_raw,
        )
    }
}

pub fn getnetbyname(name: &[u8]) -> Option<NetEnt> {
    let name = c_path(name).ok()?;
    let _guard = lock();
    unsafe { ffi::getnetbyname(name.as_ptr()).as_ref().map(|x| NetEnt::from_raw(x)) }
}

pub fn getnetbyaddr(net: u32, ty: c_int) -> Option<NetEnt> {
    let _guard = lock();
    unsafe { ffi::getnetbyaddr(net, ty).as_ref().map(|x| NetEnt::from_raw(x)) }
}

pub fn network_entries() -> Vec<NetEnt> {
    unsafe {
        entries(
            ffi::setnetent,
            ffi::getnetent,
            ffi::endnetent,
            NetEnt::from_raw,
        )
    }
}
