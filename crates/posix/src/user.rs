use crate::{ffi, posix_bi, posix_num, util::c_path};
use libc::{gid_t, uid_t};
use std::sync::{Mutex, MutexGuard, PoisonError};
use structures::{
    error::Errno,
    user::{Group, Passwd},
    util::c_opt_bytes,
};

// -== Identities ==-

pub fn getuid() -> uid_t {
    unsafe { libc::getuid() }
}

pub fn getgid() -> gid_t {
    unsafe { libc::getgid() }
}

pub fn geteuid() -> uid_t {
    unsafe { libc::geteuid() }
}

pub fn getegid() -> gid_t {
    unsafe { libc::getegid() }
}

/// Returns the supplementary group IDs of the calling process.
pub fn getgroups() -> Result<Vec<gid_t>, Errno> {
    let count: usize = unsafe { posix_num!(libc::getgroups(0, std::ptr::null_mut()))? };
    let mut gids = vec![0; count];
    let count: usize = unsafe { posix_num!(libc::getgroups(count as _, gids.as_mut_ptr()))? };
    gids.truncate(count);
    Ok(gids)
}

pub fn setuid(uid: uid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::setuid(uid)) }
}

pub fn seteuid(uid: uid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::seteuid(uid)) }
}

pub fn setreuid(real: uid_t, effective: uid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::setreuid(real, effective)) }
}

pub fn setgid(gid: gid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::setgid(gid)) }
}

pub fn setegid(gid: gid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::setegid(gid)) }
}

pub fn setregid(real: gid_t, effective: gid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::setregid(real, effective)) }
}

/// Returns the name of the user logged in on the controlling terminal, if there is one.
pub fn getlogin() -> Option<Vec<u8>> {
    unsafe { c_opt_bytes(ffi::getlogin()) }
}

// -== Databases ==-

static USERDB_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    USERDB_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn getpwuid(uid: uid_t) -> Option<Passwd> {
    let _guard = lock();
    unsafe { libc::getpwuid(uid).as_ref().map(|x| Passwd::from_raw(x)) }
}

pub fn getpwnam(name: &[u8]) -> Option<Passwd> {
    let name = c_path(name).ok()?;
    let _guard = lock();
    unsafe { libc::getpwnam(name.as_ptr()).as_ref().map(|x| Passwd::from_raw(x)) }
}

pub fn user_entries() -> Vec<Passwd> {
    let _guard = lock();
    let mut out = Vec::new();
    unsafe {
        libc::setpwent();
        while let Some(ent) = libc::getpwent().as_ref() {
            out.push(Passwd::from_raw(ent));
        }
        libc::endpwent();
    }
    out
}

pub fn getgrgid(gid: gid_t) -> Option<Group> {
    let _guard = lock();
    unsafe { libc::getgrgid(gid).as_ref().map(|x| Group::from_raw(x)) }
}

pub fn getgrnam(name: &[u8]) -> Option<Group> {
    let name = c_path(name).ok()?;
    let _guard = lock();
    unsafe { libc::getgrnam(name.as_ptr()).as_ref().map(|x| Group::from_raw(x)) }
}

pub fn group_entries() -> Vec<Group> {
    let _guard = lock();
    let mut out = Vec::new();
    unsafe {
        libc::setgrent();
        while let Some(ent) = libc::getgrent().as_ref() {
            out.push(Group::from_raw(ent));
        }
        libc::endgrent();
    }
    out
}
