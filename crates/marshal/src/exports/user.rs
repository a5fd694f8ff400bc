use crate::{Export, List};
use libc::{gid_t, uid_t};
use macros::export;
use posix::user;
use structures::{
    error::Errno,
    user::{Group, Passwd},
};

// -== Identities ==-

#[export]
fn getuid() -> uid_t {
    user::getuid()
}

#[export]
fn getgid() -> gid_t {
    user::getgid()
}

#[export]
fn geteuid() -> uid_t {
    user::geteuid()
}

#[export]
fn getegid() -> gid_t {
    user::getegid()
}

#[export]
fn getgroups() -> Result<List<gid_t>, Errno> {
    user::getgroups().map(List)
}

#[export]
fn setuid(uid: uid_t) -> Result<(), Errno> {
    user::setuid(uid)
}

#[export]
fn seteuid(uid: uid_t) -> Result<(), Errno> {
    user::seteuid(uid)
}

#[export]
fn setreuid(real: uid_t, effective: uid_t) -> Result<(), Errno> {
    user::setreuid(real, effective)
}

#[export]
fn setgid(gid: gid_t) -> Result<(), Errno> {
    user::setgid(gid)
}

#[export]
fn setegid(gid: gid_t) -> Result<(), Errno> {
    user::setegid(gid)
}

#[export]
fn setregid(real: gid_t, effective: gid_t) -> Result<(), Errno> {
    user::setregid(real, effective)
}

#[export]
fn getlogin() -> Option<Vec<u8>> {
    user::getlogin()
}

// -== Databases ==-

#[export]
fn getpwuid(uid: uid_t) -> Option<Passwd> {
    user::getpwuid(uid)
}

#[export]
fn getpwnam(name: &[u8]) -> Option<Passwd> {
    user::getpwnam(name)
}

#[export]
fn user_entries() -> List<Passwd> {
    List(user::user_entries())
}

#[export]
fn getgrgid(gid: gid_t) -> Option<Group> {
    user::getgrgid(gid)
}

#[export]
fn getgrnam(name: &[u8]) -> Option<Group> {
    user::getgrnam(name)
}

#[export]
fn group_entries() -> List<Group> {
    List(user::group_entries())
}

pub const EXPORTS: &[Export] = &[
    GETUID,
    GETGID,
    GETEUID,
    GETEGID,
    GETGROUPS,
    SETUID,
    SETEUID,
    SETREUID,
    SETGID,
    SETEGID,
    SETREGID,
    GETLOGIN,
    GETPWUID,
    GETPWNAM,
    USER_ENTRIES,
    GETGRGID,
    GETGRNAM,
    GROUP_ENTRIES,
];
