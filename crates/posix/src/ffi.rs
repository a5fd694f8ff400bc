//! Declarations of C library symbols the `libc` crate does not provide on every target.

use libc::{c_char, c_int, c_void, clock_t, clockid_t, pid_t, time_t, timeval, tm};
use structures::net::raw::{hostent, netent, protoent, servent};

#[repr(C)]
pub struct utimbuf {
    pub actime: time_t,
    pub modtime: time_t,
}

unsafe extern "C" {
    pub static mut environ: *const *const c_char;

    pub fn __h_errno_location() -> *mut c_int;
    pub fn gethostbyname(name: *const c_char) -> *mut hostent;
    pub fn gethostbyname2(name: *const c_char, af: c_int) -> *mut hostent;
    pub fn gethostbyaddr(addr: *const c_void, len: u32, ty: c_int) -> *mut hostent;
    pub fn sethostent(stayopen: c_int);
    pub fn gethostent() -> *mut hostent;
    pub fn endhostent();

    pub fn getprotobyname(name: *const c_char) -> *mut protoent;
    pub fn getprotobynumber(proto: c_int) -> *mut protoent;
    pub fn setprotoent(stayopen: c_int);
    pub fn getprotoent() -> *mut protoent;
    pub fn endprotoent();

    pub fn getservbyname(name: *const c_char, proto: *const c_char) -> *mut servent;
    pub fn getservbyport(port: c_int, proto: *const c_char) -> *mut servent;
    pub fn setservent(stayopen: c_int);
    pub fn getservent() -> *mut servent;
    pub fn endservent();

    pub fn getnetbyname(name: *const c_char) -> *mut netent;
    pub fn getnetbyaddr(net: u32, ty: c_int) -> *mut netent;
    pub fn setnetent(stayopen: c_int);
    pub fn getnetent() -> *mut netent;
    pub fn endnetent();

    pub fn inet_aton(cp: *const c_char, inp: *mut libc::in_addr) -> c_int;
    pub fn inet_ntoa(inp: libc::in_addr) -> *mut c_char;
    pub fn inet_pton(af: c_int, src: *const c_char, dst: *mut c_void) -> c_int;
    pub fn inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char, size: u32) -> *const c_char;

    pub fn utime(path: *const c_char, times: *const utimbuf) -> c_int;
    pub fn lutimes(path: *const c_char, times: *const timeval) -> c_int;
    pub fn futimes(fd: c_int, times: *const timeval) -> c_int;

    pub fn clock() -> clock_t;
    pub fn timegm(tm: *mut tm) -> time_t;
    pub fn clock_getcpuclockid(pid: pid_t, clock_id: *mut clockid_t) -> c_int;

    pub fn ctermid(s: *mut c_char) -> *mut c_char;
    pub fn tcgetsid(fd: c_int) -> pid_t;
    pub fn getlogin() -> *mut c_char;
    pub fn confstr(name: c_int, buf: *mut c_char, len: usize) -> usize;
}
