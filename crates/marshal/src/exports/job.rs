use crate::Export;
use libc::{c_int, pid_t};
use macros::export;
use posix::job;
use structures::error::Errno;

#[export]
fn ctermid() -> Vec<u8> {
    job::ctermid()
}

#[export]
fn setsid() -> Result<pid_t, Errno> {
    job::setsid()
}

#[export]
fn getsid(pid: pid_t) -> Result<pid_t, Errno> {
    job::getsid(pid)
}

#[export]
fn getpgrp() -> pid_t {
    job::getpgrp()
}

#[export]
fn setpgid(pid: pid_t, pgid: pid_t) -> Result<(), Errno> {
    job::setpgid(pid, pgid)
}

#[export]
fn tcgetpgrp(fd: c_int) -> Result<pid_t, Errno> {
    job::tcgetpgrp(fd)
}

#[export]
fn tcsetpgrp(fd: c_int, pgrp: pid_t) -> Result<(), Errno> {
    job::tcsetpgrp(fd, pgrp)
}

#[export]
fn tcgetsid(fd: c_int) -> Result<pid_t, Errno> {
    job::tcgetsid(fd)
}

pub const EXPORTS: &[Export] = &[
    CTERMID, SETSID, GETSID, GETPGRP, SETPGID, TCGETPGRP, TCSETPGRP, TCGETSID,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    #[test]
    fn session_of_self() {
        let sid = invoke("getsid", &mut [Value::Integer(0)]).unwrap();
        assert!(matches!(sid, Value::Integer(n) if n > 0));
        assert_eq!(invoke("ctermid", &mut []), Ok(Value::Bytevector(b"/dev/tty".to_vec())));
    }

    #[test]
    fn terminal_calls_on_a_pipe() {
        let Value::Pair(r, w) = invoke("pipe", &mut []).unwrap() else {
            panic!("pipe failed");
        };
        let ret = invoke("tcgetpgrp", &mut [(*r).clone()]);
        assert_eq!(ret, Ok(Value::Integer(-(libc::ENOTTY as i128))));
        for fd in [*r, *w] {
            invoke("close", &mut [fd]).unwrap();
        }
    }
}
