use crate::{Export, List, Void};
use libc::{c_int, c_uint, pid_t};
use macros::export;
use posix::process;
use structures::{
    error::Errno,
    process::{WaitOptions, WaitStatus},
};

#[export]
fn getpid() -> pid_t {
    process::getpid()
}

#[export]
fn getppid() -> pid_t {
    process::getppid()
}

#[export]
fn system(command: Option<&[u8]>) -> Result<c_int, Errno> {
    process::system(command)
}

#[export]
unsafe fn fork() -> Result<pid_t, Errno> {
    unsafe { process::fork() }
}

#[export]
fn execv(path: &[u8], argv: List<&[u8]>) -> Result<(), Errno> {
    Err(process::execv(path, &argv.0))
}

#[export]
fn execve(path: &[u8], argv: List<&[u8]>, envp: List<&[u8]>) -> Result<(), Errno> {
    Err(process::execve(path, &argv.0, &envp.0))
}

#[export]
fn execvp(file: &[u8], argv: List<&[u8]>) -> Result<(), Errno> {
    Err(process::execvp(file, &argv.0))
}

/// `(pid . status)`, or `#f` when `WNOHANG` finds no child to report.
#[export]
fn waitpid(pid: pid_t, options: WaitOptions) -> Result<Option<(pid_t, WaitStatus)>, Errno> {
    process::waitpid(pid, options)
}

#[export]
fn wait() -> Result<(pid_t, WaitStatus), Errno> {
    process::wait()
}

#[export(name = "WIFEXITED")]
fn wifexited(status: WaitStatus) -> bool {
    status.exited()
}

#[export(name = "WEXITSTATUS")]
fn wexitstatus(status: WaitStatus) -> c_int {
    status.exit_status()
}

#[export(name = "WIFSIGNALED")]
fn wifsignaled(status: WaitStatus) -> bool {
    status.signaled()
}

#[export(name = "WTERMSIG")]
fn wtermsig(status: WaitStatus) -> c_int {
    status.term_sig()
}

#[export(name = "WIFSTOPPED")]
fn wifstopped(status: WaitStatus) -> bool {
    status.stopped()
}

#[export(name = "WSTOPSIG")]
fn wstopsig(status: WaitStatus) -> c_int {
    status.stop_sig()
}

#[export(name = "WCOREDUMP")]
fn wcoredump(status: WaitStatus) -> bool {
    status.core_dumped()
}

#[export]
fn raise(signum: c_int) -> Result<(), Errno> {
    process::raise(signum)
}

#[export]
fn kill(pid: pid_t, signum: c_int) -> Result<(), Errno> {
    process::kill(pid, signum)
}

#[export]
fn pause() -> Void {
    process::pause();
    Void
}

#[export]
fn alarm(seconds: c_uint) -> c_uint {
    process::alarm(seconds)
}

pub const EXPORTS: &[Export] = &[
    GETPID, GETPPID, SYSTEM, FORK, EXECV, EXECVE, EXECVP, WAITPID, WAIT, WIFEXITED, WEXITSTATUS,
    WIFSIGNALED, WTERMSIG, WIFSTOPPED, WSTOPSIG, WCOREDUMP, RAISE, KILL, PAUSE, ALARM,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    #[test]
    fn system_status_decodes() {
        let status = invoke("system", &mut [Value::Bytevector(b"exit 3".to_vec())]).unwrap();
        assert_eq!(invoke("WIFEXITED", &mut [status.clone()]), Ok(Value::Bool(true)));
        assert_eq!(invoke("WEXITSTATUS", &mut [status]), Ok(Value::Integer(3)));
        assert_eq!(invoke("WIFSIGNALED", &mut [Value::Integer(0)]), Ok(Value::Bool(false)));
    }

    #[test]
    fn core_dump_bit() {
        let dumped = Value::Integer(0x80 | libc::SIGSEGV as i128);
        assert_eq!(invoke("WIFSIGNALED", &mut [dumped.clone()]), Ok(Value::Bool(true)));
        assert_eq!(invoke("WTERMSIG", &mut [dumped.clone()]), Ok(Value::Integer(libc::SIGSEGV as i128)));
        assert_eq!(invoke("WCOREDUMP", &mut [dumped]), Ok(Value::Bool(true)));
        let plain = Value::Integer(libc::SIGSEGV as i128);
        assert_eq!(invoke("WCOREDUMP", &mut [plain]), Ok(Value::Bool(false)));
    }

    #[test]
    fn waitpid_without_children_is_echild() {
        let ret = invoke(
            "waitpid",
            &mut [Value::Integer(i32::MAX as i128), Value::Integer(libc::WNOHANG as i128)],
        );
        assert_eq!(ret, Ok(Value::Integer(-(libc::ECHILD as i128))));
    }

    #[test]
    fn exec_failure_is_encoded() {
        let ret = invoke(
            "execv",
            &mut [
                Value::Bytevector(b"/nonexistent/posixglue".to_vec()),
                Value::list([Value::Bytevector(b"x".to_vec())]),
            ],
        );
        assert_eq!(ret, Ok(Value::Integer(-(libc::ENOENT as i128))));
    }

    #[test]
    fn alarm_without_previous_alarm() {
        assert_eq!(invoke("alarm", &mut [Value::Integer(0)]), Ok(Value::Integer(0)));
    }
}
