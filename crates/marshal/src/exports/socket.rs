use crate::{Export, ToHost, Value};
use libc::c_int;
use macros::export;
use posix::net::{
    self,
    sockopt::{self, OptKind},
};
use structures::{
    error::Errno,
    net::{Linger, ShutdownHow},
};

// -== Connections ==-

#[export]
fn socket(domain: c_int, ty: c_int, protocol: c_int) -> Result<c_int, Errno> {
    net::socket(domain, ty, protocol)
}

#[export]
fn socketpair(domain: c_int, ty: c_int, protocol: c_int) -> Result<(c_int, c_int), Errno> {
    net::socketpair(domain, ty, protocol)
}

#[export]
fn shutdown(fd: c_int, how: ShutdownHow) -> Result<(), Errno> {
    net::shutdown(fd, how)
}

#[export]
fn connect(fd: c_int, addr: &[u8]) -> Result<(), Errno> {
    net::connect(fd, addr)
}

#[export]
fn bind(fd: c_int, addr: &[u8]) -> Result<(), Errno> {
    net::bind(fd, addr)
}

#[export]
fn listen(fd: c_int, backlog: c_int) -> Result<(), Errno> {
    net::listen(fd, backlog)
}

/// `(fd . peer-address)`.
#[export]
fn accept(fd: c_int) -> Result<(c_int, Vec<u8>), Errno> {
    net::accept(fd)
}

#[export]
fn getpeername(fd: c_int) -> Result<Vec<u8>, Errno> {
    net::getpeername(fd)
}

#[export]
fn getsockname(fd: c_int) -> Result<Vec<u8>, Errno> {
    net::getsockname(fd)
}

// -== Transfers ==-

#[export]
fn send(fd: c_int, buf: &[u8], size: Option<usize>, flags: c_int) -> Result<usize, Errno> {
    net::send(fd, buf, size, flags)
}

#[export]
fn recv(fd: c_int, buf: &mut [u8], size: Option<usize>, flags: c_int) -> Result<usize, Errno> {
    net::recv(fd, buf, size, flags)
}

#[export]
fn sendto(
    fd: c_int,
    buf: &[u8],
    size: Option<usize>,
    flags: c_int,
    addr: &[u8],
) -> Result<usize, Errno> {
    net::sendto(fd, buf, size, flags, addr)
}

/// `(count . sender-address)`.
#[export]
fn recvfrom(
    fd: c_int,
    buf: &mut [u8],
    size: Option<usize>,
    flags: c_int,
) -> Result<(usize, Vec<u8>), Errno> {
    net::recvfrom(fd, buf, size, flags)
}

// -== Options ==-

/// Fills `optval` and returns the length the kernel reported.
#[export]
fn getsockopt(fd: c_int, level: c_int, name: c_int, optval: &mut [u8]) -> Result<usize, Errno> {
    sockopt::getsockopt(fd, level, name, optval)
}

#[export]
fn setsockopt(fd: c_int, level: c_int, name: c_int, optval: &[u8]) -> Result<(), Errno> {
    sockopt::setsockopt(fd, level, name, optval)
}

/// Reads an option value given as `#t`, `#f` or an integer.
fn flag_or_number<T: TryFrom<i128>>(value: &Value) -> Result<T, Errno> {
    let n = match *value {
        Value::Bool(true) => 1,
        Value::Bool(false) => 0,
        Value::Integer(n) => n,
        _ => return Err(Errno::EINVAL),
    };
    T::try_from(n).map_err(|_| Errno::EINVAL)
}

#[export]
fn getsockopt_int(fd: c_int, level: c_int, name: c_int) -> Result<(c_int, bool), Errno> {
    sockopt::get::<c_int>(fd, level, name).map(|v| (v, true))
}

#[export]
fn setsockopt_int(fd: c_int, level: c_int, name: c_int, value: &Value) -> Result<(), Errno> {
    sockopt::set::<c_int>(fd, level, name, flag_or_number(value)?)
}

#[export]
fn getsockopt_size_t(fd: c_int, level: c_int, name: c_int) -> Result<(usize, bool), Errno> {
    sockopt::get::<usize>(fd, level, name).map(|v| (v, true))
}

#[export]
fn setsockopt_size_t(fd: c_int, level: c_int, name: c_int, value: &Value) -> Result<(), Errno> {
    sockopt::set::<usize>(fd, level, name, flag_or_number(value)?)
}

/// `(on . seconds)`.
#[export]
fn getsockopt_linger(fd: c_int) -> Result<(bool, c_int), Errno> {
    let linger = sockopt::get::<Linger>(fd, libc::SOL_SOCKET, libc::SO_LINGER)?;
    Ok((linger.onoff, linger.secs))
}

#[export]
fn setsockopt_linger(fd: c_int, onoff: bool, secs: c_int) -> Result<(), Errno> {
    sockopt::set(fd, libc::SOL_SOCKET, libc::SO_LINGER, Linger { onoff, secs })
}

fn named(name: &[u8]) -> Result<&'static sockopt::SockOpt, Errno> {
    std::str::from_utf8(name)
        .ok()
        .and_then(sockopt::lookup)
        .ok_or(Errno::ENOPROTOOPT)
}

/// Reads an option by symbolic name, such as `SO_RCVBUF`. Linger options come back as `(on . seconds)`.
#[export]
fn getsockopt_named(fd: c_int, name: &[u8]) -> Result<Value, Errno> {
    let opt = named(name)?;
    Ok(match opt.kind {
        OptKind::Int => sockopt::get::<c_int>(fd, opt.level, opt.option)?.to_host(),
        OptKind::Size => sockopt::get::<usize>(fd, opt.level, opt.option)?.to_host(),
        OptKind::Linger => {
            let linger = sockopt::get::<Linger>(fd, opt.level, opt.option)?;
            (linger.onoff, linger.secs).to_host()
        }
    })
}

/// Sets an option by symbolic name. Linger options take an `(on . seconds)` pair.
#[export]
fn setsockopt_named(fd: c_int, name: &[u8], value: &Value) -> Result<(), Errno> {
    let opt = named(name)?;
    match opt.kind {
        OptKind::Int => sockopt::set::<c_int>(fd, opt.level, opt.option, flag_or_number(value)?),
        OptKind::Size => sockopt::set::<usize>(fd, opt.level, opt.option, flag_or_number(value)?),
        OptKind::Linger => {
            let Value::Pair(onoff, secs) = value else {
                return Err(Errno::EINVAL);
            };
            let linger = Linger {
                onoff: !onoff.is_false(),
                secs: flag_or_number(secs)?,
            };
            sockopt::set(fd, opt.level, opt.option, linger)
        }
    }
}

pub const EXPORTS: &[Export] = &[
    SOCKET,
    SOCKETPAIR,
    SHUTDOWN,
    CONNECT,
    BIND,
    LISTEN,
    ACCEPT,
    GETPEERNAME,
    GETSOCKNAME,
    SEND,
    RECV,
    SENDTO,
    RECVFROM,
    GETSOCKOPT,
    SETSOCKOPT,
    GETSOCKOPT_INT,
    SETSOCKOPT_INT,
    GETSOCKOPT_SIZE_T,
    SETSOCKOPT_SIZE_T,
    GETSOCKOPT_LINGER,
    SETSOCKOPT_LINGER,
    GETSOCKOPT_NAMED,
    SETSOCKOPT_NAMED,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    fn int(n: impl Into<i128>) -> Value {
        Value::Integer(n.into())
    }

    fn bytes(b: &[u8]) -> Value {
        Value::Bytevector(b.to_vec())
    }

    fn tcp_socket() -> Value {
        invoke("socket", &mut [int(libc::AF_INET), int(libc::SOCK_STREAM), int(0)]).unwrap()
    }

    #[test]
    fn socketpair_transfers() {
        let pair = invoke("socketpair", &mut [int(libc::AF_UNIX), int(libc::SOCK_STREAM), int(0)]);
        let (a, b) = match pair.unwrap() {
            Value::Pair(a, b) => (a, b),
            other => panic!("socketpair returned {other}"),
        };
        let sent = invoke("send", &mut [(*a).clone(), bytes(b"ping"), Value::Bool(false), int(0)]);
        assert_eq!(sent, Ok(int(4)));
        let mut args = [(*b).clone(), bytes(&[0; 4]), Value::Bool(false), int(0)];
        assert_eq!(invoke("recv", &mut args), Ok(int(4)));
        assert_eq!(args[1], bytes(b"ping"));
        for fd in [*a, *b] {
            invoke("close", &mut [fd]).unwrap();
        }
    }

    #[test]
    fn datagram_reports_sender() {
        let addr = invoke("make_sockaddr_in", &mut [bytes(&[127, 0, 0, 1]), int(0)]).unwrap();
        let udp = || invoke("socket", &mut [int(libc::AF_INET), int(libc::SOCK_DGRAM), int(0)]).unwrap();
        let (server, client) = (udp(), udp());
        invoke("bind", &mut [server.clone(), addr.clone()]).unwrap();
        invoke("bind", &mut [client.clone(), addr]).unwrap();
        let server_addr = invoke("getsockname", &mut [server.clone()]).unwrap();
        let client_addr = invoke("getsockname", &mut [client.clone()]).unwrap();

        let mut args = [client.clone(), bytes(b"hi"), Value::Bool(false), int(0), server_addr];
        assert_eq!(invoke("sendto", &mut args), Ok(int(2)));
        let mut args = [server.clone(), bytes(&[0; 8]), Value::Bool(false), int(0)];
        assert_eq!(invoke("recvfrom", &mut args), Ok(Value::cons(int(2), client_addr)));
        for fd in [server, client] {
            invoke("close", &mut [fd]).unwrap();
        }
    }

    #[test]
    fn typed_options() {
        let fd = tcp_socket();
        let level = int(libc::SOL_SOCKET);
        let name = int(libc::SO_REUSEADDR);
        let set = invoke("setsockopt_int", &mut [fd.clone(), level.clone(), name.clone(), Value::Bool(true)]);
        assert_eq!(set, Ok(int(0)));
        assert_eq!(
            invoke("getsockopt_int", &mut [fd.clone(), level, name]),
            Ok(Value::cons(int(1), Value::Bool(true)))
        );

        assert_eq!(invoke("setsockopt_linger", &mut [fd.clone(), Value::Bool(true), int(5)]), Ok(int(0)));
        assert_eq!(
            invoke("getsockopt_linger", &mut [fd.clone()]),
            Ok(Value::cons(Value::Bool(true), int(5)))
        );
        invoke("close", &mut [fd]).unwrap();
    }

    #[test]
    fn named_options() {
        let fd = tcp_socket();
        let set = invoke("setsockopt_named", &mut [fd.clone(), bytes(b"TCP_NODELAY"), int(1)]);
        assert_eq!(set, Ok(int(0)));
        assert_eq!(invoke("getsockopt_named", &mut [fd.clone(), bytes(b"TCP_NODELAY")]), Ok(int(1)));
        assert_eq!(
            invoke("getsockopt_named", &mut [fd.clone(), bytes(b"SO_TYPE")]),
            Ok(int(libc::SOCK_STREAM))
        );
        let linger = Value::cons(Value::Bool(false), int(0));
        assert_eq!(invoke("setsockopt_named", &mut [fd.clone(), bytes(b"SO_LINGER"), linger.clone()]), Ok(int(0)));
        assert_eq!(invoke("getsockopt_named", &mut [fd.clone(), bytes(b"SO_LINGER")]), Ok(linger));
        assert_eq!(
            invoke("getsockopt_named", &mut [fd.clone(), bytes(b"SO_NOPE")]),
            Ok(int(-(libc::ENOPROTOOPT as i128)))
        );
        invoke("close", &mut [fd]).unwrap();
    }
}
