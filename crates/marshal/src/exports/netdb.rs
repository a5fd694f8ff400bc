use crate::{Export, List};
use libc::c_int;
use macros::export;
use posix::net::netdb;
use structures::net::{
    AddrInfo, AddrInfoHints, AddressFamily, GaiError, HostEnt, HostErrno, NetEnt, ProtoEnt, ServEnt,
};

// -== Hosts ==-

#[export]
fn gethostbyname(name: &[u8]) -> Result<HostEnt, HostErrno> {
    netdb::gethostbyname(name)
}

#[export]
fn gethostbyname2(name: &[u8], af: AddressFamily) -> Result<HostEnt, HostErrno> {
    netdb::gethostbyname2(name, af)
}

#[export]
fn gethostbyaddr(addr: &[u8]) -> Result<HostEnt, HostErrno> {
    netdb::gethostbyaddr(addr)
}

#[export]
fn host_entries() -> List<HostEnt> {
    List(netdb::host_entries())
}

/// A list of addrinfo records, or the `EAI_*` code as returned by the resolver.
#[export]
fn getaddrinfo(
    node: Option<&[u8]>,
    service: Option<&[u8]>,
    hints: Option<AddrInfoHints>,
) -> Result<List<AddrInfo>, GaiError> {
    netdb::getaddrinfo(node, service, hints).map(List)
}

#[export]
fn gai_strerror(code: c_int) -> Vec<u8> {
    netdb::gai_strerror(code)
}

// -== Protocols ==-

#[export]
fn getprotobyname(name: &[u8]) -> Option<ProtoEnt> {
    netdb::getprotobyname(name)
}

#[export]
fn getprotobynumber(proto: c_int) -> Option<ProtoEnt> {
    netdb::getprotobynumber(proto)
}

#[export]
fn protocol_entries() -> List<ProtoEnt> {
    List(netdb::protocol_entries())
}

// -== Services ==-

#[export]
fn getservbyname(name: &[u8], proto: Option<&[u8]>) -> Option<ServEnt> {
    netdb::getservbyname(name, proto)
}

#[export]
fn getservbyport(port: u16, proto: Option<&[u8]>) -> Option<ServEnt> {
    netdb::getservbyport(port, proto)
}

#[export]
fn service_entries() -> List<ServEnt> {
    List(netdb::service_entries())
}

// -== Networks ==-

#[export]
fn getnetbyname(name: &[u8]) -> Option<NetEnt> {
    netdb::getnetbyname(name)
}

#[export]
fn getnetbyaddr(net: u32, ty: c_int) -> Option<NetEnt> {
    netdb::getnetbyaddr(net, ty)
}

#[export]
fn network_entries() -> List<NetEnt> {
    List(netdb::network_entries())
}

pub const EXPORTS: &[Export] = &[
    GETHOSTBYNAME,
    GETHOSTBYNAME2,
    GETHOSTBYADDR,
    HOST_ENTRIES,
    GETADDRINFO,
    GAI_STRERROR,
    GETPROTOBYNAME,
    GETPROTOBYNUMBER,
    PROTOCOL_ENTRIES,
    GETSERVBYNAME,
    GETSERVBYPORT,
    SERVICE_ENTRIES,
    GETNETBYNAME,
    GETNETBYADDR,
    NETWORK_ENTRIES,
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

    #[test]
    fn numeric_getaddrinfo() {
        let hints = Value::Struct(vec![
            int(libc::AI_NUMERICHOST),
            int(libc::AF_INET),
            int(libc::SOCK_STREAM),
            int(0),
        ]);
        let ret = invoke("getaddrinfo", &mut [bytes(b"127.0.0.1"), bytes(b"80"), hints]).unwrap();
        let items = ret.list_items().unwrap();
        assert_eq!(items.len(), 1);
        let Value::Struct(fields) = items[0] else {
            panic!("unexpected addrinfo {}", items[0]);
        };
        assert_eq!(fields[1], int(libc::AF_INET));
        assert_eq!(fields[2], int(libc::SOCK_STREAM));
        assert_eq!(fields[4], int(size_of::<libc::sockaddr_in>() as i128));
        let port = invoke("sockaddr_in_in_port", &mut [fields[5].clone()]);
        assert_eq!(port, Ok(int(80)));
    }

    #[test]
    fn resolver_errors_are_passed_through() {
        let ret = invoke("getaddrinfo", &mut [Value::Bool(false), Value::Bool(false), Value::Bool(false)]);
        assert_eq!(ret, Ok(int(libc::EAI_NONAME)));
        let text = invoke("gai_strerror", &mut [int(libc::EAI_NONAME)]).unwrap();
        assert!(matches!(text, Value::Bytevector(ref t) if !t.is_empty()));
    }

    #[test]
    fn odd_length_reverse_lookup() {
        let ret = invoke("gethostbyaddr", &mut [bytes(&[1, 2, 3])]);
        assert_eq!(ret, Ok(int(-3)));
    }

    #[test]
    fn missing_entries_are_false() {
        assert_eq!(invoke("getprotobynumber", &mut [int(-7)]), Ok(Value::Bool(false)));
        assert_eq!(
            invoke("getservbyname", &mut [bytes(b"no-such-service"), Value::Bool(false)]),
            Ok(Value::Bool(false))
        );
        assert_eq!(invoke("getnetbyname", &mut [bytes(b"no-such-network")]), Ok(Value::Bool(false)));
    }

    #[test]
    fn enumerations_are_lists() {
        for name in ["protocol_entries", "service_entries", "network_entries"] {
            let ret = invoke(name, &mut []).unwrap();
            assert!(ret.list_items().is_some(), "{name} returned {ret}");
        }
    }
}
