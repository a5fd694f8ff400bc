use crate::{
    error::Errno,
    unixvariants,
    util::{c_bytes, c_opt_bytes, c_record_list, c_str_list, read_struct, struct_bytes},
};
use libc::c_int;

unixvariants! {
    pub struct AddressFamily: c_int {
        const AF_UNSPEC;
        const AF_UNIX;
        const AF_INET;
        const AF_INET6;
    }
}
impl AddressFamily {
    /// Returns the length of a binary address in this family, if it has a fixed one.
    pub fn addr_len(self) -> Option<usize> {
        match self {
            Self::AF_INET => Some(4),
            Self::AF_INET6 => Some(16),
            _ => None,
        }
    }
}

unixvariants! {
    pub struct ShutdownHow: c_int {
        const SHUT_RD;
        const SHUT_WR;
        const SHUT_RDWR;
    }
}

/// A resolver error as reported through `h_errno`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct HostErrno(pub c_int);
impl HostErrno {
    pub const HOST_NOT_FOUND: Self = Self(1);
    pub const TRY_AGAIN: Self = Self(2);
    pub const NO_RECOVERY: Self = Self(3);
    pub const NO_DATA: Self = Self(4);

    /// Returns the value the host boundary reports for this error, which is always strictly negative.
    pub const fn encoded(self) -> i64 {
        -(self.0 as i64)
    }
}

/// An `EAI_*` code from `getaddrinfo`. These are already negative on glibc and are reported unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct GaiError(pub c_int);
impl GaiError {
    pub const fn encoded(self) -> i64 {
        self.0 as i64
    }
}

/// C layouts of the network database records, which the `libc` crate does not expose uniformly.
#[allow(non_camel_case_types)]
pub mod raw {
    use libc::{c_char, c_int};

    #[repr(C)]
    pub struct hostent {
        pub h_name: *mut c_char,
        pub h_aliases: *mut *mut c_char,
        pub h_addrtype: c_int,
        pub h_length: c_int,
        pub h_addr_list: *mut *mut c_char,
    }

    #[repr(C)]
    pub struct protoent {
        pub p_name: *mut c_char,
        pub p_aliases: *mut *mut c_char,
        pub p_proto: c_int,
    }

    #[repr(C)]
    pub struct servent {
        pub s_name: *mut c_char,
        pub s_aliases: *mut *mut c_char,
        pub s_port: c_int,
        pub s_proto: *mut c_char,
    }

    #[repr(C)]
    pub struct netent {
        pub n_name: *mut c_char,
        pub n_aliases: *mut *mut c_char,
        pub n_addrtype: c_int,
        pub n_net: u32,
    }
}

/// A host database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnt {
    pub name: Vec<u8>,
    pub aliases: Vec<Vec<u8>>,
    pub addrtype: c_int,
    pub length: c_int,
    pub addrs: Vec<Vec<u8>>,
}
impl HostEnt {
    /// Converts an entry returned by the host database.
    ///
    /// # Safety
    /// `ent` must be a valid entry as returned by the C library.
    pub unsafe fn from_raw(ent: &raw::hostent) -> Self {
        unsafe {
            Self {
                name: c_bytes(ent.h_name),
                aliases: c_str_list(ent.h_aliases),
                addrtype: ent.h_addrtype,
                length: ent.h_length,
                addrs: c_record_list(ent.h_addr_list, ent.h_length.max(0) as usize),
            }
        }
    }

    /// Returns the first address, as the traditional `h_addr` macro does.
    pub fn first_addr(&self) -> Option<&[u8]> {
        self.addrs.first().map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoEnt {
    pub name: Vec<u8>,
    pub aliases: Vec<Vec<u8>>,
    pub proto: c_int,
}
impl ProtoEnt {
    /// # Safety
    /// `ent` must be a valid entry as returned by the C library.
    pub unsafe fn from_raw(ent: &raw::protoent) -> Self {
        unsafe {
            Self {
                name: c_bytes(ent.p_name),
                aliases: c_str_list(ent.p_aliases),
                proto: ent.p_proto,
            }
        }
    }
}

/// A service database entry. `port` is in host byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServEnt {
    pub name: Vec<u8>,
    pub aliases: Vec<Vec<u8>>,
    pub port: u16,
    pub proto: Vec<u8>,
}
impl ServEnt {
    /// # Safety
    /// `ent` must be a valid entry as returned by the C library.
    pub unsafe fn from_raw(ent: &raw::servent) -> Self {
        unsafe {
            Self {
                name: c_bytes(ent.s_name),
                aliases: c_str_list(ent.s_aliases),
                port: u16::from_be(ent.s_port as u16),
                proto: c_bytes(ent.s_proto),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetEnt {
    pub name: Vec<u8>,
    pub aliases: Vec<Vec<u8>>,
    pub addrtype: c_int,
    pub net: u32,
}
impl NetEnt {
    /// # Safety
    /// `ent` must be a valid entry as returned by the C library.
    pub unsafe fn from_raw(ent: &raw::netent) -> Self {
        unsafe {
            Self {
                name: c_bytes(ent.n_name),
                aliases: c_str_list(ent.n_aliases),
                addrtype: ent.n_addrtype,
                net: ent.n_net,
            }
        }
    }
}

/// One result of `getaddrinfo`. `addrlen` is the length of `addr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrInfo {
    pub flags: c_int,
    pub family: c_int,
    pub socktype: c_int,
    pub protocol: c_int,
    pub addr: Vec<u8>,
    pub canonname: Option<Vec<u8>>,
}
impl AddrInfo {
    /// # Safety
    /// `ai` must be a valid node of a list returned by `getaddrinfo`.
    pub unsafe fn from_raw(ai: &libc::addrinfo) -> Self {
        unsafe {
            let addr = match ai.ai_addr.is_null() {
                true => Vec::new(),
                false => {
                    std::slice::from_raw_parts(ai.ai_addr.cast::<u8>(), ai.ai_addrlen as usize)
                        .to_vec()
                }
            };
            Self {
                flags: ai.ai_flags,
                family: ai.ai_family,
                socktype: ai.ai_socktype,
                protocol: ai.ai_protocol,
                addr,
                canonname: c_opt_bytes(ai.ai_canonname),
            }
        }
    }
}

/// The fields of a `getaddrinfo` hint the host may set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddrInfoHints {
    pub flags: c_int,
    pub family: c_int,
    pub socktype: c_int,
    pub protocol: c_int,
}
impl AddrInfoHints {
    pub fn to_native(self) -> libc::addrinfo {
        let mut native: libc::addrinfo = unsafe { std::mem::zeroed() };
        native.ai_flags = self.flags;
        native.ai_family = self.family;
        native.ai_socktype = self.socktype;
        native.ai_protocol = self.protocol;
        native
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linger {
    pub onoff: bool,
    pub secs: c_int,
}
impl Linger {
    pub fn from_native(native: libc::linger) -> Self {
        Self {
            onoff: native.l_onoff != 0,
            secs: native.l_linger,
        }
    }

    pub fn to_native(self) -> libc::linger {
        libc::linger {
            l_onoff: self.onoff as c_int,
            l_linger: self.secs,
        }
    }
}

/// Returns the address family stored at the front of an encoded socket address.
pub fn sockaddr_family(addr: &[u8]) -> Option<AddressFamily> {
    if addr.len() < size_of::<libc::sa_family_t>() {
        return None;
    }
    let family = libc::sa_family_t::from_ne_bytes([addr[0], addr[1]]);
    Some(AddressFamily(family as c_int))
}

/// Encodes a UNIX-domain socket address. Fails with `ENAMETOOLONG` if `path` does not fit.
pub fn sockaddr_un(path: &[u8]) -> Result<Vec<u8>, Errno> {
    let mut native: libc::sockaddr_un = unsafe { std::mem::zeroed() };
    if path.len() >= native.sun_path.len() {
        return Err(Errno::ENAMETOOLONG);
    }
    native.sun_family = libc::AF_UNIX as _;
    for (dst, &src) in native.sun_path.iter_mut().zip(path) {
        *dst = src as _;
    }
    Ok(struct_bytes(&native))
}

/// Returns the pathname of an encoded UNIX-domain socket address, or [`None`] for any other family.
pub fn sockaddr_un_path(addr: &[u8]) -> Option<Vec<u8>> {
    if sockaddr_family(addr)? != AddressFamily::AF_UNIX {
        return None;
    }
    let native: libc::sockaddr_un = unsafe { read_struct(addr) };
    Some(crate::util::array_bytes(&native.sun_path))
}

/// Encodes an IPv4 socket address. `port` is in host byte order.
pub fn sockaddr_in(addr: [u8; 4], port: u16) -> Vec<u8> {
    let mut native: libc::sockaddr_in = unsafe { std::mem::zeroed() };
    native.sin_family = libc::AF_INET as _;
    native.sin_port = port.to_be();
    native.sin_addr.s_addr = u32::from_ne_bytes(addr);
    struct_bytes(&native)
}

/// Decodes an IPv4 socket address into its address bytes and host-order port.
pub fn sockaddr_in_parts(addr: &[u8]) -> Option<([u8; 4], u16)> {
    if sockaddr_family(addr)? != AddressFamily::AF_INET {
        return None;
    }
    let native: libc::sockaddr_in = unsafe { read_struct(addr) };
    Some((
        native.sin_addr.s_addr.to_ne_bytes(),
        u16::from_be(native.sin_port),
    ))
}

/// Encodes an IPv6 socket address. `port` is in host byte order.
pub fn sockaddr_in6(addr: [u8; 16], port: u16) -> Vec<u8> {
    let mut native: libc::sockaddr_in6 = unsafe { std::mem::zeroed() };
    native.sin6_family = libc::AF_INET6 as _;
    native.sin6_port = port.to_be();
    native.sin6_addr.s6_addr = addr;
    struct_bytes(&native)
}

/// Decodes an IPv6 socket address into its address bytes and host-order port.
pub fn sockaddr_in6_parts(addr: &[u8]) -> Option<([u8; 16], u16)> {
    if sockaddr_family(addr)? != AddressFamily::AF_INET6 {
        return None;
    }
    let native: libc::sockaddr_in6 = unsafe { read_struct(addr) };
    Some((native.sin6_addr.s6_addr, u16::from_be(native.sin6_port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sockaddr_in_port_is_network_order() {
        let encoded = sockaddr_in([127, 0, 0, 1], 8080);
        assert_eq!(encoded.len(), size_of::<libc::sockaddr_in>());
        assert_eq!(&encoded[2..4], &8080u16.to_be_bytes());
        assert_eq!(&encoded[4..8], &[127, 0, 0, 1]);
        assert_eq!(sockaddr_in_parts(&encoded), Some(([127, 0, 0, 1], 8080)));
    }

    #[test]
    fn sockaddr_un_rejects_other_families() {
        let un = sockaddr_un(b"/tmp/sock").unwrap();
        assert_eq!(sockaddr_un_path(&un).as_deref(), Some(&b"/tmp/sock"[..]));
        assert_eq!(sockaddr_un_path(&sockaddr_in([0; 4], 0)), None);
        assert_eq!(sockaddr_un(&[b'a'; 200]), Err(Errno::ENAMETOOLONG));
    }

    #[test]
    fn sockaddr_in6_parts_roundtrip() {
        let mut loopback = [0u8; 16];
        loopback[15] = 1;
        let encoded = sockaddr_in6(loopback, 443);
        assert_eq!(sockaddr_in6_parts(&encoded), Some((loopback, 443)));
        assert_eq!(sockaddr_in_parts(&encoded), None);
    }

    #[test]
    fn hostent_without_addresses_has_no_first() {
        let aliases: [*mut libc::c_char; 1] = [std::ptr::null_mut()];
        let addrs: [*mut libc::c_char; 1] = [std::ptr::null_mut()];
        let ent = raw::hostent {
            h_name: c"example".as_ptr() as *mut _,
            h_aliases: aliases.as_ptr() as *mut _,
            h_addrtype: libc::AF_INET,
            h_length: 4,
            h_addr_list: addrs.as_ptr() as *mut _,
        };
        let host = unsafe { HostEnt::from_raw(&ent) };
        assert_eq!(host.name, b"example");
        assert!(host.aliases.is_empty());
        assert_eq!(host.first_addr(), None);
    }

    #[test]
    fn servent_port_is_host_order() {
        let aliases: [*mut libc::c_char; 2] = [c"www".as_ptr() as *mut _, std::ptr::null_mut()];
        let ent = raw::servent {
            s_name: c"http".as_ptr() as *mut _,
            s_aliases: aliases.as_ptr() as *mut _,
            s_port: 80u16.to_be() as c_int,
            s_proto: c"tcp".as_ptr() as *mut _,
        };
        let serv = unsafe { ServEnt::from_raw(&ent) };
        assert_eq!(serv.port, 80);
        assert_eq!(serv.aliases, vec![b"www".to_vec()]);
        assert_eq!(serv.proto, b"tcp");
    }
}
