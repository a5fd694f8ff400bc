use crate::Export;
use macros::export;
use posix::net::addr;
use structures::{
    error::Errno,
    net::{self, AddressFamily},
};

// -== Encoded socket addresses ==-

#[export]
fn make_sockaddr_un(path: &[u8]) -> Result<Vec<u8>, Errno> {
    net::sockaddr_un(path)
}

#[export]
fn sockaddr_un_pathname(sa: &[u8]) -> Option<Vec<u8>> {
    net::sockaddr_un_path(sa)
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], Errno> {
    bytes.try_into().map_err(|_| Errno::EINVAL)
}

#[export]
fn make_sockaddr_in(addr4: &[u8], port: u16) -> Result<Vec<u8>, Errno> {
    Ok(net::sockaddr_in(fixed(addr4)?, port))
}

#[export]
fn sockaddr_in_in_addr(sa: &[u8]) -> Option<Vec<u8>> {
    net::sockaddr_in_parts(sa).map(|(addr, _)| addr.to_vec())
}

/// The IPv4 address as a single number, most significant octet first.
#[export]
fn sockaddr_in_in_addr_number(sa: &[u8]) -> Option<u32> {
    net::sockaddr_in_parts(sa).map(|(addr, _)| u32::from_be_bytes(addr))
}

#[export]
fn sockaddr_in_in_port(sa: &[u8]) -> Option<u16> {
    net::sockaddr_in_parts(sa).map(|(_, port)| port)
}

#[export]
fn make_sockaddr_in6(addr16: &[u8], port: u16) -> Result<Vec<u8>, Errno> {
    Ok(net::sockaddr_in6(fixed(addr16)?, port))
}

#[export]
fn sockaddr_in6_in6_addr(sa: &[u8]) -> Option<Vec<u8>> {
    net::sockaddr_in6_parts(sa).map(|(addr, _)| addr.to_vec())
}

#[export]
fn sockaddr_in6_in6_port(sa: &[u8]) -> Option<u16> {
    net::sockaddr_in6_parts(sa).map(|(_, port)| port)
}

#[export]
fn in6addr_loopback() -> Vec<u8> {
    addr::IN6ADDR_LOOPBACK.to_vec()
}

#[export]
fn in6addr_any() -> Vec<u8> {
    addr::IN6ADDR_ANY.to_vec()
}

// -== Text forms ==-

#[export]
fn inet_aton(text: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    addr::inet_aton(text).map(|x| x.map(Vec::from))
}

#[export]
fn inet_ntoa(addr4: &[u8]) -> Result<Vec<u8>, Errno> {
    Ok(addr::inet_ntoa(fixed(addr4)?))
}

#[export]
fn inet_pton(af: AddressFamily, text: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    addr::inet_pton(af, text)
}

#[export]
fn inet_ntop(af: AddressFamily, bytes: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    addr::inet_ntop(af, bytes)
}

pub const EXPORTS: &[Export] = &[
    MAKE_SOCKADDR_UN,
    SOCKADDR_UN_PATHNAME,
    MAKE_SOCKADDR_IN,
    SOCKADDR_IN_IN_ADDR,
    SOCKADDR_IN_IN_ADDR_NUMBER,
    SOCKADDR_IN_IN_PORT,
    MAKE_SOCKADDR_IN6,
    SOCKADDR_IN6_IN6_ADDR,
    SOCKADDR_IN6_IN6_PORT,
    IN6ADDR_LOOPBACK,
    IN6ADDR_ANY,
    INET_ATON,
    INET_NTOA,
    INET_PTON,
    INET_NTOP,
];
