use crate::Export;
use macros::export;

#[export]
fn htonl(host: u32) -> u32 {
    host.to_be()
}

#[export]
fn htons(host: u16) -> u16 {
    host.to_be()
}

#[export]
fn ntohl(net: u32) -> u32 {
    u32::from_be(net)
}

#[export]
fn ntohs(net: u16) -> u16 {
    u16::from_be(net)
}

pub const EXPORTS: &[Export] = &[HTONL, HTONS, NTOHL, NTOHS];

#[cfg(test)]
mod tests {
    use crate::{MarshalError, Value, invoke};

    #[test]
    fn swaps_on_little_endian() {
        let expected = match cfg!(target_endian = "little") {
            true => 0x3412,
            false => 0x1234,
        };
        assert_eq!(invoke("htons", &mut [Value::Integer(0x1234)]), Ok(Value::Integer(expected)));
        assert_eq!(invoke("ntohl", &mut [Value::Integer(0x0102_0304)]).and_then(|x| {
            invoke("htonl", &mut [x])
        }), Ok(Value::Integer(0x0102_0304)));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let ret = invoke("htons", &mut [Value::Integer(0x1_0000)]);
        assert!(matches!(ret, Err(MarshalError::BadArgument { index: 0, .. })));
    }
}
