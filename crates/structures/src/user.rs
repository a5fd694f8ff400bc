use crate::util::{c_bytes, c_str_list};

/// A user database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passwd {
    pub name: Vec<u8>,
    pub passwd: Vec<u8>,
    pub uid: u32,
    pub gid: u32,
    pub gecos: Vec<u8>,
    pub dir: Vec<u8>,
    pub shell: Vec<u8>,
}
impl Passwd {
    /// # Safety
    /// `pw` must be a valid entry as returned by the C library.
    pub unsafe fn from_raw(pw: &libc::passwd) -> Self {
        unsafe {
            Self {
                name: c_bytes(pw.pw_name),
                passwd: c_bytes(pw.pw_passwd),
                uid: pw.pw_uid,
                gid: pw.pw_gid,
                gecos: c_bytes(pw.pw_gecos),
                dir: c_bytes(pw.pw_dir),
                shell: c_bytes(pw.pw_shell),
            }
        }
    }
}

/// A group database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: Vec<u8>,
    pub gid: u32,
    pub members: Vec<Vec<u8>>,
}
impl Group {
    /// # Safety
    /// `gr` must be a valid entry as returned by the C library.
    pub unsafe fn from_raw(gr: &libc::group) -> Self {
        unsafe {
            Self {
                name: c_bytes(gr.gr_name),
                gid: gr.gr_gid,
                members: c_str_list(gr.gr_mem),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_members_keep_order() {
        let members = [
            c"alice".as_ptr() as *mut libc::c_char,
            c"bob".as_ptr() as *mut libc::c_char,
            std::ptr::null_mut(),
        ];
        let gr = libc::group {
            gr_name: c"staff".as_ptr() as *mut _,
            gr_passwd: c"x".as_ptr() as *mut _,
            gr_gid: 50,
            gr_mem: members.as_ptr() as *mut _,
        };
        let group = unsafe { Group::from_raw(&gr) };
        assert_eq!(group.name, b"staff");
        assert_eq!(group.gid, 50);
        assert_eq!(group.members, vec![b"alice".to_vec(), b"bob".to_vec()]);
    }
}
