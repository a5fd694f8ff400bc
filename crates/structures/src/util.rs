//! Helpers for walking C strings and NUL-terminated arrays.

use libc::c_char;
use std::ffi::CStr;

/// Copies a C string into an owned byte vector. A null pointer yields an empty vector.
///
/// # Safety
/// `s` must be null or point to a valid NUL-terminated string.
pub unsafe fn c_bytes(s: *const c_char) -> Vec<u8> {
    unsafe { c_opt_bytes(s).unwrap_or_default() }
}

/// Copies a C string into an owned byte vector, mapping a null pointer to [`None`].
///
/// # Safety
/// `s` must be null or point to a valid NUL-terminated string.
pub unsafe fn c_opt_bytes(s: *const c_char) -> Option<Vec<u8>> {
    if s.is_null() {
        return None;
    }
    unsafe { Some(CStr::from_ptr(s).to_bytes().to_vec()) }
}

/// Copies the bytes of a fixed-size C character array up to the first NUL.
pub fn array_bytes(arr: &[c_char]) -> Vec<u8> {
    arr.iter()
        .map(|&c| c as u8)
        .take_while(|&c| c != 0)
        .collect()
}

/// Converts a NUL-terminated array of C strings, preserving order.
///
/// # Safety
/// `list` must be null or point to a null-terminated array of valid C strings.
pub unsafe fn c_str_list(list: *const *mut c_char) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if list.is_null() {
        return out;
    }
    unsafe {
        let mut cursor = list;
        while !(*cursor).is_null() {
            out.push(c_bytes(*cursor));
            cursor = cursor.add(1);
        }
    }
    out
}

/// Converts a NUL-terminated array of fixed-size binary records, each `len` bytes long, preserving order.
///
/// # Safety
/// `list` must be null or point to a null-terminated array of pointers to at least `len` readable bytes each.
pub unsafe fn c_record_list(list: *const *mut c_char, len: usize) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if list.is_null() {
        return out;
    }
    unsafe {
        let mut cursor = list;
        while !(*cursor).is_null() {
            out.push(std::slice::from_raw_parts((*cursor).cast::<u8>(), len).to_vec());
            cursor = cursor.add(1);
        }
    }
    out
}

/// Returns the raw bytes of a plain C structure.
pub fn struct_bytes<T: Copy>(value: &T) -> Vec<u8> {
    unsafe { std::slice::from_raw_parts((value as *const T).cast::<u8>(), size_of::<T>()).to_vec() }
}

/// Reads a plain C structure from the front of `bytes`, zero-filling whatever `bytes` does not cover.
///
/// # Safety
/// Every bit pattern, including all-zero, must be a valid `T`.
pub unsafe fn read_struct<T: Copy>(bytes: &[u8]) -> T {
    unsafe {
        let mut value: T = std::mem::zeroed();
        let len = bytes.len().min(size_of::<T>());
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), (&raw mut value).cast::<u8>(), len);
        value
    }
}
