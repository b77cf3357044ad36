//! Raw extended attribute store access at a path
//!
//! Thin byte-level wrappers over the OS `getxattr`/`setxattr`/`removexattr`
//! primitives. Symlinks are followed, as with the plain (non `l*`) syscalls.
//!
//! # Platform Differences
//!
//! ## Linux (simpler API):
//! - `getxattr(path, name, value, size)` - 4 args
//! - `setxattr(path, name, value, size, flags)` - 5 args
//! - `removexattr(path, name)` - 2 args
//!
//! ## macOS (BSD API with extra features):
//! - `getxattr(path, name, value, size, position, options)` - 6 args
//! - `setxattr(path, name, value, size, position, options)` - 6 args
//! - `removexattr(path, name, options)` - 3 args
//!
//! We always pass 0 for macOS's `position` and `options`, making both
//! platforms behave like Linux's simpler API.

use crate::error::{invalid_argument, store_error, Result};
use std::ffi::CString;
use std::io;
use std::path::Path;

/// Convert a path into a NUL-terminated C string
fn path_cstring(path: &Path) -> Result<CString> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| invalid_argument(&format!("path contains NUL byte: {}", path.display())))
}

/// Convert an attribute name into a NUL-terminated C string
fn name_cstring(name: &str) -> Result<CString> {
    if name.is_empty() {
        return Err(invalid_argument("attribute key must not be empty"));
    }
    CString::new(name)
        .map_err(|_| invalid_argument(&format!("attribute key contains NUL byte: {name:?}")))
}

/// Call `getxattr(2)` with the given buffer (empty buffer = size query)
fn sys_getxattr(path: &CString, name: &CString, buffer: &mut [u8]) -> isize {
    let (ptr, len) = if buffer.is_empty() {
        (std::ptr::null_mut(), 0)
    } else {
        (buffer.as_mut_ptr().cast::<libc::c_void>(), buffer.len())
    };

    // SAFETY: both strings are NUL-terminated and `ptr` is either null with a
    // zero length or points at `len` writable bytes.
    unsafe {
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        {
            libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, len, 0, 0)
        }
        #[cfg(not(any(target_os = "macos", target_os = "ios")))]
        {
            libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, len)
        }
    }
}

/// Read the raw bytes of an attribute
///
/// Sizes the buffer with a zero-length query first. If the value grows
/// between the query and the read (`ERANGE`), the size is queried again.
///
/// # Errors
///
/// This function will return an error if:
/// - The attribute doesn't exist (`AttributeNotFound`)
/// - The path doesn't exist (`PathNotFound`)
/// - Permission is denied or the filesystem rejects the call (`Store`)
/// - The path or name contains a NUL byte, or the name is empty
pub fn get_raw(path: &Path, name: &str) -> Result<Vec<u8>> {
    let path_cstr = path_cstring(path)?;
    let name_cstr = name_cstring(name)?;

    loop {
        let size = sys_getxattr(&path_cstr, &name_cstr, &mut []);
        if size < 0 {
            return Err(store_error(
                "getxattr",
                path,
                Some(name),
                io::Error::last_os_error(),
            ));
        }
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![0u8; size.unsigned_abs()];
        let actual_size = sys_getxattr(&path_cstr, &name_cstr, &mut buffer);
        if actual_size < 0 {
            let errno = io::Error::last_os_error();
            if errno.raw_os_error() == Some(libc::ERANGE) {
                log::trace!("getxattr {name} on {}: value grew, re-sizing", path.display());
                continue;
            }
            return Err(store_error("getxattr", path, Some(name), errno));
        }

        buffer.truncate(actual_size.unsigned_abs());
        return Ok(buffer);
    }
}

/// Create or replace an attribute with raw bytes
///
/// # Errors
///
/// This function will return an error if:
/// - The path doesn't exist (`PathNotFound`)
/// - Permission is denied or the filesystem rejects the call (`Store`)
/// - The path or name contains a NUL byte, or the name is empty
pub fn set_raw(path: &Path, name: &str, value: &[u8]) -> Result<()> {
    let path_cstr = path_cstring(path)?;
    let name_cstr = name_cstring(name)?;

    // SAFETY: both strings are NUL-terminated and `value` is a valid slice.
    let result = unsafe {
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        {
            libc::setxattr(
                path_cstr.as_ptr(),
                name_cstr.as_ptr(),
                value.as_ptr().cast::<libc::c_void>(),
                value.len(),
                0, // position
                0, // options: neither XATTR_CREATE nor XATTR_REPLACE
            )
        }
        #[cfg(not(any(target_os = "macos", target_os = "ios")))]
        {
            libc::setxattr(
                path_cstr.as_ptr(),
                name_cstr.as_ptr(),
                value.as_ptr().cast::<libc::c_void>(),
                value.len(),
                0, // flags
            )
        }
    };

    if result != 0 {
        return Err(store_error(
            "setxattr",
            path,
            Some(name),
            io::Error::last_os_error(),
        ));
    }

    Ok(())
}

/// Remove an attribute
///
/// # Errors
///
/// This function will return an error if:
/// - The attribute doesn't exist (`AttributeNotFound`)
/// - The path doesn't exist (`PathNotFound`)
/// - Permission is denied or the filesystem rejects the call (`Store`)
/// - The path or name contains a NUL byte, or the name is empty
pub fn remove_raw(path: &Path, name: &str) -> Result<()> {
    let path_cstr = path_cstring(path)?;
    let name_cstr = name_cstring(name)?;

    // SAFETY: both strings are NUL-terminated.
    let result = unsafe {
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        {
            libc::removexattr(path_cstr.as_ptr(), name_cstr.as_ptr(), 0 /* options */)
        }
        #[cfg(not(any(target_os = "macos", target_os = "ios")))]
        {
            libc::removexattr(path_cstr.as_ptr(), name_cstr.as_ptr())
        }
    };

    if result != 0 {
        return Err(store_error(
            "removexattr",
            path,
            Some(name),
            io::Error::last_os_error(),
        ));
    }

    Ok(())
}

/// List the names of all attributes on a path
///
/// Uses the `xattr` crate's safe `listxattr` wrapper. Names that are not
/// valid UTF-8 are skipped.
///
/// # Errors
///
/// This function will return an error if:
/// - The path doesn't exist (`PathNotFound`)
/// - Permission is denied or the filesystem rejects the call (`Store`)
pub fn list_raw(path: &Path) -> Result<Vec<String>> {
    let attrs = xattr::list(path).map_err(|e| store_error("listxattr", path, None, e))?;

    Ok(attrs
        .filter_map(|os_str| os_str.to_str().map(ToString::to_string))
        .collect())
}
