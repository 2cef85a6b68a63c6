//! Thin `libc` wrappers for host identity.

use std::ffi::CStr;
use std::io::{Error, Result};

/// Returns the kernel's operating system name (`uname -s`), e.g. `Linux` or
/// `AIX`.
///
/// # Errors
///
/// Returns the OS error if `uname(2)` fails.
pub fn os_name() -> Result<String> {
    // SAFETY: `utsname` is plain data; all-zero is a valid value.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };

    // SAFETY: `uts` is a valid, writable `utsname`.
    if unsafe { libc::uname(&raw mut uts) } == -1 {
        return Err(Error::last_os_error());
    }

    // SAFETY: `uname` writes NUL-terminated strings into each field.
    let sysname = unsafe { CStr::from_ptr(uts.sysname.as_ptr()) };
    Ok(sysname.to_string_lossy().into_owned())
}

/// Returns the host name with any domain part removed.
///
/// # Errors
///
/// Returns the OS error if `gethostname(2)` fails or the name is empty.
pub fn short_hostname() -> Result<String> {
    // SAFETY: sysconf has no safety requirements.
    let limit = unsafe { libc::sysconf(libc::_SC_HOST_NAME_MAX) };
    let max_len = usize::try_from(limit).map_or(256, |len| len + 1);

    let mut buf = vec![0u8; max_len];

    // SAFETY: the pointer and length describe `buf`, which we own.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), max_len) };
    if rc == -1 {
        return Err(Error::last_os_error());
    }

    let Some(end) = buf.iter().position(|&b| b == 0) else {
        return Err(Error::other("hostname is not NUL terminated"));
    };
    buf.truncate(end);

    let name = String::from_utf8_lossy(&buf);
    let short = name.split('.').next().unwrap_or_default();
    if short.is_empty() {
        return Err(Error::other("hostname is empty"));
    }
    Ok(short.to_string())
}
