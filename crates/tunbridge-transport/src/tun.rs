use std::fs::File;
use std::io::{Read, Write};

use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Path of the Linux TUN/TAP clone device.
pub const TUN_CLONE_DEVICE: &str = "/dev/net/tun";

/// Kernel limit on interface names, including the trailing NUL.
pub const IFNAMSIZ: usize = 16;

/// Which kind of virtual interface to attach to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TunMode {
    /// Layer 3: each read yields one IP packet.
    #[default]
    Tun,
    /// Layer 2: each read yields one Ethernet frame.
    Tap,
}

impl TunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TunMode::Tun => "tun",
            TunMode::Tap => "tap",
        }
    }
}

impl std::fmt::Display for TunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open TUN/TAP interface handle.
///
/// Opened without packet information, so every read returns exactly one raw
/// packet (or frame in TAP mode) and every write must carry exactly one.
pub struct TunDevice {
    file: File,
    name: String,
    mode: TunMode,
}

impl TunDevice {
    /// Attach to the interface `name`, creating it if the caller is allowed to.
    ///
    /// An empty name lets the kernel pick one (`tun0`, `tap0`, ...). The name
    /// the kernel actually assigned is available via [`TunDevice::name`].
    pub fn open(name: &str, mode: TunMode) -> Result<Self> {
        if name.len() >= IFNAMSIZ {
            return Err(TransportError::NameTooLong {
                name: name.to_string(),
                len: name.len(),
                max: IFNAMSIZ - 1,
            });
        }

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(TUN_CLONE_DEVICE)
            .map_err(|source| TransportError::OpenDevice {
                path: TUN_CLONE_DEVICE,
                source,
            })?;
        debug!(path = TUN_CLONE_DEVICE, "opened clone device");

        let assigned = attach(&file, name, mode)?;
        info!(interface = %assigned, %mode, "attached to virtual interface");

        Ok(Self {
            file,
            name: assigned,
            mode,
        })
    }

    /// The interface name assigned by the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> TunMode {
        self.mode
    }

    /// Duplicate the handle (same queue, new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            file: self.file.try_clone()?,
            name: self.name.clone(),
            mode: self.mode,
        })
    }
}

/// `ifreq` asking for `name` in `mode`, without packet information.
#[cfg(target_os = "linux")]
fn tun_request(name: &str, mode: TunMode) -> libc::ifreq {
    // SAFETY: `ifreq` is plain old data; all-zero is a valid value.
    let mut req: libc::ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in req.ifr_name.iter_mut().zip(name.as_bytes()) {
        *dst = *src as libc::c_char;
    }
    let kind = match mode {
        TunMode::Tun => libc::IFF_TUN,
        TunMode::Tap => libc::IFF_TAP,
    };
    req.ifr_ifru.ifru_flags = (kind | libc::IFF_NO_PI) as libc::c_short;
    req
}

#[cfg(target_os = "linux")]
fn attach(file: &File, name: &str, mode: TunMode) -> Result<String> {
    use std::os::fd::AsRawFd;

    let mut req = tun_request(name, mode);

    // SAFETY: `req` is a writable `ifreq` that outlives the call and `file`
    // holds an open descriptor for the clone device.
    let rc = unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            libc::TUNSETIFF,
            &mut req as *mut libc::ifreq,
        )
    };
    if rc < 0 {
        return Err(TransportError::Attach {
            name: name.to_string(),
            source: std::io::Error::last_os_error(),
        });
    }

    let len = req
        .ifr_name
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(IFNAMSIZ);
    let bytes: Vec<u8> = req.ifr_name[..len].iter().map(|&c| c as u8).collect();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(not(target_os = "linux"))]
fn attach(_file: &File, name: &str, _mode: TunMode) -> Result<String> {
    Err(TransportError::Attach {
        name: name.to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "TUN/TAP attachment is only implemented for Linux",
        ),
    })
}

impl Read for TunDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for TunDevice {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

#[cfg(unix)]
impl std::os::fd::AsRawFd for TunDevice {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.file.as_raw_fd()
    }
}

impl std::fmt::Debug for TunDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunDevice")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_name_that_does_not_fit_ifnamsiz() {
        let err = TunDevice::open("an-interface-name-too-long", TunMode::Tun).unwrap_err();
        assert!(matches!(
            err,
            TransportError::NameTooLong { len: 26, max: 15, .. }
        ));
    }

    #[test]
    fn fifteen_byte_name_passes_length_check() {
        // Whatever happens next depends on privileges; it must not be a length error.
        let result = TunDevice::open("abcdefghijklmno", TunMode::Tap);
        assert!(!matches!(result, Err(TransportError::NameTooLong { .. })));
    }

    #[test]
    fn mode_defaults_to_tun() {
        assert_eq!(TunMode::default(), TunMode::Tun);
        assert_eq!(TunMode::Tap.to_string(), "tap");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn name_limit_matches_kernel() {
        assert_eq!(IFNAMSIZ, libc::IFNAMSIZ);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn request_carries_name_and_mode_flags() {
        let req = tun_request("tb0", TunMode::Tap);
        let name: Vec<u8> = req.ifr_name[..4].iter().map(|&c| c as u8).collect();
        assert_eq!(name, b"tb0\0");

        // SAFETY: `ifru_flags` is the member `tun_request` wrote.
        let flags = unsafe { req.ifr_ifru.ifru_flags };
        assert_eq!(flags, (libc::IFF_TAP | libc::IFF_NO_PI) as libc::c_short);

        let req = tun_request("", TunMode::Tun);
        assert!(req.ifr_name.iter().all(|&c| c == 0));
        // SAFETY: as above.
        let flags = unsafe { req.ifr_ifru.ifru_flags };
        assert_eq!(flags, (libc::IFF_TUN | libc::IFF_NO_PI) as libc::c_short);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn fifteen_byte_name_leaves_room_for_terminator() {
        let req = tun_request("abcdefghijklmno", TunMode::Tun);
        assert_eq!(req.ifr_name[14] as u8, b'o');
        assert_eq!(req.ifr_name[15], 0);
    }
}
