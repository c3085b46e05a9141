use std::io::ErrorKind;
use std::os::fd::RawFd;

use tracing::trace;

use crate::error::{Result, TransportError};

/// Block until at least one descriptor is readable (no timeout).
///
/// Returns one flag per input descriptor, in order. Hang-up and error
/// conditions count as readable so the next read reports them. A wait
/// interrupted by a signal is retried; it never reaches the caller.
pub fn wait_readable<const N: usize>(fds: [RawFd; N]) -> Result<[bool; N]> {
    let mut pollfds = fds.map(|fd| libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    });

    loop {
        // SAFETY: `pollfds` is a valid, writable array of `N` pollfd entries.
        let rc = unsafe {
            libc::poll(
                pollfds.as_mut_ptr(),
                pollfds.len() as libc::nfds_t,
                -1,
            )
        };
        if rc >= 0 {
            break;
        }

        let err = std::io::Error::last_os_error();
        if err.kind() == ErrorKind::Interrupted {
            trace!("readiness wait interrupted; retrying");
            continue;
        }
        return Err(TransportError::Poll(err));
    }

    let ready_mask = libc::POLLIN | libc::POLLHUP | libc::POLLERR | libc::POLLNVAL;
    Ok(pollfds.map(|p| p.revents & ready_mask != 0))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::os::fd::AsRawFd;
    use std::os::unix::net::UnixStream;
    use std::os::unix::thread::JoinHandleExt;
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn reports_only_the_ready_descriptor() {
        let (mut a_tx, a_rx) = UnixStream::pair().unwrap();
        let (_b_tx, b_rx) = UnixStream::pair().unwrap();

        a_tx.write_all(b"x").unwrap();
        let ready = wait_readable([a_rx.as_raw_fd(), b_rx.as_raw_fd()]).unwrap();
        assert_eq!(ready, [true, false]);
    }

    #[test]
    fn reports_both_when_both_ready() {
        let (mut a_tx, a_rx) = UnixStream::pair().unwrap();
        let (mut b_tx, b_rx) = UnixStream::pair().unwrap();

        a_tx.write_all(b"x").unwrap();
        b_tx.write_all(b"y").unwrap();
        let ready = wait_readable([a_rx.as_raw_fd(), b_rx.as_raw_fd()]).unwrap();
        assert_eq!(ready, [true, true]);
    }

    #[test]
    fn hangup_counts_as_readable() {
        let (a_tx, a_rx) = UnixStream::pair().unwrap();
        drop(a_tx);

        let ready = wait_readable([a_rx.as_raw_fd()]).unwrap();
        assert_eq!(ready, [true]);
    }

    #[test]
    fn blocks_until_data_arrives() {
        let (mut tx, rx) = UnixStream::pair().unwrap();

        let writer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            tx.write_all(b"late").unwrap();
            tx
        });

        let ready = wait_readable([rx.as_raw_fd()]).unwrap();
        assert_eq!(ready, [true]);
        let _tx = writer.join().unwrap();
    }

    extern "C" fn ignore_signal(_signal: libc::c_int) {}

    #[test]
    fn signal_during_wait_is_retried() {
        // Installed without SA_RESTART so poll(2) really returns EINTR.
        // SAFETY: `action` is fully initialised before use and the handler
        // is async-signal-safe (it does nothing).
        unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = ignore_signal as libc::sighandler_t;
            action.sa_flags = 0;
            libc::sigemptyset(&mut action.sa_mask);
            assert_eq!(
                libc::sigaction(libc::SIGUSR1, &action, std::ptr::null_mut()),
                0
            );
        }

        let (mut tx, rx) = UnixStream::pair().unwrap();
        let (done_tx, done_rx) = mpsc::channel();
        let waiter = std::thread::spawn(move || {
            let result = wait_readable([rx.as_raw_fd()]);
            done_tx.send(()).unwrap();
            result
        });

        let thread = waiter.as_pthread_t();
        for _ in 0..5 {
            std::thread::sleep(Duration::from_millis(20));
            // SAFETY: the waiter thread is still alive; it cannot finish
            // before a byte is written below.
            assert_eq!(unsafe { libc::pthread_kill(thread, libc::SIGUSR1) }, 0);
        }

        assert!(
            done_rx.recv_timeout(Duration::from_millis(100)).is_err(),
            "interrupted wait must not return"
        );

        tx.write_all(b"x").unwrap();
        assert_eq!(waiter.join().unwrap().unwrap(), [true]);
    }
}
