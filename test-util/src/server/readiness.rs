//! Readiness checks for spawned servers.

use std::{
    net::{SocketAddr, TcpStream},
    process::Child,
    time::Duration,
};

use tracing::warn;

use crate::{
    AnyError,
    wait::{WaitPolicy, retry_until},
};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait for a spawned server to accept connections on the provided address.
///
/// # Errors
///
/// Returns an error if the server exits early or fails to start listening
/// before the startup timeout elapses.
pub(super) fn wait_for_server(child: &mut Child, addr: SocketAddr) -> Result<(), AnyError> {
    let mut exited = None;
    let probe = retry_until(WaitPolicy::new(STARTUP_TIMEOUT, POLL_INTERVAL), || {
        if let Some(status) = child.try_wait()? {
            exited = Some(status);
            return Ok(());
        }
        TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map(drop)
    });
    if let Some(status) = exited {
        return Err(anyhow::anyhow!("server exited before readiness ({status})"));
    }
    probe.map_err(|err| {
        warn!(?addr, error = %err, "server did not open listening port before timeout");
        anyhow::anyhow!("server failed to open listening port: {err}")
    })
}

#[cfg(test)]
mod tests {
    use std::{
        net::{SocketAddr, TcpListener, TcpStream},
        time::Duration,
    };

    use rstest::{fixture, rstest};

    use super::CONNECT_TIMEOUT;
    use crate::wait::{WaitPolicy, retry_until};

    fn wait_for_listening(addr: SocketAddr, timeout: Duration) -> std::io::Result<()> {
        retry_until(WaitPolicy::new(timeout, Duration::from_millis(20)), || {
            TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map(drop)
        })
    }

    #[fixture]
    fn listening_socket() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("listen socket should bind")
    }

    #[fixture]
    fn unused_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral socket should bind");
        let addr = listener
            .local_addr()
            .expect("ephemeral socket should provide a local address");
        drop(listener);
        addr
    }

    #[rstest]
    fn wait_for_listening_reports_ready(listening_socket: TcpListener) {
        let addr = listening_socket
            .local_addr()
            .expect("listening socket should provide a local address");
        wait_for_listening(addr, Duration::from_millis(200)).expect("socket is listening");
    }

    #[rstest]
    fn wait_for_listening_times_out(unused_addr: SocketAddr) {
        let result = wait_for_listening(unused_addr, Duration::from_millis(150));
        assert!(
            result.is_err(),
            "expected readiness to time out for closed port"
        );
    }
}
