use crate::error::LaunchError;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Instant;

/// Delay between port checks while a driver starts up
const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A locally launched WebDriver binary (e.g. chromedriver)
///
/// The child is spawned with `kill_on_drop`, so it never outlives this
/// guard. Prefer [`ChromeDriverProcess::shutdown`] to also reap it.
#[derive(Debug)]
pub struct ChromeDriverProcess {
    binary: String,
    port: u16,
    child: Child,
}

impl ChromeDriverProcess {
    /// Spawns `binary --port=<port>` and waits until the port accepts connections
    pub async fn spawn(
        binary: &str,
        port: u16,
        startup_timeout: Duration,
    ) -> Result<Self, LaunchError> {
        ::log::debug!("Launching driver {} on port {}", binary, port);

        // A listener already on the port would be mistaken for the new driver
        if port_accepts_connections(port).await {
            return Err(LaunchError::PortInUse {
                binary: binary.to_string(),
                port,
            });
        }

        let child = Command::new(binary)
            .arg(format!("--port={}", port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LaunchError::DriverSpawn {
                binary: binary.to_string(),
                source,
            })?;

        let mut process = Self {
            binary: binary.to_string(),
            port,
            child,
        };

        let started = Instant::now();
        if !process.wait_until_listening(startup_timeout).await {
            process.shutdown().await;
            return Err(LaunchError::DriverNotReady {
                binary: binary.to_string(),
                port,
                waited: started.elapsed(),
            });
        }

        ::log::debug!(
            "Driver {} ready on port {} after {:.2} seconds",
            binary,
            port,
            started.elapsed().as_secs_f64()
        );
        Ok(process)
    }

    async fn wait_until_listening(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            if self.has_exited() {
                return false;
            }

            // Only trust the port while our own child is still alive
            if port_accepts_connections(self.port).await {
                return !self.has_exited();
            }

            if Instant::now() >= deadline {
                return false;
            }

            tokio::time::sleep(STARTUP_POLL_INTERVAL).await;
        }
    }

    fn has_exited(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                ::log::warn!("Driver {} exited during startup: {}", self.binary, status);
                true
            }
            Ok(None) => false,
            Err(e) => {
                ::log::warn!("Failed to poll driver {}: {}", self.binary, e);
                true
            }
        }
    }

    /// Kills the driver and waits for it to exit
    pub async fn shutdown(mut self) {
        match self.child.kill().await {
            Ok(()) => ::log::debug!("Driver {} on port {} stopped", self.binary, self.port),
            Err(e) => ::log::debug!("Driver {} already stopped: {}", self.binary, e),
        }
    }
}

async fn port_accepts_connections(port: u16) -> bool {
    TcpStream::connect(("127.0.0.1", port)).await.is_ok()
}
