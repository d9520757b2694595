#[cfg(unix)]
use tokio::signal::unix::signal;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    OsSigQuit,
    OsSigTerm,
    UserInt,
}

#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    #[must_use]
    pub const fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    /// Send an interrupt signal to the application.
    ///
    /// # Errors
    ///
    /// Fails if the interrupt signal cannot be sent (e.g. the receiver has been dropped)
    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

#[cfg(unix)]
async fn terminate_by_unix_signal(mut terminator: Terminator) -> anyhow::Result<()> {
    use tokio::signal::unix::SignalKind;

    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut quit_signal = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt_signal.recv() => terminator.terminate(Interrupted::OsSigInt),
        _ = term_signal.recv() => terminator.terminate(Interrupted::OsSigTerm),
        _ = quit_signal.recv() => terminator.terminate(Interrupted::OsSigQuit),
    }
}

#[cfg(not(unix))]
async fn terminate_by_ctrl_c(mut terminator: Terminator) -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    terminator.terminate(Interrupted::OsSigInt)
}

// create a broadcast channel for retrieving the application kill signal
#[allow(clippy::module_name_repetitions)]
#[must_use]
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    #[cfg(unix)]
    let signals = terminate_by_unix_signal(terminator.clone());
    #[cfg(not(unix))]
    let signals = terminate_by_ctrl_c(terminator.clone());

    tokio::spawn(async move {
        if let Err(e) = signals.await {
            log::error!("signal handler failed: {e}");
        }
    });

    (terminator, rx)
}
