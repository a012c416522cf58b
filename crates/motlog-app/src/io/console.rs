use embassy_nrf::buffered_uarte::BufferedUarteTx;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embedded_io_async::Write;
use motlog_core::Console;

/// Received bytes the RX task has queued but the coordinator has not yet
/// consumed. Sized for a burst of typing plus escape sequences.
const RX_QUEUE_LEN: usize = 64;

pub type RxQueue = Channel<CriticalSectionRawMutex, u8, RX_QUEUE_LEN>;
pub type RxReceiver = Receiver<'static, CriticalSectionRawMutex, u8, RX_QUEUE_LEN>;

/// Operator console over the buffered UARTE.
///
/// The RX half lives in [`crate::tasks::console_rx_task`], which feeds the
/// queue read here; the TX half is written directly.
pub struct SerialConsole {
    tx: BufferedUarteTx<'static>,
    rx: RxReceiver,
}

impl SerialConsole {
    pub fn new(tx: BufferedUarteTx<'static>, rx: RxReceiver) -> Self {
        Self { tx, rx }
    }
}

impl Console for SerialConsole {
    type Error = <BufferedUarteTx<'static> as embedded_io_async::ErrorType>::Error;

    fn poll_byte(&mut self) -> Option<u8> {
        self.rx.try_receive().ok()
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.tx.write_all(bytes).await
    }
}
