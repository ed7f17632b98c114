//! The input loop.

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::discovery::DiscoveryEvent;
use crate::errors::Error;
use crate::session::Session;

type Result<T> = std::result::Result<T, Error>;

/// Feed input lines and discovery events to `session` until input ends.
///
/// Each line is handled to completion before the next event is looked at.
/// Discovery events are taken first when both are ready, so a device that
/// announced itself before the operator pressed enter is already listed.
pub async fn run<R>(
    session: &mut Session,
    input: R,
    mut events: mpsc::UnboundedReceiver<DiscoveryEvent>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut discovering = true;

    loop {
        tokio::select! {
            biased;

            event = events.recv(), if discovering => match event {
                Some(event) => session.apply(event),
                None => {
                    debug!("discovery finished");
                    discovering = false;
                }
            },
            line = lines.next_line() => match line.map_err(|e| Error::io("read", e))? {
                Some(line) => session.handle_line(&line),
                None => {
                    info!("console input closed");
                    return Ok(());
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::device::DeviceHandle;
    use crate::render::Output;
    use crate::simulator::SimulatedDevice;

    #[tokio::test]
    async fn test_lines_drive_session() {
        let (out, mut rx) = Output::channel();
        let mut session = Session::new(out, ConsoleConfig::default());
        let lamp = SimulatedDevice::builder("aa").label("Kitchen").product(27).build();

        let (tx, events) = mpsc::unbounded_channel();
        let handle: DeviceHandle = lamp.clone();
        tx.send(DiscoveryEvent::Registered(handle)).unwrap();
        drop(tx);

        run(&mut session, &b"\n1\n1 on\n"[..], events).await.unwrap();

        assert_eq!(lamp.call_log().calls(), vec!["set_power"]);
        let text = rx.drain();
        assert!(text.starts_with("Select Bulb:\n\t[1]\tKitchen\n"));
        assert!(text.contains("Select Function for Kitchen:"));
        assert!(session.selected().is_none());
    }

    #[tokio::test]
    async fn test_ends_when_input_closes() {
        let (out, _rx) = Output::channel();
        let mut session = Session::new(out, ConsoleConfig::default());
        let (_tx, events) = mpsc::unbounded_channel();
        assert!(run(&mut session, &b""[..], events).await.is_ok());
        assert!(session.registry().is_empty());
    }
}
