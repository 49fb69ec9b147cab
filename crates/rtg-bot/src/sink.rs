//! Outbound command delivery.

use std::io::Write;

use rtg_core::ExchangeCommand;

use crate::error::AppResult;

/// Receives every command the engine issues, in issuance order.
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink: Send {
    fn send(&mut self, command: &ExchangeCommand) -> AppResult<()>;
}

/// Writes each command as one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> CommandSink for JsonLinesSink<W> {
    fn send(&mut self, command: &ExchangeCommand) -> AppResult<()> {
        serde_json::to_writer(&mut self.writer, command)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
