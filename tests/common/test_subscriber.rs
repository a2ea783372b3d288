use std::{
    io,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::{fmt::MakeWriter, util::SubscriberInitExt};

#[derive(Clone, Default)]
pub struct MakeMemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

pub struct GuardWrapper<'a>(MutexGuard<'a, Vec<u8>>);

impl<'a> io::Write for GuardWrapper<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for MakeMemoryWriter {
    type Writer = GuardWrapper<'a>;
    fn make_writer(&'a self) -> Self::Writer {
        self.buffer
            .lock()
            .map(GuardWrapper)
            .expect("memory writer mutex was poisoned")
    }
}

/// Captures log output from the current thread for as long as it is alive.
pub struct MemorySubscriber {
    writer: MakeMemoryWriter,
    _guard: DefaultGuard,
}

impl MemorySubscriber {
    pub fn new(log_level: tracing::Level) -> Self {
        let writer = MakeMemoryWriter::default();
        let guard = tsv_fixtures::logging::subscriber_builder(log_level)
            .with_writer(writer.clone())
            .finish()
            .set_default();
        Self { writer, _guard: guard }
    }

    pub fn output(&self) -> String {
        let buffer = self
            .writer
            .buffer
            .lock()
            .expect("memory writer lock was poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for MemorySubscriber {
    fn default() -> Self {
        Self::new(tracing::Level::INFO)
    }
}
