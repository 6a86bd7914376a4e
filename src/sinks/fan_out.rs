//! Write the same bytes to several sinks

use std::fmt;
use std::io::{self, Write};

/// Writes to each inner writer in order, stopping at the first error
pub struct FanOutWriter {
    writers: Vec<Box<dyn Write + Send>>,
}

impl FanOutWriter {
    pub fn new(writers: Vec<Box<dyn Write + Send>>) -> Self {
        Self { writers }
    }

    pub fn push<W: Write + Send + 'static>(&mut self, writer: W) {
        self.writers.push(Box::new(writer));
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl Write for FanOutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for writer in &mut self.writers {
            writer.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for writer in &mut self.writers {
            writer.flush()?;
        }
        Ok(())
    }
}

impl fmt::Debug for FanOutWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOutWriter")
            .field("writers", &self.writers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::SharedBuffer;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_every_sink_in_order() {
        let first = SharedBuffer::new();
        let second = SharedBuffer::new();
        let mut fan_out = FanOutWriter::new(Vec::new());
        fan_out.push(first.clone());
        fan_out.push(second.clone());

        fan_out.write_all(b"line\n").unwrap();
        assert_eq!(first.contents(), "line\n");
        assert_eq!(second.contents(), "line\n");
        assert_eq!(fan_out.len(), 2);
    }

    #[test]
    fn test_stops_at_first_error() {
        let after = SharedBuffer::new();
        let mut fan_out = FanOutWriter::new(Vec::new());
        fan_out.push(FailingWriter);
        fan_out.push(after.clone());

        assert!(fan_out.write_all(b"line\n").is_err());
        assert!(after.is_empty());
    }
}
