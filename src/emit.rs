//! CSV output, one `bytes,seconds` record per measured point.
use std::io::{self, Write};

pub const CSV_HEADER: &str = "Size,Runtime";

/// Writes sweep results as CSV to any sink
pub struct CsvEmitter<W: Write> {
    out: W,
}

impl<W: Write> CsvEmitter<W> {
    pub fn new(out: W) -> Self {
        CsvEmitter { out }
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{CSV_HEADER}")?;
        self.out.flush()
    }

    /// Emit one record for a chain of `slots` slots, flushed immediately
    pub fn record(&mut self, slots: usize, best_secs: f64) -> io::Result<()> {
        let bytes = slots * std::mem::size_of::<usize>();
        writeln!(self.out, "{bytes},{best_secs:.8}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_format() {
        let mut emitter = CsvEmitter::new(Vec::new());
        emitter.header().unwrap();
        emitter.record(1024, 0.00123456).unwrap();
        emitter.record(1280, 1.5).unwrap();
        let text = String::from_utf8(emitter.into_inner()).unwrap();
        let width = std::mem::size_of::<usize>();
        assert_eq!(
            text,
            format!("Size,Runtime\n{},0.00123456\n{},1.50000000\n", 1024 * width, 1280 * width)
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn record_on_64_bit() {
        let mut emitter = CsvEmitter::new(Vec::new());
        emitter.record(1024, 0.00123456).unwrap();
        assert_eq!(emitter.into_inner(), b"8192,0.00123456\n");
    }
}
