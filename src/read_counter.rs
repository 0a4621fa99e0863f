use std::io::{self, Read};

/// Wraps a reader and tracks how many bytes have been pulled through it, so
/// a chunk walker can tell when it has consumed a sub-chunk's declared
/// size without needing a seekable stream.
pub(crate) struct ReadCounter<'a, R: Read> {
    inner: &'a mut R,
    count: usize,
}

impl<'a, R: Read> ReadCounter<'a, R> {
    pub(crate) fn new(inner: &'a mut R) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn bytes_read(&self) -> usize {
        self.count
    }
}

impl<R: Read> Read for ReadCounter<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n;
        Ok(n)
    }
}
