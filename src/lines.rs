//! Byte-tolerant line reader.
//!
//! `make -p` dumps and makefiles are not guaranteed to be valid UTF-8, so
//! lines are decoded lossily instead of failing the whole run.

use std::io::{self, BufRead};

pub struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

/// Iterate over the lines of `reader`, without the trailing `\n` / `\r\n`.
pub fn lines<R: BufRead>(reader: R) -> Lines<R> {
    Lines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut line = self.buf.as_slice();
                if let Some(rest) = line.strip_suffix(b"\n") {
                    line = rest;
                }
                if let Some(rest) = line.strip_suffix(b"\r") {
                    line = rest;
                }
                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Reader that serves `data` and then fails.
#[cfg(test)]
pub(crate) fn broken_reader(data: &'static [u8]) -> impl BufRead {
    struct Broken;

    impl io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device went away"))
        }
    }

    io::BufReader::new(io::Read::chain(data, Broken))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<String> {
        lines(input).map(|l| l.unwrap()).collect()
    }

    #[test]
    fn strips_line_endings() {
        assert_eq!(collect(b"a\nb\r\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_empty_lines() {
        assert_eq!(collect(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(collect(b"ok\xff\n"), vec!["ok\u{FFFD}"]);
    }

    #[test]
    fn read_error_after_first_line() {
        let mut it = lines(broken_reader(b"first\n"));
        assert_eq!(it.next().unwrap().unwrap(), "first");
        assert!(it.next().unwrap().is_err());
    }

    #[test]
    fn empty_input() {
        assert!(collect(b"").is_empty());
    }
}
