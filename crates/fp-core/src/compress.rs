//! Run-length compression of token streams.
//!
//! [`RunLengthCompressor`] collapses consecutive equal tokens into
//! `token(count)` and leaves single tokens bare, writing the result to any
//! [`fmt::Write`] sink as tokens arrive. State is the last token and the
//! length of its run, so a stream of any size renders in one pass.
//!
//! ```
//! use fp_core::compress;
//!
//! assert_eq!(compress(['W', 'W', 'W']), "W(3)");
//! assert_eq!(compress(['W', 'C', 'W']), "WCW");
//! assert_eq!(compress(['C', 'W', 'W', 'D']), "CW(2)D");
//! ```

use std::fmt;

/// Streaming run-length compressor over single-character tokens.
///
/// Call [`push`](Self::push) for every token, then [`flush`](Self::flush)
/// once at end of stream; without the final flush the last run is lost.
///
/// # Examples
///
/// ```
/// use fp_core::RunLengthCompressor;
///
/// let mut out = String::new();
/// let mut rle = RunLengthCompressor::new(&mut out);
/// for token in ['C', 'W', 'W'] {
///     rle.push(token)?;
/// }
/// rle.flush()?;
/// assert_eq!(out, "CW(2)");
/// # Ok::<(), std::fmt::Error>(())
/// ```
#[derive(Debug)]
pub struct RunLengthCompressor<W> {
    sink: W,
    last: Option<char>,
    run: usize,
}

impl<W: fmt::Write> RunLengthCompressor<W> {
    /// Creates a compressor with an empty pending run.
    #[must_use]
    pub const fn new(sink: W) -> Self {
        Self {
            sink,
            last: None,
            run: 0,
        }
    }

    /// Feeds one token.
    ///
    /// Extends the pending run if `token` repeats it, otherwise emits the
    /// pending run and starts a new run of length one.
    pub fn push(&mut self, token: char) -> fmt::Result {
        if self.last == Some(token) {
            self.run += 1;
            return Ok(());
        }
        self.emit()?;
        self.last = Some(token);
        self.run = 1;
        Ok(())
    }

    /// Emits the pending run, if any, and resets to the empty state.
    pub fn flush(&mut self) -> fmt::Result {
        self.emit()?;
        self.last = None;
        self.run = 0;
        Ok(())
    }

    /// Consumes the compressor, returning the sink.
    ///
    /// The pending run is not flushed.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self) -> fmt::Result {
        let Some(token) = self.last else {
            return Ok(());
        };
        if self.run > 1 {
            write!(self.sink, "{token}({})", self.run)
        } else {
            self.sink.write_char(token)
        }
    }
}

/// Compresses a whole token sequence into a new string.
#[must_use]
pub fn compress(tokens: impl IntoIterator<Item = char>) -> String {
    let mut rle = RunLengthCompressor::new(String::new());
    // Writing into a String is infallible.
    for token in tokens {
        let _ = rle.push(token);
    }
    let _ = rle.flush();
    rle.into_inner()
}

/// Decodes a compressed rendering back into its token sequence.
///
/// Returns `None` if the input is not a well-formed rendering, e.g. an
/// unterminated `(` or a count below two.
#[must_use]
pub fn expand(rendered: &str) -> Option<Vec<char>> {
    let mut tokens = Vec::new();
    let mut chars = rendered.chars().peekable();
    while let Some(token) = chars.next() {
        if token == '(' || token == ')' {
            return None;
        }
        if chars.peek() != Some(&'(') {
            tokens.push(token);
            continue;
        }
        chars.next();
        let mut digits = String::new();
        loop {
            match chars.next()? {
                ')' => break,
                c if c.is_ascii_digit() => digits.push(c),
                _ => return None,
            }
        }
        let count: usize = digits.parse().ok()?;
        if count < 2 {
            return None;
        }
        tokens.extend(std::iter::repeat_n(token, count));
    }
    Some(tokens)
}
