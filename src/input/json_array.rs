//! src/input/json_array.rs
use crate::error::ParseError;
use crate::input::RecordSource;
use crate::order::OrderRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const BYTE_ORDER_MARK: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Reads files holding one top-level JSON array of orders.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonArraySource;

impl RecordSource for JsonArraySource {
    type Records = JsonArrayRecords<BufReader<File>>;

    fn open(&self, path: &Path) -> Result<Self::Records, ParseError> {
        let file = File::open(path)?;
        JsonArrayRecords::new(BufReader::new(file))
    }
}

/// Streams the elements of a JSON array one at a time.
///
/// Only the bytes of the current element are buffered. The first error ends
/// the sequence.
#[derive(Debug)]
pub struct JsonArrayRecords<R> {
    reader: R,
    index: usize,
    finished: bool,
}

impl<R: BufRead> JsonArrayRecords<R> {
    pub fn new(mut reader: R) -> Result<Self, ParseError> {
        if reader.fill_buf()?.starts_with(&BYTE_ORDER_MARK) {
            reader.consume(BYTE_ORDER_MARK.len());
        }
        let mut records = Self {
            reader,
            index: 0,
            finished: false,
        };
        records.skip_whitespace()?;
        match records.peek()? {
            Some(b'[') => records.reader.consume(1),
            _ => return Err(ParseError::NotAnArray),
        }
        Ok(records)
    }

    fn peek(&mut self) -> Result<Option<u8>, ParseError> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.peek()? {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.reader.consume(1);
        }
        Ok(())
    }

    /// Positions the reader on the next element, or returns `false` once the
    /// closing bracket has been consumed.
    fn advance(&mut self) -> Result<bool, ParseError> {
        self.skip_whitespace()?;
        match self.peek()? {
            Some(b']') => {
                self.reader.consume(1);
                return Ok(false);
            }
            Some(b',') if self.index > 0 => {
                self.reader.consume(1);
                self.skip_whitespace()?;
            }
            Some(byte) if self.index > 0 => {
                return Err(ParseError::Syntax(format!(
                    "expected ',' or ']' after element #{} but found '{}'",
                    self.index,
                    byte as char
                )));
            }
            Some(_) => {}
            None => return Err(unexpected_end()),
        }
        Ok(true)
    }

    /// Copies the bytes of one JSON value, tracking nesting and string escapes
    /// so that separators inside objects or strings are not mistaken for the
    /// end of the element.
    fn read_element(&mut self) -> Result<Vec<u8>, ParseError> {
        let mut element = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        loop {
            let byte = self.peek()?.ok_or_else(unexpected_end)?;

            if in_string {
                self.reader.consume(1);
                element.push(byte);
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                    if depth == 0 {
                        return Ok(element);
                    }
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        self.reader.consume(1);
                        element.push(byte);
                        return Ok(element);
                    }
                }
                b',' | b']' | b'}' if element.is_empty() => {
                    return Err(ParseError::Syntax(format!(
                        "unexpected '{}' where element #{} should start",
                        byte as char,
                        self.index + 1
                    )));
                }
                b',' | b']' | b'}' if depth == 0 => return Ok(element),
                byte if byte.is_ascii_whitespace() && depth == 0 => return Ok(element),
                _ => {}
            }
            self.reader.consume(1);
            element.push(byte);
        }
    }

    fn next_record(&mut self) -> Result<Option<OrderRecord>, ParseError> {
        if !self.advance()? {
            return Ok(None);
        }
        let element = self.read_element()?;
        self.index += 1;
        serde_json::from_slice(&element)
            .map(Some)
            .map_err(|source| ParseError::Deserialize {
                index: self.index,
                source,
            })
    }
}

fn unexpected_end() -> ParseError {
    ParseError::Syntax("unexpected end of input inside array".to_string())
}

impl<R: BufRead> Iterator for JsonArrayRecords<R> {
    type Item = Result<OrderRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
