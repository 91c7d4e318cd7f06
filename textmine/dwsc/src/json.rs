//! Incremental JSON writer.
//!
//! The report is far too large to build in memory, so it is streamed: the
//! writer keeps a stack of open containers and knows, per container,
//! whether the next element needs a comma. The stream is valid JSON at
//! every `end_*` boundary, which is what makes the early-abort path safe.
//!
//! Formatting: objects break onto indented lines, arrays stay inline. The
//! compact mode drops all whitespace.

use std::fmt::Write as _;
use std::io::{self, Write};

enum Container {
    Object { entries: usize, expecting_value: bool },
    Array { items: usize },
}

pub struct JsonWriter<W: Write> {
    out: W,
    pretty: bool,
    stack: Vec<Container>,
    bytes_written: u64,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        JsonWriter {
            out,
            pretty,
            stack: Vec::new(),
            bytes_written: 0,
        }
    }

    /// Bytes emitted so far, including buffered ones.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Open an object, as root or in value position.
    pub fn begin_object(&mut self) -> io::Result<()> {
        self.value_prefix()?;
        self.raw(b"{")?;
        self.stack.push(Container::Object {
            entries: 0,
            expecting_value: false,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> io::Result<()> {
        match self.stack.pop() {
            Some(Container::Object { entries, .. }) => {
                if self.pretty && entries > 0 {
                    self.raw(b"\n")?;
                    self.indent()?;
                }
                self.raw(b"}")
            }
            _ => panic!("json writer: end_object without a matching begin_object"),
        }
    }

    /// Open an array in value position. Arrays render inline.
    pub fn begin_array(&mut self) -> io::Result<()> {
        self.value_prefix()?;
        self.raw(b"[")?;
        self.stack.push(Container::Array { items: 0 });
        Ok(())
    }

    pub fn end_array(&mut self) -> io::Result<()> {
        match self.stack.pop() {
            Some(Container::Array { .. }) => self.raw(b"]"),
            _ => panic!("json writer: end_array without a matching begin_array"),
        }
    }

    /// Write an object key. The next call must produce its value.
    pub fn key(&mut self, name: &str) -> io::Result<()> {
        let needs_comma = match self.stack.last() {
            Some(Container::Object {
                entries,
                expecting_value,
            }) => {
                debug_assert!(!expecting_value, "json writer: key while a value is pending");
                *entries > 0
            }
            _ => panic!("json writer: key used outside of an object"),
        };
        if needs_comma {
            self.raw(b",")?;
        }
        if self.pretty {
            self.raw(b"\n")?;
            self.indent()?;
        }
        self.write_escaped(name)?;
        self.raw(if self.pretty { b": " as &[u8] } else { b":" })?;
        if let Some(Container::Object {
            entries,
            expecting_value,
        }) = self.stack.last_mut()
        {
            *entries += 1;
            *expecting_value = true;
        }
        Ok(())
    }

    pub fn string(&mut self, value: &str) -> io::Result<()> {
        self.value_prefix()?;
        self.write_escaped(value)
    }

    pub fn number(&mut self, value: u64) -> io::Result<()> {
        self.value_prefix()?;
        let digits = value.to_string();
        self.raw(digits.as_bytes())
    }

    pub fn boolean(&mut self, value: bool) -> io::Result<()> {
        self.value_prefix()?;
        self.raw(if value { b"true" as &[u8] } else { b"false" })
    }

    /// Flush and hand the sink back. Panics if containers are still open;
    /// that is a driver bug, not an I/O condition.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        assert!(
            self.stack.is_empty(),
            "json writer: finish with {} unclosed containers",
            self.stack.len()
        );
        self.out.flush()?;
        Ok((self.out, self.bytes_written))
    }

    /// Comma/space handling for a value about to be written.
    fn value_prefix(&mut self) -> io::Result<()> {
        let needs_comma = match self.stack.last_mut() {
            Some(Container::Object { expecting_value, .. }) => {
                debug_assert!(
                    *expecting_value,
                    "json writer: value inside an object must follow a key"
                );
                *expecting_value = false;
                false
            }
            Some(Container::Array { items }) => {
                let needs_comma = *items > 0;
                *items += 1;
                needs_comma
            }
            None => false,
        };
        if needs_comma {
            self.raw(if self.pretty { b", " as &[u8] } else { b"," })?;
        }
        Ok(())
    }

    fn indent(&mut self) -> io::Result<()> {
        for _ in 0..self.stack.len() {
            self.raw(b"\t")?;
        }
        Ok(())
    }

    fn write_escaped(&mut self, value: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(value.len() + 2);
        buf.push('"');
        for c in value.chars() {
            match c {
                '"' => buf.push_str("\\\""),
                '\\' => buf.push_str("\\\\"),
                '\n' => buf.push_str("\\n"),
                '\r' => buf.push_str("\\r"),
                '\t' => buf.push_str("\\t"),
                '\u{08}' => buf.push_str("\\b"),
                '\u{0C}' => buf.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    // Writing into a String cannot fail.
                    let _ = write!(buf, "\\u{:04x}", c as u32);
                }
                c => buf.push(c),
            }
        }
        buf.push('"');
        self.raw(buf.as_bytes())
    }

    fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
// Tests use unwrap() to panic on unexpected state, making failures immediately visible
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pretty(build: impl FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> io::Result<()>) -> String {
        render(true, build)
    }

    fn compact(build: impl FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> io::Result<()>) -> String {
        render(false, build)
    }

    fn render(
        pretty: bool,
        build: impl FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> io::Result<()>,
    ) -> String {
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, pretty);
        build(&mut writer).unwrap();
        let (_, bytes) = writer.finish().unwrap();
        assert_eq!(bytes as usize, out.len());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_object() {
        let text = pretty(|w| {
            w.begin_object()?;
            w.end_object()
        });
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_pretty_nesting_and_commas() {
        let text = pretty(|w| {
            w.begin_object()?;
            w.key("flags")?;
            w.begin_object()?;
            w.key("on")?;
            w.boolean(true)?;
            w.key("off")?;
            w.boolean(false)?;
            w.end_object()?;
            w.key("tokens")?;
            w.begin_array()?;
            w.string("alpha")?;
            w.string("beta")?;
            w.end_array()?;
            w.end_object()
        });
        assert_eq!(
            text,
            "{\n\t\"flags\": {\n\t\t\"on\": true,\n\t\t\"off\": false\n\t},\n\t\"tokens\": [\"alpha\", \"beta\"]\n}"
        );
    }

    #[test]
    fn test_compact_mode() {
        let text = compact(|w| {
            w.begin_object()?;
            w.key("n")?;
            w.number(42)?;
            w.key("list")?;
            w.begin_array()?;
            w.number(1)?;
            w.number(2)?;
            w.end_array()?;
            w.end_object()
        });
        assert_eq!(text, "{\"n\":42,\"list\":[1,2]}");
    }

    #[test]
    fn test_string_escaping() {
        let text = compact(|w| {
            w.begin_object()?;
            w.key("quote\"backslash\\")?;
            w.string("line\nbreak\ttab\u{01}")?;
            w.end_object()
        });
        assert_eq!(
            text,
            "{\"quote\\\"backslash\\\\\":\"line\\nbreak\\ttab\\u0001\"}"
        );
    }

    #[test]
    fn test_output_parses_as_json() {
        for is_pretty in [true, false] {
            let text = render(is_pretty, |w| {
                w.begin_object()?;
                w.key("doc \"1\"")?;
                w.begin_object()?;
                w.key("tokens")?;
                w.begin_array()?;
                w.string("a")?;
                w.string("b\\c")?;
                w.end_array()?;
                w.key("offsets")?;
                w.begin_array()?;
                w.number(0)?;
                w.number(65535)?;
                w.end_array()?;
                w.end_object()?;
                w.end_object()
            });
            let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(parsed["doc \"1\""]["tokens"][1], "b\\c");
            assert_eq!(parsed["doc \"1\""]["offsets"][1], 65535);
        }
    }

    #[test]
    fn test_empty_array_in_object() {
        let text = pretty(|w| {
            w.begin_object()?;
            w.key("empty")?;
            w.begin_array()?;
            w.end_array()?;
            w.end_object()
        });
        assert_eq!(text, "{\n\t\"empty\": []\n}");
    }
}
