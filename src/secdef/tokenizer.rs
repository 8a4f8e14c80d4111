//! Record Tokenizer
//!
//! Splits one secdef record into its fields on a single delimiter byte.
//! Fields borrow from the record; nothing is copied or normalized.

use memchr::memchr;

/// One delimiter-separated token of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    raw: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(raw: &'a str) -> Self {
        Field { raw }
    }

    /// The token exactly as it appeared in the record
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Split on the first `=` into (tag, value). `None` for flag tokens.
    pub fn split(&self) -> Option<(&'a str, &'a str)> {
        self.raw.split_once('=')
    }

    pub fn tag(&self) -> Option<&'a str> {
        self.split().map(|(tag, _)| tag)
    }

    pub fn value(&self) -> Option<&'a str> {
        self.split().map(|(_, value)| value)
    }

    /// True if the token has no `=` and can only be matched as a whole
    pub fn is_flag(&self) -> bool {
        !self.raw.contains('=')
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Iterator over the fields of one record
///
/// Behaves like `str::split` on the delimiter: adjacent delimiters and a
/// trailing delimiter produce empty fields.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    line: &'a str,
    /// `None` when the byte cannot split UTF-8 text on a char boundary
    delimiter: Option<u8>,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Fields<'a> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rest = &self.line.as_bytes()[self.pos..];
        match self.delimiter.and_then(|d| memchr(d, rest)) {
            Some(offset) => {
                let start = self.pos;
                self.pos += offset + 1;
                Some(Field::new(&self.line[start..start + offset]))
            }
            None => {
                self.done = true;
                Some(Field::new(&self.line[self.pos..]))
            }
        }
    }
}

/// Tokenize a record on `delimiter`
///
/// Only an ASCII byte can split text; any other byte yields the whole
/// record as a single field.
pub fn tokenize(line: &str, delimiter: u8) -> Fields<'_> {
    Fields {
        line,
        delimiter: delimiter.is_ascii().then_some(delimiter),
        pos: 0,
        done: false,
    }
}

/// Drop a trailing `\n` or `\r\n`
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secdef::config::SOH;

    fn raw_fields(line: &str, delimiter: u8) -> Vec<&str> {
        tokenize(line, delimiter).map(|f| f.raw()).collect()
    }

    #[test]
    fn test_splits_on_soh() {
        let line = "35=d\x01167=FUT\x0155=GEH9";
        assert_eq!(raw_fields(line, SOH), vec!["35=d", "167=FUT", "55=GEH9"]);
    }

    #[test]
    fn test_matches_str_split_on_edges() {
        for line in ["", "\x01", "a\x01\x01b", "\x01a=1\x01", "plain"] {
            let expected: Vec<&str> = line.split('\x01').collect();
            assert_eq!(raw_fields(line, SOH), expected, "line {:?}", line);
        }
    }

    #[test]
    fn test_split_uses_first_equals() {
        let field = Field::new("9779=a=b");
        assert_eq!(field.split(), Some(("9779", "a=b")));
        assert_eq!(field.tag(), Some("9779"));
        assert_eq!(field.value(), Some("a=b"));
    }

    #[test]
    fn test_flag_token_has_no_tag() {
        let field = Field::new("GE");
        assert!(field.is_flag());
        assert_eq!(field.tag(), None);
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_empty_value_is_not_flag() {
        let field = Field::new("462=");
        assert!(!field.is_flag());
        assert_eq!(field.split(), Some(("462", "")));
    }

    #[test]
    fn test_no_normalization() {
        let fields = raw_fields(" 167=fut \x01167=FUT", SOH);
        assert_eq!(fields, vec![" 167=fut ", "167=FUT"]);
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(raw_fields("167=FUT|55=GEH9", b'|'), vec!["167=FUT", "55=GEH9"]);
    }

    #[test]
    fn test_non_ascii_delimiter_does_not_split() {
        // 0xC3 is the lead byte of 'é'
        assert_eq!(raw_fields("55=é", 0xC3), vec!["55=é"]);
        assert_eq!(raw_fields("55=é\x01200=201903", 0xC3), vec!["55=é\x01200=201903"]);
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("167=FUT\x01\r\n"), "167=FUT\x01");
        assert_eq!(strip_terminator("167=FUT\n"), "167=FUT");
        assert_eq!(strip_terminator("167=FUT"), "167=FUT");
    }
}
