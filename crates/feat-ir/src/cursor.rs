//! Position-tracking scanner over a spec string.
//!
//! The type and domain grammars only ever need three things: read a head up
//! to the first parenthesis, take a balanced `( ... )` group, and split a
//! group body on its first top-level delimiter. Depth is tracked on `(`/`)`
//! so a delimiter inside a nested group is never mistaken for the outer one.

/// A scan failed because parentheses do not balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unbalanced {
    /// Byte offset where the imbalance was detected.
    pub at: usize,
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }

    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    /// Consume everything before the first parenthesis of either kind.
    pub fn take_head(&mut self) -> &'a str {
        self.take_while(|c| c != '(' && c != ')')
    }

    /// Expects `(` at the current position and consumes through its matching
    /// `)`, returning the enclosed text.
    pub fn take_group(&mut self) -> Result<&'a str, Unbalanced> {
        let open = self.pos;
        if !self.eat('(') {
            return Err(Unbalanced { at: open });
        }
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&self.src[start..self.pos - 1]);
                    }
                }
                _ => {}
            }
        }
        Err(Unbalanced { at: open })
    }

    /// Offset (relative to the current position) of the first `delim` that is
    /// not inside a parenthesized group.
    pub fn find_top_level(&self, delim: char) -> Result<Option<usize>, Unbalanced> {
        let mut depth = 0usize;
        for (i, c) in self.rest().char_indices() {
            if c == delim && depth == 0 {
                return Ok(Some(i));
            }
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.checked_sub(1).ok_or(Unbalanced { at: self.pos + i })?;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(Unbalanced { at: self.src.len() });
        }
        Ok(None)
    }
}

/// Split `src` around its first top-level `delim`.
pub fn split_top_level(src: &str, delim: char) -> Result<Option<(&str, &str)>, Unbalanced> {
    let cursor = Cursor::new(src);
    Ok(cursor
        .find_top_level(delim)?
        .map(|i| (&src[..i], &src[i + delim.len_utf8()..])))
}
