use base::{
    error::{ParseError, ParseErrorKind},
    math::to_radians,
};

/// Whitespace separated tokens of a text file with their line numbers.
/// Everything from a `;` to the end of the line is a comment.
pub(crate) struct Tokens<'a> {
    tokens: Vec<(u32, &'a str)>,
    pos: usize,
    n_lines: u32,
}

impl<'a> Tokens<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut n_lines = 0;
        for (i, line) in content.lines().enumerate() {
            n_lines = i as u32 + 1;
            let line = match line.find(';') {
                Some(comment) => &line[..comment],
                None => line,
            };
            tokens.extend(line.split_whitespace().map(|token| (n_lines, token)));
        }
        Self {
            tokens,
            pos: 0,
            n_lines,
        }
    }

    /// Line of the next token, or of the last line once exhausted.
    pub fn line(&self) -> u32 {
        match self.tokens.get(self.pos) {
            Some((line, _)) => *line,
            None => self.n_lines,
        }
    }

    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        // Report the token just consumed when there is one.
        let line = match self.pos.checked_sub(1).and_then(|p| self.tokens.get(p)) {
            Some((line, _)) => *line,
            None => self.line(),
        };
        ParseError::new(line, kind)
    }

    pub fn peek(&self) -> Option<&'a str> { self.tokens.get(self.pos).map(|(_, t)| *t) }

    pub fn next(&mut self) -> Result<&'a str, ParseError> {
        match self.tokens.get(self.pos) {
            Some((_, token)) => {
                self.pos += 1;
                Ok(*token)
            }
            None => Err(ParseError::new(self.n_lines, ParseErrorKind::UnexpectedEof)),
        }
    }

    pub fn expect(&mut self, keyword: &'static str) -> Result<(), ParseError> {
        let token = self.next()?;
        if token.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::UnexpectedToken {
                expected: keyword,
                found: token.to_string(),
            }))
        }
    }

    pub fn next_f32(&mut self) -> Result<f32, ParseError> {
        let token = self.next()?;
        match token.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.error(ParseErrorKind::ParseFloat(token.to_string()))),
        }
    }

    pub fn next_usize(&mut self) -> Result<usize, ParseError> {
        let token = self.next()?;
        token
            .parse::<usize>()
            .map_err(|_| self.error(ParseErrorKind::ParseInt(token.to_string())))
    }

    /// Reads `n` values into `out`. Storage grows with the values actually
    /// read, so a bogus count fails at the end of the file.
    pub fn next_values(&mut self, n: usize, out: &mut Vec<f32>) -> Result<(), ParseError> {
        for _ in 0..n {
            out.push(self.next_f32()?);
        }
        Ok(())
    }

    /// Reads a count followed by that many angles in degrees, returned in
    /// radians.
    pub fn next_angles(&mut self) -> Result<Box<[f32]>, ParseError> {
        let n = self.next_usize()?;
        let mut degrees = Vec::new();
        self.next_values(n, &mut degrees)?;
        Ok(to_radians(&degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments() {
        let mut tokens = Tokens::new(";; header\n\nsigma 2 ; trailing\n 0 90\n");
        assert_eq!(tokens.next().unwrap(), "sigma");
        assert_eq!(tokens.line(), 3);
        let angles = tokens.next_angles().unwrap();
        assert_eq!(angles.len(), 2);
        approx::assert_relative_eq!(angles[1], std::f32::consts::FRAC_PI_2);
        assert!(tokens.peek().is_none());
        assert_eq!(
            tokens.next().unwrap_err(),
            ParseError::new(4, ParseErrorKind::UnexpectedEof)
        );
    }

    #[test]
    fn reports_line_of_bad_token() {
        let mut tokens = Tokens::new("def\n 1.0\n x\n");
        tokens.expect("def").unwrap();
        tokens.next_f32().unwrap();
        let err = tokens.next_f32().unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::ParseFloat("x".into()));
        let mut tokens = Tokens::new("enddef");
        assert!(tokens.expect("def").is_err());
    }
}
