//! CSS2.1 selector specificity
//!
//! Scans one selector (never a whole comma group) left to right and
//! counts ids (`a`), classes/attributes/pseudo-classes (`b`) and type
//! names/pseudo-elements (`c`).

/// Selector specificity (a, b, c)
///
/// Ordering is lexicographic over the three counts. [`Specificity::value`]
/// gives the legacy single-integer weight `a*100 + b*10 + c`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// Legacy integer specificity of a selector
pub fn specificity(selector: &str) -> u32 {
    Specificity::of(selector).value()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Expecting a combinator, whitespace or the start of a term
    BeforeTerm,
    /// After the optional type name, reading simple selectors
    InTerm,
    /// Inside `[ ... ]`
    InBracket(usize),
    /// Inside a pseudo-class argument `( ... )`
    InArgs(usize),
}

impl Specificity {
    /// Compute the specificity of a single selector
    pub fn of(selector: &str) -> Self {
        let chars: Vec<char> = selector.chars().collect();
        let mut spec = Specificity::default();
        let mut state = ScanState::BeforeTerm;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match state {
                ScanState::BeforeTerm => {
                    if c.is_whitespace() || matches!(c, '>' | '+' | '~') {
                        i += 1;
                        continue;
                    }
                    state = ScanState::InTerm;
                    if c == '*' {
                        i += 1;
                    } else if is_name_char(c) {
                        i = skip_name(&chars, i);
                        spec.2 += 1;
                    } else if c == '#' {
                        // A term led by an id is scored with an implied type
                        spec.2 += 1;
                    }
                }
                ScanState::InTerm => match c {
                    '#' => {
                        i = skip_name(&chars, i + 1);
                        spec.0 += 1;
                    }
                    '.' => {
                        i = skip_name(&chars, i + 1);
                        spec.1 += 1;
                    }
                    '[' => {
                        i += 1;
                        spec.1 += 1;
                        state = ScanState::InBracket(1);
                    }
                    ':' => {
                        if chars.get(i + 1) == Some(&':') {
                            i = skip_name(&chars, i + 2);
                            spec.2 += 1;
                        } else {
                            i = skip_name(&chars, i + 1);
                            spec.1 += 1;
                        }
                        if chars.get(i) == Some(&'(') {
                            i += 1;
                            state = ScanState::InArgs(1);
                        }
                    }
                    c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                        state = ScanState::BeforeTerm;
                    }
                    _ => i += 1,
                },
                ScanState::InBracket(depth) => {
                    i += 1;
                    state = match c {
                        '[' => ScanState::InBracket(depth + 1),
                        ']' if depth == 1 => ScanState::InTerm,
                        ']' => ScanState::InBracket(depth - 1),
                        _ => state,
                    };
                }
                ScanState::InArgs(depth) => {
                    i += 1;
                    state = match c {
                        '(' => ScanState::InArgs(depth + 1),
                        ')' if depth == 1 => ScanState::InTerm,
                        ')' => ScanState::InArgs(depth - 1),
                        _ => state,
                    };
                }
            }
        }

        spec
    }

    /// Legacy weight `a*100 + b*10 + c`
    ///
    /// Aliases once `b` or `c` reach 10; comparisons use `Ord` instead.
    pub fn value(self) -> u32 {
        self.0 * 100 + self.1 * 10 + self.2
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == '\\'
}

/// Index just past the identifier starting at `i`
fn skip_name(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_name_char(chars[i]) {
        // An escape consumes the following character too
        if chars[i] == '\\' {
            i += 1;
        }
        i += 1;
    }
    i.min(chars.len())
}
