use crate::error::{Error, Result};

/// A decoded symbol of the concatenated text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// Terminator of the corpus string with this index.
    Sentinel(usize),
    Char(char),
}

/// Maps chars into a `u32` symbol space whose lowest values are reserved for
/// per-string sentinels.
///
/// With `n` sentinels, sentinel `i` is the symbol `i` and a char `c` is the
/// symbol `n + c`. Sentinels therefore sort below every character, are
/// distinct from each other and can never be produced by encoding text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alphabet {
    sentinels: u32,
}

impl Alphabet {
    /// Largest number of sentinels that still leaves room for every char.
    pub const MAX_SENTINELS: usize = (u32::MAX - char::MAX as u32) as usize;

    pub fn new(sentinels: usize) -> Result<Self> {
        if sentinels > Self::MAX_SENTINELS {
            return Err(Error::Capacity {
                strings: sentinels,
                max: Self::MAX_SENTINELS,
            });
        }
        Ok(Alphabet {
            sentinels: sentinels as u32,
        })
    }

    #[inline]
    pub fn sentinels(&self) -> usize {
        self.sentinels as usize
    }

    #[inline]
    pub fn sentinel(&self, string: usize) -> u32 {
        debug_assert!(string < self.sentinels());
        string as u32
    }

    #[inline]
    pub fn encode_char(&self, c: char) -> u32 {
        self.sentinels + c as u32
    }

    /// Encodes `s` without a terminator. The result never contains a sentinel.
    pub fn encode(&self, s: &str) -> Vec<u32> {
        s.chars().map(|c| self.encode_char(c)).collect()
    }

    #[inline]
    pub fn is_sentinel(&self, symbol: u32) -> bool {
        symbol < self.sentinels
    }

    pub fn decode(&self, symbol: u32) -> Option<Symbol> {
        if self.is_sentinel(symbol) {
            Some(Symbol::Sentinel(symbol as usize))
        } else {
            char::from_u32(symbol - self.sentinels).map(Symbol::Char)
        }
    }

    /// Renders symbols for debugging, writing sentinel `i` as `$i`.
    pub fn render(&self, symbols: &[u32]) -> String {
        let mut out = String::with_capacity(symbols.len());
        for &symbol in symbols {
            match self.decode(symbol) {
                Some(Symbol::Char(c)) => out.push(c),
                Some(Symbol::Sentinel(i)) => {
                    out.push('$');
                    out.push_str(&i.to_string());
                }
                None => out.push(char::REPLACEMENT_CHARACTER),
            }
        }
        out
    }
}

/// Joins `strings` into one text, terminating string `i` with sentinel `i`.
///
/// Returns the text and the start offset of every string, followed by the
/// total text length.
pub fn concatenate<S: AsRef<str>>(alphabet: &Alphabet, strings: &[S]) -> (Box<[u32]>, Box<[usize]>) {
    let total: usize = strings.iter().map(|s| s.as_ref().chars().count() + 1).sum();
    let mut text = Vec::with_capacity(total);
    let mut offsets = Vec::with_capacity(strings.len() + 1);

    for (i, s) in strings.iter().enumerate() {
        offsets.push(text.len());
        text.extend(s.as_ref().chars().map(|c| alphabet.encode_char(c)));
        text.push(alphabet.sentinel(i));
    }
    offsets.push(text.len());

    (text.into(), offsets.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_sort_below_chars() {
        let alphabet = Alphabet::new(3).unwrap();
        let lowest = alphabet.encode_char('\0');
        for i in 0..3 {
            assert!(alphabet.sentinel(i) < lowest);
            assert!(alphabet.is_sentinel(alphabet.sentinel(i)));
        }
        assert!(!alphabet.is_sentinel(lowest));
    }

    #[test]
    fn capacity_is_enforced() {
        assert!(Alphabet::new(Alphabet::MAX_SENTINELS).is_ok());
        assert_eq!(
            Alphabet::new(Alphabet::MAX_SENTINELS + 1),
            Err(Error::Capacity {
                strings: Alphabet::MAX_SENTINELS + 1,
                max: Alphabet::MAX_SENTINELS,
            })
        );
    }

    #[test]
    fn highest_char_fits() {
        let alphabet = Alphabet::new(Alphabet::MAX_SENTINELS).unwrap();
        assert_eq!(alphabet.encode_char(char::MAX), u32::MAX);
        assert_eq!(alphabet.decode(u32::MAX), Some(Symbol::Char(char::MAX)));
    }

    #[test]
    fn concatenate_terminates_each_string() {
        let strings = ["ab", "", "☃"];
        let alphabet = Alphabet::new(strings.len()).unwrap();
        let (text, offsets) = concatenate(&alphabet, &strings);

        assert_eq!(&*offsets, &[0, 3, 4, 6]);
        assert_eq!(alphabet.render(&text), "ab$0$1☃$2");
    }
}
