use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::cursor::{Cursor, Token};
use crate::errors::VersionError;

bitflags! {
    /// Verdict of a version comparison, and the building block of dependency
    /// constraint masks.
    ///
    /// A comparison of two present versions always yields exactly one of
    /// `LESS`, `EQUAL` or `GREATER`. Constraint handling combines the bits:
    /// `LESS | EQUAL` is the `<=` operator, `ANY` matches every relation,
    /// and `FUZZY` marks a prefix (`~`) match.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Match: u32 {
        const EQUAL = 0b0001;
        const LESS = 0b0010;
        const GREATER = 0b0100;
        const FUZZY = 0b1000;

        /// Matches any relation; the verdict when one operand is absent.
        const ANY = Self::EQUAL.bits() | Self::LESS.bits() | Self::GREATER.bits() | Self::FUZZY.bits();
        /// Pin to an exact package checksum rather than an ordering relation.
        const CHECKSUM = Self::LESS.bits() | Self::GREATER.bits();
    }
}

impl Match {
    /// The relational operator this mask prints as in a dependency spec,
    /// `?` for combinations with no operator syntax.
    pub fn as_operator(self) -> &'static str {
        if self == Match::LESS {
            "<"
        } else if self == Match::LESS | Match::EQUAL {
            "<="
        } else if self == Match::FUZZY || self == Match::EQUAL | Match::FUZZY {
            "~"
        } else if self == Match::EQUAL {
            "="
        } else if self == Match::GREATER | Match::EQUAL {
            ">="
        } else if self == Match::GREATER {
            ">"
        } else if self == Match::CHECKSUM {
            "><"
        } else {
            "?"
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_operator())
    }
}

impl FromStr for Match {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mask = match s {
            "<" => Match::LESS,
            "<=" => Match::LESS | Match::EQUAL,
            "=" => Match::EQUAL,
            ">=" => Match::GREATER | Match::EQUAL,
            ">" => Match::GREATER,
            "~" => Match::EQUAL | Match::FUZZY,
            "><" => Match::CHECKSUM,
            other => return Err(VersionError::UnknownOperator(other.to_string())),
        };
        Ok(mask)
    }
}

/// A handle on an apk version string.
///
/// The version scheme is dotted numeric components, an optional single
/// lowercase letter, an optional `_`-introduced suffix word with an optional
/// number, and an optional `-r<digits>` packaging revision:
/// `1.2.3b_alpha4-r5`.
///
/// Construction performs no validation. A malformed string still takes part
/// in the total order; tokenization simply hits an `invalid` marker early and
/// the comparison rules resolve it like any other structural divergence.
#[derive(Clone, Debug, Default, Eq)]
pub struct Version<'a> {
    version: Cow<'a, str>,
}

impl<'a> Version<'a> {
    /// Create a version handle from a string, borrowed or owned.
    pub fn new<T: Into<Cow<'a, str>>>(version: T) -> Version<'a> {
        Version {
            version: version.into(),
        }
    }

    /// The raw version string.
    pub fn as_str(&self) -> &str {
        &self.version
    }

    /// Whether `self` sorts strictly before `other`.
    pub fn is_less_than(&self, other: &Version<'_>) -> bool {
        compare(Some(self), Some(other)) == Match::LESS
    }
}

impl fmt::Display for Version<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

impl PartialEq for Version<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let verdict = compare_tokens(
            &mut Cursor::new(&self.version),
            &mut Cursor::new(&other.version),
        );
        if verdict == Match::LESS {
            Ordering::Less
        } else if verdict == Match::GREATER {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Compare two versions, either of which may be absent.
///
/// Two absent versions are `EQUAL`; one absent version yields the combined
/// `EQUAL | LESS | GREATER` mask, meaning no ordering constraint can be
/// violated. With both present the result is exactly one of `LESS`, `EQUAL`
/// or `GREATER`.
pub fn compare(a: Option<&Version<'_>>, b: Option<&Version<'_>>) -> Match {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => return Match::EQUAL,
        _ => return Match::EQUAL | Match::LESS | Match::GREATER,
    };

    log::trace!("comparing version {:?} against {:?}", a.as_str(), b.as_str());
    compare_tokens(&mut Cursor::new(a.as_str()), &mut Cursor::new(b.as_str()))
}

/// internal use: walk both token streams in lock-step until they diverge in
/// value or structure
fn compare_tokens(a: &mut Cursor<'_>, b: &mut Cursor<'_>) -> Match {
    let mut at = Token::Digit;
    let mut bt = Token::Digit;
    let mut av = 0i64;
    let mut bv = 0i64;

    while at == bt && !at.is_terminal() && av == bv {
        (at, av) = a.token(at);
        (bt, bv) = b.token(bt);
    }

    // the values of this token differ?
    if av < bv {
        return Match::LESS;
    } else if av > bv {
        return Match::GREATER;
    }

    // both streams terminated the same way?
    if at == bt {
        return Match::EQUAL;
    }

    // Leading components and their values are equal, so the side with
    // version left is greater, unless its pending suffix marks a
    // pre-release, which sorts below its unsuffixed counterpart.
    if at == Token::Suffix {
        let (_, value) = a.token(at);
        if value < 0 {
            return Match::LESS;
        }
    }
    if bt == Token::Suffix {
        let (_, value) = b.token(bt);
        if value < 0 {
            return Match::GREATER;
        }
    }

    // End ranks above every pending token, so the higher rank is the side
    // that ran out of version first.
    if at.rank() > bt.rank() {
        Match::LESS
    } else {
        Match::GREATER
    }
}
