use std::fmt;

/// Width of the variant postfix range within a domain
const DOMAIN_WIDTH: i32 = 100;

/// Numeric platform error code
///
/// A code is made of a hundreds-rounded domain prefix and a variant postfix,
/// e.g. `1103` is prefix `1100` (authentication) plus postfix `3`.
/// Any integer is accepted: codes outside the four-digit range simply fail
/// to match a known domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(i32);

impl ErrorCode {
    /// Wrap a raw code as received from the platform
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Build a code from a domain prefix and a variant postfix
    pub const fn compose(prefix: i32, postfix: i32) -> Self {
        Self(prefix.wrapping_add(postfix))
    }

    /// The raw integer value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Domain prefix, `(code / 100) * 100` with truncating division
    pub const fn prefix(self) -> i32 {
        (self.0 / DOMAIN_WIDTH) * DOMAIN_WIDTH
    }

    /// Variant postfix, `code - prefix`
    pub const fn postfix(self) -> i32 {
        self.0 - self.prefix()
    }

    /// Split into `(prefix, postfix)`
    pub const fn decompose(self) -> (i32, i32) {
        (self.prefix(), self.postfix())
    }

    /// Whether this is a four-digit code, the only shape the platform issues
    pub const fn is_four_digit(self) -> bool {
        self.0 >= 1000 && self.0 < 10_000
    }
}

impl From<i32> for ErrorCode {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Split a raw code into `(prefix, postfix)`
pub const fn decompose(code: i32) -> (i32, i32) {
    ErrorCode::new(code).decompose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_four_digit_codes() {
        assert_eq!(decompose(1103), (1100, 3));
        assert_eq!(decompose(2103), (2100, 3));
        assert_eq!(decompose(3100), (3100, 0));
        assert_eq!(decompose(1070), (1000, 70));
    }

    #[test]
    fn compose_then_decompose_round_trips_small_postfixes() {
        for prefix in [1000, 1100, 1200, 1300, 2100, 2200, 3000, 3100] {
            for postfix in 0..100 {
                assert_eq!(
                    ErrorCode::compose(prefix, postfix).decompose(),
                    (prefix, postfix)
                );
            }
        }
    }

    #[test]
    fn postfix_of_one_hundred_or_more_does_not_round_trip() {
        // 1100 + 150 lands in the 1200 domain
        assert_eq!(ErrorCode::compose(1100, 150).decompose(), (1200, 50));
    }

    #[test]
    fn out_of_range_codes_are_accepted() {
        assert_eq!(decompose(0), (0, 0));
        assert_eq!(decompose(42), (0, 42));
        assert_eq!(decompose(123_456), (123_400, 56));
        assert_eq!(decompose(-1103), (-1100, -3));
        assert!(!ErrorCode::new(999).is_four_digit());
        assert!(ErrorCode::new(9999).is_four_digit());
        assert!(!ErrorCode::new(10_000).is_four_digit());
    }

    #[test]
    fn extreme_values_do_not_panic() {
        let (prefix, postfix) = decompose(i32::MIN);
        assert_eq!(prefix + postfix, i32::MIN);
        let (prefix, postfix) = decompose(i32::MAX);
        assert_eq!(prefix + postfix, i32::MAX);
    }
}
