use easy_ext::ext;

pub(crate) mod prelude {
    pub(crate) use super::ErrorExt as _;
    pub(crate) use super::StrExt as _;
}

#[ext(ErrorExt)]
pub(crate) impl<E> E
where
    E: std::error::Error + ?Sized,
{
    fn display_chain(&self) -> display_error_chain::DisplayErrorChain<&Self> {
        display_error_chain::DisplayErrorChain::new(self)
    }
}

#[ext(StrExt)]
pub(crate) impl str {
    /// Truncates the string to at most `max_chars` characters. If the string
    /// is longer than that, the tail is replaced with the `marker`, and the
    /// result is exactly `max_chars` characters long.
    fn truncate_with_marker(&self, max_chars: usize, marker: &str) -> String {
        if self.chars().count() <= max_chars {
            return self.to_owned();
        }

        let keep = max_chars.saturating_sub(marker.chars().count());

        self.chars().take(keep).chain(marker.chars()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{expect, Expect};

    #[track_caller]
    fn assert_truncate(input: &str, max_chars: usize, expected: Expect) {
        expected.assert_eq(&input.truncate_with_marker(max_chars, ".."));
    }

    #[test]
    fn truncation() {
        use assert_truncate as test;

        test("", 5, expect![""]);
        test("abcde", 5, expect!["abcde"]);
        test("abcdef", 5, expect!["abc.."]);
        test("Zürich, Zürich", 9, expect!["Zürich,.."]);
        test("🗺🗺🗺🗺", 3, expect!["🗺.."]);
    }
}
