use easy_ext::ext;

#[ext(UrlExt)]
pub(crate) impl url::Url {
    /// Returns a copy of the URL with the given path segments appended to it.
    /// A trailing slash in the base URL doesn't produce an empty segment.
    fn with_segments<T: AsRef<str>>(&self, segments: impl IntoIterator<Item = T>) -> url::Url {
        let mut url = self.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{expect, Expect};

    #[track_caller]
    fn assert_with_segments(base: &str, segments: &[&str], expected: Expect) {
        let base: url::Url = base.parse().unwrap();
        expected.assert_eq(base.with_segments(segments).as_str());
    }

    #[test]
    fn appending_segments() {
        use assert_with_segments as test;

        test(
            "https://mastodon.social",
            &["api", "v1", "statuses"],
            expect!["https://mastodon.social/api/v1/statuses"],
        );
        test(
            "https://mastodon.social/",
            &["api", "v2", "media"],
            expect!["https://mastodon.social/api/v2/media"],
        );
        test(
            "https://example.com/toots/",
            &["api", "v1", "statuses"],
            expect!["https://example.com/toots/api/v1/statuses"],
        );
    }
}
