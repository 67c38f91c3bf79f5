#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr $(,)?) => {{
        let haystack = &$haystack;
        let needle = &$needle;
        if !haystack.contains(&needle[..]) {
            panic!(
                "expected string to contain {:?}\n  actual: {:?}",
                needle, haystack
            );
        }
    }};
}
