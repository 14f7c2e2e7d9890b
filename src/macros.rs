/// Compile a regular expression once and hand out a `&'static Regex`.
///
/// Only for pattern literals; an invalid pattern panics on first use.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
