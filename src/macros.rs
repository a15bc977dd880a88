/// Compile a pattern literal once and hand out a `&'static Regex`.
///
/// Only for patterns written in this crate. User queries never go through
/// here; they are escaped and compiled per search in `engine/boundary.rs`.
#[macro_export]
macro_rules! static_regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
