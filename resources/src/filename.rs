/// Append the extension to `value` when exactly one concrete file format is
/// allowed and the name does not already end with it.
///
/// A wildcard (`*`), several formats, or an empty name leave `value` as is.
pub fn add_extension(value: &str, formats: &[&str]) -> String {
    match formats {
        [ext] if *ext != "*" && !value.is_empty() && !value.ends_with(&format!(".{ext}")) => {
            format!("{value}.{ext}")
        }
        _ => value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::appended("result", &["h5"], "result.h5")]
    #[case::already_there("result.h5", &["h5"], "result.h5")]
    #[case::other_extension("result.txt", &["h5"], "result.txt.h5")]
    #[case::wildcard("result", &["*"], "result")]
    #[case::several("result", &["png", "jpg"], "result")]
    #[case::no_formats("result", &[], "result")]
    #[case::empty("", &["h5"], "")]
    fn extension_rules(#[case] value: &str, #[case] formats: &[&str], #[case] expected: &str) {
        assert_eq!(add_extension(value, formats), expected);
    }
}
