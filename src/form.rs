//! `application/x-www-form-urlencoded` bodies
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped in a form key or value. Space is escaped here and then
/// rewritten as `+`.
const FORM_ESCAPE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encodes key/value pairs in the order given, for example `a=1&b=2`.
pub fn encode_form<I, K, V>(args: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut output = String::new();

    for (key, value) in args {
        if !output.is_empty() {
            output.push('&');
        }

        push_escaped(&mut output, key.as_ref());
        output.push('=');
        push_escaped(&mut output, value.as_ref());
    }

    output
}

fn push_escaped(output: &mut String, component: &str) {
    for piece in percent_encoding::utf8_percent_encode(component, &FORM_ESCAPE_SET) {
        if piece == "%20" {
            output.push('+');
        } else {
            output.push_str(piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pairs() {
        assert_eq!(encode_form([("a", "1"), ("b", "2")]), "a=1&b=2");
        assert_eq!(encode_form([("a", "1")]), "a=1");
        assert_eq!(encode_form(Vec::<(String, String)>::new()), "");
    }

    #[test]
    fn test_encode_reserved() {
        assert_eq!(
            encode_form([("a b", "x&y=z"), ("c", "1+1/2?")]),
            "a+b=x%26y%3Dz&c=1%2B1%2F2%3F"
        );
        assert_eq!(encode_form([("k", "-._~*")]), "k=-._~%2A");
    }

    #[test]
    fn test_encode_utf8() {
        assert_eq!(encode_form([("name", "café")]), "name=caf%C3%A9");
    }
}
