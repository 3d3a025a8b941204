//! HTML entity decoding for server-rendered strings.

/// Longest entity body we try to decode (`&#x10FFFF;` fits).
const MAX_ENTITY_LEN: usize = 10;

/// Decodes the HTML entities WordPress emits in titles and site names.
///
/// Unknown or malformed entities are kept verbatim.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|end| *end > 1 && *end <= MAX_ENTITY_LEN + 1)
            .and_then(|end| decode_one(&tail[1..end]).map(|ch| (ch, end)));

        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes a single entity body (between `&` and `;`).
fn decode_one(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(decode_entities("Budget Report"), "Budget Report");
    }

    #[test]
    fn test_named_entities() {
        assert_eq!(decode_entities("Q&amp;A &lt;draft&gt;"), "Q&A <draft>");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("It&#8217;s"), "It\u{2019}s");
        assert_eq!(decode_entities("&#x41;&#39;"), "A'");
    }

    #[test]
    fn test_malformed_entities_kept() {
        assert_eq!(decode_entities("R&D"), "R&D");
        assert_eq!(decode_entities("a & b; c"), "a & b; c");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }
}
