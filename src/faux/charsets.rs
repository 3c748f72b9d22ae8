use rand::seq::SliceRandom;
use rand::Rng;

use super::StringKind;
use crate::config::SmallRng;

const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PUNCTUATION: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

// Half-open code point ranges.
const LATIN1_RANGES: &[(u32, u32)] = &[(0x00C0, 0x00D6), (0x00D8, 0x00F6), (0x00F8, 0x00FF)];
const CJK_RANGE: (u32, u32) = (0x4E00, 0x9FCD);
const BMP_RANGE: (u32, u32) = (0x0041, 0xFFFE);
const SMP_RANGE: (u32, u32) = (0x0041, 0x2FA20);

pub const HTML_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "b", "big", "blockquote", "cite", "code", "dd", "del",
    "dfn", "div", "dl", "dt", "em", "h1", "h2", "h3", "h4", "h5", "h6", "i", "ins", "kbd", "li",
    "ol", "p", "pre", "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "tt",
    "u", "ul", "var",
];

/// Samples a raw string of `length` characters for `kind`.
pub fn sample(kind: StringKind, length: usize, smp: bool, rng: &mut SmallRng) -> String {
    match kind {
        StringKind::Alpha => from_ascii(ASCII_LETTERS, length, rng),
        StringKind::Alphanumeric => from_ascii(ALPHANUMERIC, length, rng),
        StringKind::Numeric => from_ascii(DIGITS, length, rng),
        StringKind::Punctuation => from_ascii(PUNCTUATION, length, rng),
        StringKind::Latin1 => (0..length).map(|_| latin1_char(rng)).collect(),
        StringKind::Cjk => (0..length)
            .map(|_| code_point(CJK_RANGE, rng).unwrap_or('\u{4E00}'))
            .collect(),
        StringKind::Utf8 => {
            let range = if smp { SMP_RANGE } else { BMP_RANGE };
            (0..length).map(|_| unicode_letter(range, rng)).collect()
        }
        StringKind::Html => {
            let tag = HTML_TAGS.choose(rng).copied().unwrap_or("p");
            let body = from_ascii(ASCII_LETTERS, length, rng);
            format!("<{tag}>{body}</{tag}>")
        }
    }
}

fn from_ascii(alphabet: &[u8], length: usize, rng: &mut SmallRng) -> String {
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

fn latin1_char(rng: &mut SmallRng) -> char {
    let total: u32 = LATIN1_RANGES.iter().map(|(lo, hi)| hi - lo).sum();
    let mut offset = rng.gen_range(0..total);
    for &(lo, hi) in LATIN1_RANGES {
        if offset < hi - lo {
            return char::from_u32(lo + offset).unwrap_or('\u{00C0}');
        }
        offset -= hi - lo;
    }
    '\u{00C0}'
}

fn code_point(range: (u32, u32), rng: &mut SmallRng) -> Option<char> {
    char::from_u32(rng.gen_range(range.0..range.1))
}

// Rejection sampling; letters are dense enough in both planes that this
// terminates after a handful of draws.
fn unicode_letter(range: (u32, u32), rng: &mut SmallRng) -> char {
    loop {
        if let Some(c) = code_point(range, rng) {
            if c.is_alphabetic() {
                return c;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn test_ascii_kinds_stay_in_alphabet() {
        let mut rng = rng();
        let alpha = sample(StringKind::Alpha, 64, true, &mut rng);
        assert!(alpha.chars().all(|c| c.is_ascii_alphabetic()));
        let numeric = sample(StringKind::Numeric, 64, true, &mut rng);
        assert!(numeric.chars().all(|c| c.is_ascii_digit()));
        let punct = sample(StringKind::Punctuation, 64, true, &mut rng);
        assert!(punct.chars().all(|c| c.is_ascii_punctuation()));
        let alnum = sample(StringKind::Alphanumeric, 64, true, &mut rng);
        assert!(alnum.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_unicode_kinds_count_chars() {
        let mut rng = rng();
        for kind in [StringKind::Latin1, StringKind::Cjk, StringKind::Utf8] {
            let value = sample(kind, 17, true, &mut rng);
            assert_eq!(value.chars().count(), 17, "{kind}");
        }
    }

    #[test]
    fn test_latin1_excludes_multiplication_and_division_signs() {
        let mut rng = rng();
        let value = sample(StringKind::Latin1, 500, true, &mut rng);
        assert!(value.chars().all(|c| ('\u{00C0}'..='\u{00FE}').contains(&c)));
        assert!(!value.contains('\u{00D7}'));
        assert!(!value.contains('\u{00F7}'));
    }

    #[test]
    fn test_cjk_range() {
        let mut rng = rng();
        let value = sample(StringKind::Cjk, 200, true, &mut rng);
        assert!(value.chars().all(|c| ('\u{4E00}'..='\u{9FCC}').contains(&c)));
    }

    #[test]
    fn test_utf8_without_smp_stays_in_bmp() {
        let mut rng = rng();
        let value = sample(StringKind::Utf8, 200, false, &mut rng);
        assert!(value.chars().all(|c| (c as u32) < 0x10000 && c.is_alphabetic()));
    }

    #[test]
    fn test_html_wraps_alpha_body() {
        let mut rng = rng();
        let value = sample(StringKind::Html, 12, true, &mut rng);
        let open_end = value.find('>').unwrap();
        let tag = &value[1..open_end];
        assert!(HTML_TAGS.contains(&tag));
        let body = &value[open_end + 1..value.len() - tag.len() - 3];
        assert_eq!(body.len(), 12);
        assert!(value.ends_with(&format!("</{tag}>")));
    }
}
