//! Pseudo-translation: a deterministic transform that makes untranslated or
//! truncated UI text easy to spot.
//!
//! Letters are swapped for accented lookalikes, the text is bracketed and
//! padded so layouts get exercised with longer strings, and `{...}`
//! placeholders and `<...>` markup pass through untouched.

/// Culture code whose generated files carry pseudo-translated values.
pub const PSEUDO_CULTURE: &str = "ja";

const PREFIX: &str = "[ !!! ";
const PAD: &str = " !!!";
const SUFFIX: &str = "]";
const MIN_PAD_COUNT: usize = 2;

const UPPER: [char; 26] = [
    'Å', 'ß', 'C', 'Đ', 'Ē', 'F', 'Ğ', 'Ħ', 'Ĩ', 'Ĵ', 'Ķ', 'Ŀ', 'M', 'Ń', 'Ø', 'P', 'Q', 'Ŗ', 'Ŝ',
    'Ŧ', 'Ů', 'V', 'Ŵ', 'X', 'Ÿ', 'Ż',
];

const LOWER: [char; 26] = [
    'ä', 'þ', 'č', 'đ', 'ę', 'ƒ', 'ģ', 'ĥ', 'į', 'ĵ', 'ĸ', 'ľ', 'm', 'ŉ', 'ő', 'p', 'q', 'ř', 'ş',
    'ŧ', 'ū', 'v', 'ŵ', 'χ', 'y', 'ž',
];

/// Whether `culture` selects pseudo-translated output instead of empty values.
pub fn is_pseudo_culture(culture: &str) -> bool {
    culture.eq_ignore_ascii_case(PSEUDO_CULTURE)
}

fn substitute(c: char) -> char {
    match c {
        'A'..='Z' => UPPER[(c as u8 - b'A') as usize],
        'a'..='z' => LOWER[(c as u8 - b'a') as usize],
        _ => c,
    }
}

/// The length a pseudo-translated string is padded towards.
///
/// Strings under 10 characters grow by 400%, longer ones by 30% (rounded down).
pub fn target_length(original_len: usize) -> usize {
    if original_len < 10 {
        original_len * 4 + original_len
    } else {
        (original_len as f64 * 0.3) as usize + original_len
    }
}

/// How many times the `" !!!"` filler is appended for an input of `original_len` characters.
pub fn pad_count(original_len: usize) -> usize {
    let available = target_length(original_len) as isize - original_len as isize - 2;
    // integer division truncates towards zero, so short inputs land on the minimum
    let count = available / PAD.len() as isize;
    count.max(MIN_PAD_COUNT as isize) as usize
}

/// Pseudo-translates `input`.
///
/// ```
/// use resxkit::pseudo::pseudo_translate;
/// assert_eq!(pseudo_translate("Hi"), "[ !!! Ħį !!! !!!]");
/// ```
pub fn pseudo_translate(input: &str) -> String {
    let original_len = input.chars().count();
    let pads = pad_count(original_len);

    let mut out = String::with_capacity(input.len() * 2 + PREFIX.len() + PAD.len() * pads + 1);
    out.push_str(PREFIX);

    let mut in_placeholder = false;
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '{' => in_placeholder = true,
            '}' => in_placeholder = false,
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ => {}
        }
        if in_placeholder || in_tag {
            out.push(c);
        } else {
            out.push(substitute(c));
        }
    }

    for _ in 0..pads {
        out.push_str(PAD);
    }
    out.push_str(SUFFIX);
    out
}
