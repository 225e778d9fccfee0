//! IPA symbol to English sound approximation.

/// English approximation of one IPA symbol (one or two characters).
pub fn english_sound(symbol: &str) -> Option<&'static str> {
    let sound = match symbol {
        // Consonants
        "p" => "p",
        "b" => "b",
        "t" => "t",
        "d" => "d",
        "k" => "k",
        "g" => "g",
        "f" => "f",
        "v" => "v",
        "s" => "s",
        "z" => "z",
        "h" => "h",
        "m" => "m",
        "n" => "n",
        "l" => "l",
        "w" => "w",
        "ʃ" => "sh",
        "ʒ" => "zh",
        "tʃ" => "ch",
        "dʒ" => "j",
        "ŋ" => "ng",
        "j" => "y",
        "θ" => "th",
        "ð" => "dh",
        "ɹ" => "r",
        "ʔ" => "'",
        "x" => "kh",
        "ɲ" => "ny",

        // Vowels
        "i" => "ee",
        "ɪ" => "ih",
        "e" => "eh",
        "ɛ" => "e",
        "æ" => "a",
        "ɑ" => "ah",
        "ɒ" => "o",
        "ɔ" => "aw",
        "o" => "oh",
        "ʊ" => "uh",
        "u" => "oo",
        "ʌ" => "u",
        "ə" => "uh",
        "ɜ" => "er",

        // Diphthongs
        "eɪ" => "ay",
        "aɪ" => "ai",
        "aʊ" => "ow",
        "ɔɪ" => "oi",
        "oʊ" => "oh",
        "ɪə" => "eer",

        // Suprasegmentals
        "ˈ" => "'",
        "ˌ" => ",",
        "ː" => ":",

        _ => return None,
    };
    Some(sound)
}

/// Convert an IPA transcription (without slashes) to hyphen-joined sounds.
///
/// A two-character symbol with a mapping wins over its first character.
/// Unmapped symbols pass through as-is.
pub fn ipa_to_english(ipa: &str) -> String {
    let mut sounds: Vec<String> = Vec::new();
    let mut chars = ipa.chars().peekable();

    while let Some(c) = chars.next() {
        let mut symbol = c.to_string();
        if let Some(&next) = chars.peek() {
            let pair = format!("{c}{next}");
            if english_sound(&pair).is_some() {
                symbol = pair;
                chars.next();
            }
        }

        let sound = english_sound(&symbol).map(str::to_string).unwrap_or(symbol);
        sounds.push(sound);
    }

    sounds.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_symbols() {
        assert_eq!(ipa_to_english("hæt"), "h-a-t");
        assert_eq!(ipa_to_english("kæt"), "k-a-t");
    }

    #[test]
    fn two_character_symbols_take_priority() {
        assert_eq!(ipa_to_english("dʒʌmp"), "j-u-m-p");
        assert_eq!(ipa_to_english("tʃɪp"), "ch-ih-p");
        assert_eq!(ipa_to_english("aɪ"), "ai");
    }

    #[test]
    fn stress_and_length_marks() {
        assert_eq!(ipa_to_english("ˈæpəl"), "'-a-p-uh-l");
        assert_eq!(ipa_to_english("siː"), "s-ee-:");
    }

    #[test]
    fn unmapped_symbols_pass_through() {
        assert_eq!(ipa_to_english("qæ"), "q-a");
        assert_eq!(ipa_to_english(""), "");
    }
}
