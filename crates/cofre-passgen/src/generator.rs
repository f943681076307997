// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password, passphrase, and PIN generation.
//!
//! All randomness comes from the operating system CSPRNG (`OsRng`).

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Word pool for passphrase generation (EFF short wordlist subset).
pub const WORDLIST: &[&str] = &[
    "acorn", "agile", "alarm", "alpha", "amber", "ankle", "anvil", "apple",
    "arena", "armor", "arrow", "aspen", "atlas", "audio", "avoid", "awake",
    "bacon", "badge", "bagel", "banjo", "barge", "basil", "beach", "bench",
    "birch", "blaze", "bloom", "bluff", "board", "bonus", "brave", "bread",
    "brick", "brook", "brush", "cabin", "cable", "camel", "candy", "cargo",
    "cedar", "chalk", "charm", "chess", "chief", "choir", "cider", "civic",
    "claim", "clash", "cliff", "cloak", "clock", "cloud", "cobra", "cocoa",
    "comet", "coral", "crane", "crate", "creek", "crest", "crisp", "crown",
    "cycle", "daily", "dance", "delta", "denim", "depot", "diner", "disco",
    "dodge", "donut", "draft", "drake", "dream", "drift", "drums", "dusty",
    "eagle", "early", "easel", "ebony", "elbow", "ember", "epoch", "equal",
    "fable", "fancy", "feast", "fence", "ferry", "fiber", "field", "flame",
    "flask", "fleet", "flint", "flora", "flute", "focal", "forge", "forum",
    "frost", "fruit", "gecko", "giant", "gizmo", "glade", "gleam", "globe",
    "glyph", "gnome", "grace", "grain", "grape", "graph", "grove", "guard",
    "guild", "haven", "hazel", "heron", "hiker", "honey", "horse", "hotel",
    "igloo", "image", "inbox", "index", "ingot", "ivory", "jewel", "joust",
    "juice", "jumbo", "kayak", "kebab", "knack", "knoll", "lager", "lance",
    "laser", "latch", "ledge", "lemon", "level", "lilac", "linen", "llama",
    "lodge", "logic", "lunar", "lyric", "macro", "magic", "maple", "marsh",
    "mason", "medal", "melon", "merit", "metal", "meter", "miner", "mocha",
    "model", "money", "moose", "motor", "mound", "mural", "music", "noble",
    "north", "notch", "novel", "nurse", "nylon", "oasis", "ocean", "olive",
    "onset", "opera", "orbit", "organ", "otter", "oxide", "ozone", "panda",
    "panel", "paper", "pearl", "pecan", "pedal", "penny", "perch", "phase",
    "photo", "piano", "pilot", "pixel", "pizza", "plaid", "plank", "plaza",
    "plume", "point", "polar", "power", "prism", "prize", "probe", "proof",
    "pulse", "pupil", "quail", "quake", "query", "quest", "quill", "quota",
    "radar", "radio", "ranch", "raven", "razor", "realm", "rhino", "ridge",
    "river", "roast", "robot", "rogue", "round", "route", "royal", "ruler",
    "saint", "salsa", "satin", "sauna", "scale", "scout", "sheep", "shelf",
    "shore", "sigma", "slate", "sleek", "sloth", "smith", "snare", "solar",
    "sonic", "space", "spark", "spear", "spice", "spine", "spoon", "sport",
    "squad", "stack", "stage", "stair", "stamp", "steam", "steel", "stone",
    "stork", "storm", "story", "straw", "suite", "sunny", "surge", "swirl",
    "sword", "syrup", "table", "talon", "tango", "tempo", "theme", "tiger",
    "timer", "titan", "token", "torch", "tower", "trail", "train", "tribe",
    "trout", "truck", "trunk", "tulip", "tunic", "turbo", "tutor", "tweed",
    "ultra", "uncle", "union", "unity", "urban", "usher", "valve", "vapor",
    "vault", "verse", "vigor", "vinyl", "viola", "viper", "vista", "vivid",
    "vocal", "vogue", "voice", "vowel", "wagon", "waltz", "wheat", "wheel",
    "whirl", "witch", "world", "wrist", "yacht", "yield", "youth", "zebra",
];

/// Character-class switches for [`random_password`].
#[derive(Debug, Clone)]
pub struct PasswordOptions {
    pub length: usize,
    pub include_lowercase: bool,
    pub include_uppercase: bool,
    pub include_digits: bool,
    pub include_symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 20,
            include_lowercase: true,
            include_uppercase: true,
            include_digits: true,
            include_symbols: true,
        }
    }
}

/// Options for [`passphrase`].
#[derive(Debug, Clone)]
pub struct PassphraseOptions {
    pub words: usize,
    pub separator: String,
    /// User-supplied words mixed into the phrase. At least one random
    /// word is always added.
    pub custom_words: Vec<String>,
}

impl Default for PassphraseOptions {
    fn default() -> Self {
        Self {
            words: 5,
            separator: "-".to_string(),
            custom_words: Vec::new(),
        }
    }
}

/// Generate a random password.
///
/// Each enabled character class contributes at least one character, so a
/// 20-character password with symbols enabled actually contains a symbol.
/// The result is shuffled so the guaranteed characters do not cluster at
/// the front. With every class disabled, alphanumerics are used.
pub fn random_password(options: &PasswordOptions) -> String {
    let mut rng = OsRng;
    let mut charset = String::new();
    let mut chars: Vec<char> = Vec::with_capacity(options.length);

    let mut enable = |class: &str| {
        charset.push_str(class);
        if let Some(c) = pick_char(&mut rng, class) {
            chars.push(c);
        }
    };
    if options.include_lowercase {
        enable(LOWERCASE);
    }
    if options.include_uppercase {
        enable(UPPERCASE);
    }
    if options.include_digits {
        enable(DIGITS);
    }
    if options.include_symbols {
        enable(SYMBOLS);
    }
    if charset.is_empty() {
        charset = format!("{LOWERCASE}{UPPERCASE}{DIGITS}");
    }

    chars.truncate(options.length);
    while chars.len() < options.length {
        if let Some(c) = pick_char(&mut rng, &charset) {
            chars.push(c);
        }
    }
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

/// Generate a word passphrase, e.g. `Maple-Quill-Orbit-Vivid-Crane-42!`.
///
/// Custom words are capitalized and mixed in with randomly chosen
/// wordlist words; a trailing number-and-symbol group adds entropy
/// against pure dictionary attacks.
pub fn passphrase(options: &PassphraseOptions) -> String {
    let mut rng = OsRng;

    let mut words: Vec<String> = options
        .custom_words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    let random_count = options.words.saturating_sub(words.len()).max(1);
    for _ in 0..random_count {
        if let Some(word) = WORDLIST.choose(&mut rng) {
            words.push(capitalize(word));
        }
    }
    words.shuffle(&mut rng);

    let number = rng.gen_range(0..100);
    let symbol = pick_char(&mut rng, "!@#$%&*").unwrap_or('!');
    words.push(format!("{number}{symbol}"));

    words.join(&options.separator)
}

/// Generate a numeric PIN of the given length.
pub fn pin(length: usize) -> String {
    let mut rng = OsRng;
    (0..length).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}

fn pick_char(rng: &mut OsRng, charset: &str) -> Option<char> {
    let chars: Vec<char> = charset.chars().collect();
    chars.choose(rng).copied()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
