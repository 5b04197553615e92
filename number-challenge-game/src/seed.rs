//! Reversible share-code scheme over a fixed word list.
//! Code format: <MODE>-<WORD><NN>, e.g., ST-PRIME42, IN-ABACUS07

use crate::state::GameMode;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// Word list for share codes
pub const WORD_LIST: [&str; 48] = [
    "PRIME", "SQUARE", "ROOT", "DOUBLE", "HALF", "DIGIT", "SUM", "PRODUCT", "MODULO", "POWER",
    "FACTOR", "FIBO", "ABACUS", "COUNT", "TALLY", "ZERO", "ONE", "SEVEN", "DOZEN", "SCORE",
    "STREAK", "LEVEL", "TIMER", "CLOCK", "TENTH", "QUICK", "SWIFT", "SPARK", "COMET", "ORBIT",
    "PIXEL", "RETRO", "ARCADE", "COMBO", "BONUS", "LIVES", "HEART", "STAR", "TROPHY", "MEDAL",
    "RULER", "GRAPH", "VECTOR", "MATRIX", "SIGMA", "DELTA", "OMEGA", "INFINI",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x01FF, ((packed >> 9) & 0x7F) as u8)
}

const fn mode_tag(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Standard => "ST",
        GameMode::Infinite => "IN",
    }
}

fn compose_seed(mode: GameMode, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let mut buf = [0u8; 10];
    buf[..6].copy_from_slice(b"NUMCH-");
    buf[6] = if mode.is_infinite() { b'I' } else { b'S' };
    buf[7] = (packed & 0xFF) as u8;
    buf[8] = (packed >> 8) as u8;
    buf[9] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render a seed as a share code. Seeds that did not come from a code map to a
/// nearby word and do not decode back to themselves; see [`share_code_for`].
#[must_use]
pub fn encode_friendly(mode: GameMode, seed: u64) -> String {
    let packed = (seed & 0xFFFF) as u16;
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST
        .get(usize::from(wi) % WORD_LIST.len())
        .copied()
        .unwrap_or("PRIME");
    if nn > 99 {
        nn %= 100;
    }
    format!("{}-{word}{nn:02}", mode_tag(mode))
}

/// Share code for `seed` when decoding it replays the same game.
#[must_use]
pub fn share_code_for(mode: GameMode, seed: u64) -> Option<String> {
    let code = encode_friendly(mode, seed);
    (decode_to_seed(&code) == Some((mode, seed))).then_some(code)
}

#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(GameMode, u64)> {
    let s = code.trim();
    let (m, rest) = s.split_once('-')?;
    let mode = match m.to_ascii_uppercase().as_str() {
        "ST" => GameMode::Standard,
        "IN" => GameMode::Infinite,
        _ => return None,
    };
    if rest.len() < 3 || !rest.is_ascii() {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some((mode, compose_seed(mode, wi, nn)))
}

#[must_use]
pub fn generate_code_from_entropy(mode: GameMode, entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 17) % 100) as u8;
    let seed = compose_seed(mode, wi, nn);
    encode_friendly(mode, seed)
}

/// Parse a share code into `GameMode` and seed
#[must_use]
pub fn parse_share_code(code: &str) -> Option<(GameMode, u64)> {
    decode_to_seed(code)
}
