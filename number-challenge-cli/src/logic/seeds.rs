use anyhow::{Result, bail};
use number_challenge_game::{GameMode, generate_code_from_entropy, parse_share_code};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Anything shaped like a share code, whether or not its word is known.
static SHARE_CODE_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(?i)(ST|IN)-[A-Z]+[0-9]{2}$").ok());

/// Seed metadata resolved from a command-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    pub source_mode: Option<GameMode>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            source_mode: None,
        }
    }

    #[must_use]
    pub fn from_share_code(seed: u64, mode: GameMode, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            source_mode: Some(mode),
        }
    }

    /// Fresh seed drawn from `entropy`, expressed as a share code.
    #[must_use]
    pub fn from_entropy(mode: GameMode, entropy: u64) -> Self {
        let code = generate_code_from_entropy(mode, entropy);
        match parse_share_code(&code) {
            Some((mode, seed)) => Self::from_share_code(seed, mode, code),
            None => Self::from_numeric(entropy),
        }
    }
}

/// Resolve one seed token: a literal integer or a share code.
pub fn resolve_seed(token: &str) -> Result<SeedInfo> {
    let token = token.trim();

    if let Ok(value) = token.parse::<i64>() {
        return Ok(SeedInfo::from_numeric(value.unsigned_abs()));
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(SeedInfo::from_numeric(value));
    }

    if SHARE_CODE_SHAPE
        .as_ref()
        .is_some_and(|shape| shape.is_match(token))
    {
        return match parse_share_code(token) {
            Some((mode, seed)) => Ok(SeedInfo::from_share_code(seed, mode, token.to_uppercase())),
            None => bail!("Unknown share code word in {token}"),
        };
    }

    bail!("Unrecognized seed token: {token}");
}

/// Resolve a list of seed tokens, dropping duplicates and defaulting to 1337.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<(u64, Option<GameMode>), usize> = HashMap::new();

    for token in tokens.iter().filter(|t| !t.is_empty()) {
        let info = resolve_seed(token)?;
        let key = (info.seed, info.source_mode);
        if let Some(&existing) = index.get(&key) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.code.is_none()
                && info.code.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(key, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use number_challenge_game::encode_friendly;

    #[test]
    fn resolves_numeric_and_share_code() {
        let raw = vec![
            "42".to_string(),
            "-7".to_string(),
            "in-prime42".to_string(),
        ];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        assert!(seeds.iter().any(|s| {
            s.code.as_deref() == Some("IN-PRIME42") && s.source_mode == Some(GameMode::Infinite)
        }));
    }

    #[test]
    fn duplicates_collapse() {
        let raw = vec!["5".to_string(), "5".to_string(), String::new()];
        assert_eq!(resolve_seed_inputs(&raw).unwrap().len(), 1);
        assert_eq!(resolve_seed_inputs(&[]).unwrap()[0].seed, 1337);
    }

    #[test]
    fn distinguishes_unknown_words_from_garbage() {
        let err = resolve_seed("ST-BANANA12").unwrap_err();
        assert!(err.to_string().contains("Unknown share code word"));
        let err = resolve_seed("hello").unwrap_err();
        assert!(err.to_string().contains("Unrecognized seed token"));
    }

    #[test]
    fn entropy_seed_carries_matching_code() {
        let info = SeedInfo::from_entropy(GameMode::Infinite, 0xABCD_1234);
        let code = info.code.clone().unwrap();
        assert!(code.starts_with("IN-"));
        assert_eq!(info.source_mode, Some(GameMode::Infinite));
        assert_eq!(encode_friendly(GameMode::Infinite, info.seed), code);
    }
}
