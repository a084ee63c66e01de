use serde::{Deserialize, Serialize};
use std::fmt;

/// The three Ayurvedic bio-energies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl Dosha {
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        }
    }

    /// Lowercase key, as used in plan and fallback tables
    pub fn key(&self) -> &'static str {
        match self {
            Dosha::Vata => "vata",
            Dosha::Pitta => "pitta",
            Dosha::Kapha => "kapha",
        }
    }

    /// First dosha named in free text such as "Vata-Pitta dominant"
    pub fn first_mentioned(text: &str) -> Option<Dosha> {
        let lower = text.to_lowercase();
        Dosha::ALL
            .iter()
            .filter_map(|d| lower.find(d.key()).map(|pos| (pos, *d)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, d)| d)
    }
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dosha intensities, each expected in [0, 5]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DoshaScores {
    pub vata: f64,
    pub pitta: f64,
    pub kapha: f64,
}

impl DoshaScores {
    pub fn new(vata: f64, pitta: f64, kapha: f64) -> Self {
        Self { vata, pitta, kapha }
    }

    /// Dominant dosha; ties resolve Vata before Pitta before Kapha
    pub fn dominant(&self) -> Dosha {
        if self.vata >= self.pitta && self.vata >= self.kapha {
            Dosha::Vata
        } else if self.pitta >= self.kapha {
            Dosha::Pitta
        } else {
            Dosha::Kapha
        }
    }

    /// Parse free text like `"Vata: 3, Pitta: 4.5, Kapha: 2"` (case-insensitive).
    ///
    /// The three names must appear in that order, each followed by optional
    /// colons or whitespace and a number.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let (vata, rest) = number_after(&lower, "vata")?;
        let (pitta, rest) = number_after(rest, "pitta")?;
        let (kapha, _) = number_after(rest, "kapha")?;
        Some(Self { vata, pitta, kapha })
    }
}

impl fmt::Display for DoshaScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vata: {}, Pitta: {}, Kapha: {}",
            self.vata, self.pitta, self.kapha
        )
    }
}

/// Find `key` in `hay` followed by a number; returns the number and the
/// remainder of the text after it.
fn number_after<'a>(hay: &'a str, key: &str) -> Option<(f64, &'a str)> {
    let mut search_from = 0;
    while let Some(pos) = hay[search_from..].find(key) {
        let after = &hay[search_from + pos + key.len()..];
        let trimmed = after.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
        let digits_len = trimmed
            .bytes()
            .take_while(|b| b.is_ascii_digit() || *b == b'.')
            .count();
        if digits_len > 0 {
            if let Ok(value) = trimmed[..digits_len].parse::<f64>() {
                return Some((value, &trimmed[digits_len..]));
            }
        }
        search_from += pos + key.len();
    }
    None
}
