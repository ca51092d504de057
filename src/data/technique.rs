//! Technique: the closed set of compared methods and their visual styling.

use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};

/// One of the dimensionality-reduction techniques whose metric curves are compared.
///
/// The set is closed: every dataset file stores one array per technique under
/// [`Technique::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technique {
    #[serde(rename = "MDS")]
    Mds,
    #[serde(rename = "TSNE")]
    Tsne,
    #[serde(rename = "RANDOM")]
    Random,
}

impl Technique {
    /// All techniques in enumeration (drawing) order.
    pub const ALL: [Technique; 3] = [Technique::Mds, Technique::Tsne, Technique::Random];

    /// Key of this technique's value array in the data file.
    pub fn key(self) -> &'static str {
        match self {
            Technique::Mds => "MDS",
            Technique::Tsne => "TSNE",
            Technique::Random => "RANDOM",
        }
    }

    /// Label shown in legends and toggles.
    pub fn label(self) -> &'static str {
        self.key()
    }

    /// Position in [`Technique::ALL`].
    pub fn index(self) -> usize {
        match self {
            Technique::Mds => 0,
            Technique::Tsne => 1,
            Technique::Random => 2,
        }
    }

    /// Stable display color.
    pub fn color(self) -> Color32 {
        match self {
            Technique::Mds => Color32::from_rgb(0xA4, 0x00, 0x00),
            Technique::Tsne => Color32::from_rgb(0x16, 0x31, 0x7D),
            Technique::Random => Color32::from_rgb(0x00, 0x7E, 0x2F),
        }
    }

    pub fn look(self) -> TechniqueLook {
        TechniqueLook {
            color: self.color(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Technique {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Technique::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown technique '{}'", s))
    }
}

/// Visual presentation of a technique's curve and minimum marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechniqueLook {
    pub color: Color32,
    pub width: f32,
    pub marker_radius: f32,
}

impl Default for TechniqueLook {
    fn default() -> Self {
        Self {
            color: Color32::GRAY,
            width: 1.5,
            marker_radius: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_distinct() {
        let c: Vec<Color32> = Technique::ALL.iter().map(|t| t.color()).collect();
        assert_ne!(c[0], c[1]);
        assert_ne!(c[1], c[2]);
        assert_ne!(c[0], c[2]);
    }

    #[test]
    fn index_matches_enumeration_order() {
        for (i, t) in Technique::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("tsne".parse::<Technique>(), Ok(Technique::Tsne));
        assert_eq!(" RANDOM ".parse::<Technique>(), Ok(Technique::Random));
        assert!("umap".parse::<Technique>().is_err());
    }
}
