use crate::error::ConverterError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of data extracted from an acquisition folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionType {
    /// Spectra recorded for each analysed object
    Globals,
    /// Spectra recorded on reference standards
    Standards,
    /// List-mode event files
    Lst,
}

impl ExtractionType {
    pub const ALL: [ExtractionType; 3] = [
        ExtractionType::Globals,
        ExtractionType::Standards,
        ExtractionType::Lst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionType::Globals => "globals",
            ExtractionType::Standards => "standards",
            ExtractionType::Lst => "lst",
        }
    }

    fn bit(self) -> u8 {
        match self {
            ExtractionType::Globals => 0b001,
            ExtractionType::Standards => 0b010,
            ExtractionType::Lst => 0b100,
        }
    }
}

impl fmt::Display for ExtractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionType {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "globals" => Ok(ExtractionType::Globals),
            "standards" => Ok(ExtractionType::Standards),
            "lst" => Ok(ExtractionType::Lst),
            _ => Err(ConverterError::UnknownExtractionType {
                name: s.to_string(),
            }),
        }
    }
}

/// Set of requested extraction kinds, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExtractionTypes(u8);

impl ExtractionTypes {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        ExtractionType::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, kind: ExtractionType) {
        self.0 |= kind.bit();
    }

    pub fn with(mut self, kind: ExtractionType) -> Self {
        self.insert(kind);
        self
    }

    pub fn contains(&self, kind: ExtractionType) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn intersection(&self, other: &ExtractionTypes) -> ExtractionTypes {
        Self(self.0 & other.0)
    }

    pub fn intersects(&self, other: &ExtractionTypes) -> bool {
        !self.intersection(other).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ExtractionType> + '_ {
        ExtractionType::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|kind| kind.as_str()).collect()
    }
}

impl FromIterator<ExtractionType> for ExtractionTypes {
    fn from_iter<I: IntoIterator<Item = ExtractionType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl<'a> FromIterator<&'a ExtractionType> for ExtractionTypes {
    fn from_iter<I: IntoIterator<Item = &'a ExtractionType>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl fmt::Display for ExtractionTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

impl Serialize for ExtractionTypes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_parsing() {
        assert_eq!("LST".parse::<ExtractionType>().unwrap(), ExtractionType::Lst);
        assert_eq!("Globals".parse::<ExtractionType>().unwrap(), ExtractionType::Globals);
        assert_eq!("standards".parse::<ExtractionType>().unwrap(), ExtractionType::Standards);
        assert!(matches!(
            "spectra".parse::<ExtractionType>(),
            Err(ConverterError::UnknownExtractionType { .. })
        ));
    }

    #[test]
    fn test_set_membership() {
        let set: ExtractionTypes = [ExtractionType::Globals, ExtractionType::Lst].iter().collect();
        assert!(set.contains(ExtractionType::Globals));
        assert!(!set.contains(ExtractionType::Standards));
        assert!(set.contains(ExtractionType::Lst));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_intersection() {
        let spectra = ExtractionTypes::empty()
            .with(ExtractionType::Globals)
            .with(ExtractionType::Standards);
        let lst_only = ExtractionTypes::empty().with(ExtractionType::Lst);

        assert!(!lst_only.intersects(&spectra));
        assert!(ExtractionTypes::all().intersects(&spectra));
        assert_eq!(ExtractionTypes::all().intersection(&lst_only), lst_only);
        assert!(ExtractionTypes::empty().intersection(&spectra).is_empty());
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let set: ExtractionTypes = [ExtractionType::Lst, ExtractionType::Globals].iter().collect();
        let kinds: Vec<_> = set.iter().collect();
        assert_eq!(kinds, vec![ExtractionType::Globals, ExtractionType::Lst]);
        assert_eq!(set.to_string(), "globals, lst");
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: ExtractionTypes = [ExtractionType::Lst, ExtractionType::Lst].iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_serializes_as_names() {
        let json = serde_json::to_string(&ExtractionTypes::all()).unwrap();
        assert_eq!(json, r#"["globals","standards","lst"]"#);
    }
}
