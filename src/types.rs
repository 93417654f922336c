//! Type-safe configuration types for xml2cli
//!
//! Strategy selection is an enum rather than a string so that every place
//! that renders a subsystem-add matches exhaustively.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How the subsystem-add operation is written into the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum SubsystemAddStrategy {
    /// Emit the add like any other operation.
    #[strum(to_string = "add")]
    Add,
    /// Drop the add entirely; the subsystem is expected to exist.
    #[strum(to_string = "skip")]
    Skip,
    /// Guard the add with a `read-resource` probe.
    #[default]
    #[strum(to_string = "add-if-not-there", serialize = "add_if_not_there")]
    AddIfNotThere,
}

impl SubsystemAddStrategy {
    /// Whether the batch marker has to wait for the first unguarded statement.
    ///
    /// Conditional blocks are not allowed inside a batch, so only this
    /// strategy defers opening it.
    pub fn defers_batch(&self) -> bool {
        matches!(self, Self::AddIfNotThere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_is_add_if_not_there() {
        assert_eq!(SubsystemAddStrategy::default(), SubsystemAddStrategy::AddIfNotThere);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("add".parse::<SubsystemAddStrategy>().unwrap(), SubsystemAddStrategy::Add);
        assert_eq!("SKIP".parse::<SubsystemAddStrategy>().unwrap(), SubsystemAddStrategy::Skip);
        assert_eq!(
            "ADD_IF_NOT_THERE".parse::<SubsystemAddStrategy>().unwrap(),
            SubsystemAddStrategy::AddIfNotThere
        );
        assert!("sometimes".parse::<SubsystemAddStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display_parses_back() {
        for strategy in SubsystemAddStrategy::iter() {
            let parsed: SubsystemAddStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&SubsystemAddStrategy::AddIfNotThere).unwrap();
        assert_eq!(json, "\"add-if-not-there\"");
        let parsed: SubsystemAddStrategy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(parsed, SubsystemAddStrategy::Skip);
    }

    #[test]
    fn test_only_guarded_strategy_defers_batch() {
        assert!(SubsystemAddStrategy::AddIfNotThere.defers_batch());
        assert!(!SubsystemAddStrategy::Add.defers_batch());
        assert!(!SubsystemAddStrategy::Skip.defers_batch());
    }
}
