use crate::state::CardId;

/// Base stat block of a unit template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateStats {
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub agi: i32,
    /// Accuracy percentage; the engine substitutes its configured default
    /// when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub acc: Option<i32>,
}

/// Roster or enemy template the encounter is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub stats: TemplateStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub deck: Vec<CardId>,
}

impl UnitTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class_id: impl Into<String>,
        stats: TemplateStats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_id: class_id.into(),
            stats,
            deck: Vec::new(),
        }
    }

    pub fn with_deck<I, C>(mut self, deck: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CardId>,
    {
        self.deck = deck.into_iter().map(Into::into).collect();
        self
    }
}
