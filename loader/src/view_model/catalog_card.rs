use crate::catalog::CatalogEntry;

/// One card of the listing grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCard {
    /// Big letter: the uppercased first character of the name
    pub letter:    String,
    /// Name under the letter
    pub name:      String,
    /// Route of the detail view, absent when the entry has no identifier
    pub link:      Option<String>,
    /// Whether the card uses the highlight color
    pub highlight: bool,
}

impl CatalogCard {
    /// Build the card for one listing entry
    pub fn from_entry(entry: &CatalogEntry, highlight: bool) -> Self {
        Self {
            letter: entry
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect::<String>())
                .unwrap_or_default(),
            name: entry.name.clone(),
            link: (!entry.uid.is_empty()).then(|| format!("/character/{}", entry.uid)),
            highlight,
        }
    }

    /// Build the whole grid, highlighting every other card starting with the first
    pub fn deck(entries: &[CatalogEntry]) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self::from_entry(entry, index % 2 == 0))
            .collect()
    }
}
