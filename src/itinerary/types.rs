use serde::{Deserialize, Serialize};

/// A destination the user chose to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDestination {
    /// Stable identifier; the city code when no canonical id was available
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Travel API location code, used to re-query flights and hotels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_code: Option<String>,
}

impl SavedDestination {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            country: None,
            city: None,
            city_code: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_city_code(mut self, city_code: impl Into<String>) -> Self {
        self.city_code = Some(city_code.into());
        self
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Ordered sequence of saved destinations, unique by id.
///
/// Values handed out by the store are snapshots: they own their data and
/// offer no way to mutate the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Itinerary(Vec<SavedDestination>);

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a sequence, keeping the first entry for each id.
    pub fn from_entries(entries: impl IntoIterator<Item = SavedDestination>) -> Self {
        let mut itinerary = Self::new();
        for entry in entries {
            itinerary.insert(entry);
        }
        itinerary
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SavedDestination> {
        self.0.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|d| d.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&SavedDestination> {
        self.0.iter().find(|d| d.id == id)
    }

    /// First entry saved for a city code
    pub fn find_by_city_code(&self, city_code: &str) -> Option<&SavedDestination> {
        self.0
            .iter()
            .find(|d| d.city_code.as_deref() == Some(city_code))
    }

    pub fn as_slice(&self) -> &[SavedDestination] {
        &self.0
    }

    /// Append unless the id is already present. Returns whether it was added.
    pub(crate) fn insert(&mut self, item: SavedDestination) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.0.push(item);
        true
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|d| d.id != id);
        self.0.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a Itinerary {
    type Item = &'a SavedDestination;
    type IntoIter = std::slice::Iter<'a, SavedDestination>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
