use std::collections::HashMap;

use serde::Deserialize;

/// A catalog genre
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Genre names by id, loaded once at start-up and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct GenreCache {
    genres: HashMap<i64, String>,
}

impl GenreCache {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Self {
        Self {
            genres: genres.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    pub fn name(&self, id: i64) -> Option<String> {
        self.genres.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let cache = GenreCache::new(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.name(35).as_deref(), Some("Comedy"));
        assert_eq!(cache.name(99), None);
    }
}
