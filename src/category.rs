//! Static place categories and the tag matcher.

use std::collections::HashMap;

/// An exact `key=value` tag predicate.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TagFilter {
    pub key: &'static str,
    pub value: &'static str,
}

impl TagFilter {
    const fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }

    #[must_use]
    pub fn matches(self, tags: &HashMap<String, String>) -> bool {
        tags.get(self.key).is_some_and(|value| value == self.value)
    }
}

/// A place category with the tag filters that select it.
///
/// Rules need not be mutually exclusive: the matcher takes the first rule in
/// declared order with any matching filter.
#[must_use]
#[derive(Debug)]
pub struct CategoryRule {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub filters: &'static [TagFilter],
}

/// The configured categories, in match order.
pub const CATEGORIES: &[CategoryRule] = &[
    CategoryRule {
        id: "hospitals",
        name: "Hospitals",
        icon: "🏥",
        filters: &[TagFilter::new("amenity", "hospital"), TagFilter::new("amenity", "clinic")],
    },
    CategoryRule {
        id: "landmarks",
        name: "Landmarks",
        icon: "🏛️",
        filters: &[
            TagFilter::new("tourism", "museum"),
            TagFilter::new("tourism", "attraction"),
            TagFilter::new("historic", "monument"),
            TagFilter::new("historic", "memorial"),
        ],
    },
    CategoryRule {
        id: "nature",
        name: "Nature",
        icon: "🌳",
        filters: &[
            TagFilter::new("leisure", "park"),
            TagFilter::new("leisure", "garden"),
            TagFilter::new("natural", "beach"),
            TagFilter::new("natural", "water"),
            TagFilter::new("tourism", "viewpoint"),
        ],
    },
    CategoryRule {
        id: "food",
        name: "Food & Cafes",
        icon: "🍽️",
        filters: &[
            TagFilter::new("amenity", "restaurant"),
            TagFilter::new("amenity", "cafe"),
            TagFilter::new("amenity", "fast_food"),
        ],
    },
    CategoryRule {
        id: "entertainment",
        name: "Entertainment",
        icon: "🎭",
        filters: &[
            TagFilter::new("tourism", "zoo"),
            TagFilter::new("tourism", "aquarium"),
            TagFilter::new("tourism", "theme_park"),
            TagFilter::new("amenity", "theatre"),
            TagFilter::new("amenity", "cinema"),
        ],
    },
    CategoryRule {
        id: "shopping",
        name: "Shopping",
        icon: "🛍️",
        filters: &[
            TagFilter::new("shop", "mall"),
            TagFilter::new("shop", "supermarket"),
            TagFilter::new("amenity", "marketplace"),
        ],
    },
    CategoryRule {
        id: "cultural",
        name: "Cultural",
        icon: "🛕",
        filters: &[
            TagFilter::new("amenity", "place_of_worship"),
            TagFilter::new("tourism", "gallery"),
            TagFilter::new("amenity", "community_centre"),
        ],
    },
    CategoryRule {
        id: "adventure",
        name: "Adventure",
        icon: "🏔️",
        filters: &[
            TagFilter::new("sport", "climbing"),
            TagFilter::new("sport", "skiing"),
            TagFilter::new("leisure", "sports_centre"),
        ],
    },
    CategoryRule {
        id: "scenic",
        name: "Scenic Views",
        icon: "🌅",
        filters: &[
            TagFilter::new("tourism", "viewpoint"),
            TagFilter::new("natural", "peak"),
            TagFilter::new("waterway", "waterfall"),
        ],
    },
];

/// Find a category by its identifier.
#[must_use]
pub fn find(id: &str) -> Option<&'static CategoryRule> {
    CATEGORIES.iter().find(|rule| rule.id == id)
}

/// Match a tag mapping to a category.
///
/// The first rule, in declared order, with any exact `key=value` hit wins.
/// A record that matches nothing falls back to the first configured rule.
/// That fallback is a policy choice, not an error: the composite query only
/// returns records selected by some filter, so in practice the fallback
/// covers records whose selecting filter was shadowed by a broader one.
#[must_use]
pub fn match_category(tags: &HashMap<String, String>) -> &'static CategoryRule {
    CATEGORIES
        .iter()
        .find(|rule| rule.filters.iter().any(|filter| filter.matches(tags)))
        .unwrap_or(&CATEGORIES[0])
}
