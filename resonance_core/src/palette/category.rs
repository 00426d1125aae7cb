use serde::{Deserialize, Serialize};

/// Mood categories the dominant colors are assigned to, in activation order.
///
/// The i-th most frequent color of an image drives the i-th category, so the
/// activation vector handed to the transform always has [`MoodCategory::COUNT`]
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum MoodCategory {
    Serenity = 0,
    Passion = 1,
    Vitality = 2,
    Mystery = 3,
    Radiance = 4,
}

impl MoodCategory {
    /// Total number of categories
    pub const COUNT: usize = 5;

    /// Get all categories in activation order
    pub fn all() -> [MoodCategory; Self::COUNT] {
        [
            MoodCategory::Serenity,
            MoodCategory::Passion,
            MoodCategory::Vitality,
            MoodCategory::Mystery,
            MoodCategory::Radiance,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoodCategory::Serenity => "serenity",
            MoodCategory::Passion => "passion",
            MoodCategory::Vitality => "vitality",
            MoodCategory::Mystery => "mystery",
            MoodCategory::Radiance => "radiance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_activation_order() {
        for (position, category) in MoodCategory::all().into_iter().enumerate() {
            assert_eq!(category.index(), position);
        }
        assert_eq!(MoodCategory::Radiance.label(), "radiance");
    }
}
