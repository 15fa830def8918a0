use crate::orientation::Orientation;

/// Localized labels for each orientation
#[derive(Debug, Clone)]
pub struct OrientationLabels {
    pub north: &'static str,
    pub south: &'static str,
    pub east: &'static str,
    pub west: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

impl OrientationLabels {
    pub fn label(&self, orientation: Orientation) -> &'static str {
        match orientation {
            Orientation::North => self.north,
            Orientation::South => self.south,
            Orientation::East => self.east,
            Orientation::West => self.west,
            Orientation::Up => self.up,
            Orientation::Down => self.down,
        }
    }
}

/// All localized strings the directions engine needs for a locale
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    /// Unit appended to rendered distances (e.g., "m")
    pub distance_unit: &'static str,

    pub orientation_labels: OrientationLabels,

    /// Step sentence when the connection has no landmark
    /// Placeholders: {distance}, {unit}, {orientation}, {destination}
    pub direction_step: &'static str,

    /// Step sentence when the connection has a landmark
    /// Placeholders: {distance}, {unit}, {orientation}, {landmark}, {destination}
    pub direction_step_with_landmark: &'static str,
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    distance_unit: "m",
    orientation_labels: OrientationLabels {
        north: "north",
        south: "south",
        east: "east",
        west: "west",
        up: "up",
        down: "down",
    },
    direction_step: "Walk {distance} {unit} {orientation} to reach {destination}.",
    direction_step_with_landmark:
        "Walk {distance} {unit} {orientation}, passing {landmark}, to reach {destination}.",
};

// ==================== Hebrew Strings ====================

pub const HEBREW_STRINGS: LocaleStrings = LocaleStrings {
    distance_unit: "מ'",
    orientation_labels: OrientationLabels {
        north: "צפון",
        south: "דרום",
        east: "מזרח",
        west: "מערב",
        up: "למעלה",
        down: "למטה",
    },
    direction_step: "צעדו {distance} {unit} לכיוון {orientation} כדי להגיע אל {destination}.",
    direction_step_with_landmark:
        "צעדו {distance} {unit} לכיוון {orientation}, חלפו ליד {landmark}, כדי להגיע אל {destination}.",
};

// ==================== Spanish Strings ====================

pub const SPANISH_STRINGS: LocaleStrings = LocaleStrings {
    distance_unit: "m",
    orientation_labels: OrientationLabels {
        north: "norte",
        south: "sur",
        east: "este",
        west: "oeste",
        up: "arriba",
        down: "abajo",
    },
    direction_step: "Camina {distance} {unit} hacia el {orientation} para llegar a {destination}.",
    direction_step_with_landmark:
        "Camina {distance} {unit} hacia el {orientation}, pasando por {landmark}, para llegar a {destination}.",
};

// ==================== French Strings ====================

pub const FRENCH_STRINGS: LocaleStrings = LocaleStrings {
    distance_unit: "m",
    orientation_labels: OrientationLabels {
        north: "nord",
        south: "sud",
        east: "est",
        west: "ouest",
        up: "haut",
        down: "bas",
    },
    direction_step: "Marchez {distance} {unit} vers le {orientation} pour atteindre {destination}.",
    direction_step_with_landmark:
        "Marchez {distance} {unit} vers le {orientation}, en passant par {landmark}, pour atteindre {destination}.",
};

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&LocaleStrings; 4] = [
        &ENGLISH_STRINGS,
        &HEBREW_STRINGS,
        &SPANISH_STRINGS,
        &FRENCH_STRINGS,
    ];

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_plain_templates_have_placeholders() {
        for strings in ALL {
            for placeholder in ["{distance}", "{unit}", "{orientation}", "{destination}"] {
                assert!(
                    strings.direction_step.contains(placeholder),
                    "missing {} in {}",
                    placeholder,
                    strings.direction_step
                );
            }
            assert!(!strings.direction_step.contains("{landmark}"));
        }
    }

    #[test]
    fn test_landmark_templates_have_placeholders() {
        for strings in ALL {
            for placeholder in [
                "{distance}",
                "{unit}",
                "{orientation}",
                "{landmark}",
                "{destination}",
            ] {
                assert!(strings.direction_step_with_landmark.contains(placeholder));
            }
        }
    }

    // ==================== Label Tests ====================

    #[test]
    fn test_every_orientation_has_a_label() {
        for strings in ALL {
            for orientation in Orientation::ALL {
                assert!(!strings.orientation_labels.label(orientation).is_empty());
            }
            assert!(!strings.distance_unit.is_empty());
        }
    }

    #[test]
    fn test_english_labels_match_orientation_names() {
        for orientation in Orientation::ALL {
            assert_eq!(
                ENGLISH_STRINGS.orientation_labels.label(orientation),
                orientation.as_str()
            );
        }
    }
}
