//! Word lists backing the text generators.

pub const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carla", "Diego", "Elena", "Felipe", "Gabriela", "Hugo", "Isabel", "Joao",
    "Karina", "Lucas", "Mariana", "Nicolas", "Olivia", "Pedro", "Quentin", "Rafaela", "Sofia",
    "Thiago", "Ursula", "Vitor", "Wanda", "Xavier", "Yasmin", "Zeca", "Amelia", "Bernardo",
    "Cecilia", "Daniel", "Eduarda", "Fernando", "Giovana", "Henrique", "Ines", "Julia",
];

pub const CITIES: &[&str] = &[
    "Lisbon", "Porto", "Recife", "Curitiba", "Salvador", "Manaus", "Belem", "Natal", "Madrid",
    "Valencia", "Lyon", "Marseille", "Hamburg", "Munich", "Vienna", "Prague", "Krakow", "Oslo",
    "Bergen", "Tallinn", "Riga", "Dublin", "Cork", "Glasgow", "Leeds", "Austin", "Denver",
    "Portland", "Halifax", "Quebec", "Osaka", "Sapporo", "Busan", "Perth", "Hobart", "Auckland",
];

pub const WORDS: &[&str] = &[
    "alpha", "amber", "anchor", "apple", "arrow", "aspen", "badge", "bamboo", "beacon", "birch",
    "blossom", "breeze", "bridge", "canyon", "cedar", "cinder", "clover", "comet", "coral", "crane",
    "crystal", "dawn", "delta", "drift", "ember", "falcon", "fern", "flint", "forest", "frost",
    "garnet", "glacier", "harbor", "hazel", "horizon", "island", "ivory", "jade", "juniper",
    "lagoon", "lantern", "maple", "meadow", "mist", "nectar", "oasis", "onyx", "orbit", "pebble",
    "pine", "prairie", "quartz", "quill", "raven", "ridge", "river", "saffron", "shadow", "spruce",
    "summit", "tide", "timber", "topaz", "tundra", "valley", "velvet", "willow", "zephyr",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lexicons_have_no_duplicates_or_blanks() {
        for list in [FIRST_NAMES, CITIES, WORDS] {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len());
            assert!(list.iter().all(|w| !w.trim().is_empty() && !w.contains(' ')));
        }
    }
}
