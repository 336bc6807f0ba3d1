//! Field rules: how each field of a generated record is synthesized.
//!
//! A record schema is a plain table of [`FieldSpec`]s. Each entry names a
//! record field and carries the [`FieldRule`] used to fill it, so changing a
//! numeric range or a collection size is a one-line table edit.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::lexicon::{CITIES, FIRST_NAMES, WORDS};
use super::GeneratorError;

/// Cardinality of a generated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// Exactly `n` elements.
    Fixed(usize),
    /// Uniformly sampled from `min..=max`.
    Range { min: usize, max: usize },
}

impl SizeRule {
    fn sample<R: Rng + ?Sized>(&self, field: &str, rng: &mut R) -> Result<usize, GeneratorError> {
        match *self {
            SizeRule::Fixed(n) => Ok(n),
            SizeRule::Range { min, max } if min <= max => Ok(rng.random_range(min..=max)),
            SizeRule::Range { min, max } => Err(GeneratorError::InvalidDirective {
                field: field.to_string(),
                reason: format!("size range {min}..={max} is empty"),
            }),
        }
    }

    /// Whether `len` satisfies this rule.
    #[must_use]
    pub fn contains(&self, len: usize) -> bool {
        match *self {
            SizeRule::Fixed(n) => len == n,
            SizeRule::Range { min, max } => (min..=max).contains(&len),
        }
    }
}

/// The closed set of generator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    FirstName,
    /// Capitalized sentence of exactly `words` words ending with a period.
    Sentence { words: usize },
    City,
    /// Decimal string of an integer sampled from `min..=max`.
    NumberString { min: i64, max: i64 },
    /// Map of distinct lexicon words to random integers.
    StringIntMap { size: SizeRule },
    /// List of lexicon words.
    StringList { size: SizeRule },
    /// Never populated.
    Skip,
    /// Generation instant, optionally rendered with a chrono format string.
    Timestamp { format: Option<&'static str> },
}

/// One row of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, rule: FieldRule) -> Self {
        Self { name, rule }
    }
}

/// Schema of the payload returned by `GET /`.
pub const SYNTHETIC_RECORD_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("name", FieldRule::FirstName),
    FieldSpec::new("sentence", FieldRule::Sentence { words: 3 }),
    FieldSpec::new("city", FieldRule::City),
    FieldSpec::new("number", FieldRule::NumberString { min: 1, max: 10 }),
    FieldSpec::new(
        "map",
        FieldRule::StringIntMap {
            size: SizeRule::Fixed(2),
        },
    ),
    FieldSpec::new(
        "array",
        FieldRule::StringList {
            size: SizeRule::Fixed(2),
        },
    ),
    FieldSpec::new(
        "array_range",
        FieldRule::StringList {
            size: SizeRule::Range { min: 2, max: 6 },
        },
    ),
    FieldSpec::new("skip", FieldRule::Skip),
    FieldSpec::new("created", FieldRule::Timestamp { format: None }),
];

/// A generated value before it is placed into a typed record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    IntMap(BTreeMap<String, i32>),
    List(Vec<String>),
    Timestamp(DateTime<Utc>),
    Null,
}

impl FieldValue {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::IntMap(_) => "map",
            FieldValue::List(_) => "list",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Null => "null",
        }
    }
}

fn pick<R: Rng + ?Sized>(
    field: &str,
    list: &'static [&'static str],
    rng: &mut R,
) -> Result<&'static str, GeneratorError> {
    list.choose(rng)
        .copied()
        .ok_or_else(|| GeneratorError::InvalidDirective {
            field: field.to_string(),
            reason: "empty lexicon".to_string(),
        })
}

impl FieldRule {
    /// Produce one value for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidDirective`] when the rule's parameters
    /// cannot be satisfied.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        field: &str,
        rng: &mut R,
    ) -> Result<FieldValue, GeneratorError> {
        let invalid = |reason: String| GeneratorError::InvalidDirective {
            field: field.to_string(),
            reason,
        };

        match *self {
            FieldRule::FirstName => Ok(FieldValue::Text(pick(field, FIRST_NAMES, rng)?.to_string())),
            FieldRule::City => Ok(FieldValue::Text(pick(field, CITIES, rng)?.to_string())),
            FieldRule::Sentence { words } => {
                if words == 0 {
                    return Err(invalid("sentence needs at least one word".to_string()));
                }
                let mut parts = Vec::with_capacity(words);
                for _ in 0..words {
                    parts.push(pick(field, WORDS, rng)?);
                }
                let mut sentence = parts.join(" ");
                if let Some(first) = sentence.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                sentence.push('.');
                Ok(FieldValue::Text(sentence))
            }
            FieldRule::NumberString { min, max } => {
                if min > max {
                    return Err(invalid(format!("number range {min}..={max} is empty")));
                }
                Ok(FieldValue::Text(rng.random_range(min..=max).to_string()))
            }
            FieldRule::StringIntMap { size } => {
                let len = size.sample(field, rng)?;
                if len > WORDS.len() {
                    return Err(invalid(format!(
                        "map of {len} distinct keys exceeds lexicon of {}",
                        WORDS.len()
                    )));
                }
                let keys: Vec<&str> = WORDS.choose_multiple(rng, len).copied().collect();
                let map = keys
                    .into_iter()
                    .map(|k| (k.to_string(), rng.random::<i32>()))
                    .collect();
                Ok(FieldValue::IntMap(map))
            }
            FieldRule::StringList { size } => {
                let len = size.sample(field, rng)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(pick(field, WORDS, rng)?.to_string());
                }
                Ok(FieldValue::List(items))
            }
            FieldRule::Skip => Ok(FieldValue::Null),
            FieldRule::Timestamp { format } => {
                let now = Utc::now();
                match format {
                    None => Ok(FieldValue::Timestamp(now)),
                    Some(fmt) => {
                        use std::fmt::Write;
                        let mut rendered = String::new();
                        write!(rendered, "{}", now.format(fmt))
                            .map_err(|_| invalid(format!("bad timestamp format {fmt:?}")))?;
                        Ok(FieldValue::Text(rendered))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_sentence_has_requested_word_count() {
        let mut r = rng();
        for words in 1..6 {
            let FieldValue::Text(s) = FieldRule::Sentence { words }.generate("s", &mut r).unwrap()
            else {
                panic!("expected text");
            };
            assert_eq!(s.split_whitespace().count(), words);
            assert!(s.ends_with('.'));
            assert!(s.chars().next().unwrap().is_ascii_uppercase());
        }
    }

    #[test]
    fn test_number_string_stays_in_range() {
        let mut r = rng();
        let rule = FieldRule::NumberString { min: 1, max: 10 };
        for _ in 0..500 {
            let FieldValue::Text(s) = rule.generate("n", &mut r).unwrap() else {
                panic!("expected text");
            };
            let n: i64 = s.parse().unwrap();
            assert!((1..=10).contains(&n));
        }
    }

    #[test]
    fn test_map_keys_are_distinct() {
        let mut r = rng();
        let rule = FieldRule::StringIntMap {
            size: SizeRule::Fixed(5),
        };
        for _ in 0..100 {
            let FieldValue::IntMap(m) = rule.generate("m", &mut r).unwrap() else {
                panic!("expected map");
            };
            assert_eq!(m.len(), 5);
        }
    }

    #[test]
    fn test_list_range_covers_bounds() {
        let mut r = rng();
        let size = SizeRule::Range { min: 2, max: 6 };
        let rule = FieldRule::StringList { size };
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let FieldValue::List(items) = rule.generate("a", &mut r).unwrap() else {
                panic!("expected list");
            };
            assert!(size.contains(items.len()));
            seen.insert(items.len());
        }
        assert!(seen.contains(&2) && seen.contains(&6));
    }

    #[test]
    fn test_malformed_rules_are_rejected() {
        let mut r = rng();
        let bad = [
            FieldRule::Sentence { words: 0 },
            FieldRule::NumberString { min: 5, max: 1 },
            FieldRule::StringList {
                size: SizeRule::Range { min: 4, max: 2 },
            },
            FieldRule::StringIntMap {
                size: SizeRule::Fixed(WORDS.len() + 1),
            },
        ];
        for rule in bad {
            let err = rule.generate("f", &mut r).unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidDirective { ref field, .. } if field == "f"));
        }
    }

    #[test]
    fn test_skip_and_timestamp() {
        let mut r = rng();
        assert_eq!(FieldRule::Skip.generate("s", &mut r).unwrap(), FieldValue::Null);
        let before = Utc::now();
        let FieldValue::Timestamp(ts) = FieldRule::Timestamp { format: None }
            .generate("c", &mut r)
            .unwrap()
        else {
            panic!("expected timestamp");
        };
        assert!(ts >= before && ts <= Utc::now());

        let FieldValue::Text(s) = FieldRule::Timestamp {
            format: Some("%Y-%m-%d"),
        }
        .generate("c", &mut r)
        .unwrap() else {
            panic!("expected formatted text");
        };
        assert_eq!(s.len(), 10);
    }
}
