//! Stem normalization for Ukrainian and Russian declension forms.
//!
//! Stems are language-qualified: a Russian root spelled like a Ukrainian one
//! carries an `_ru` suffix (`атак` / `атак_ru`). Each surface form belongs to
//! exactly one stem, and forms spelled the same in both languages belong to
//! the Ukrainian stem. [`StemTable::from_entries`] refuses any dictionary that
//! breaks this rule.
use crate::NlpError;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Built-in stem → forms dictionary for conflict vocabulary.
pub const STEM_FORMS: &[(&str, &[&str])] = &[
    // uk
    (
        "військов",
        &[
            "військовий", "військових", "військові", "військовими", "військову", "військова",
            "військове", "військовим", "військовому",
        ],
    ),
    (
        "обстріл",
        &["обстріли", "обстрілів", "обстрілами", "обстрілу", "обстрілом", "обстрілам", "обстрілах"],
    ),
    (
        "атак",
        &[
            "атака", "атаки", "атакам", "атакою", "атакували", "атакує", "атаці", "атаках",
            "атакуватиме",
        ],
    ),
    (
        "оборон",
        &[
            "оборона", "оборону", "обороні", "обороною", "оборони", "оборонної", "оборонців",
            "обороняють",
        ],
    ),
    (
        "евакуац",
        &[
            "евакуація", "евакуації", "евакуацію", "евакуацією", "евакуаційні", "евакуаційного",
            "евакуйовані", "евакуйованих",
        ],
    ),
    (
        "територ",
        &[
            "територія", "території", "територій", "територіальний", "територіальна",
            "територіальні", "територіального", "територіальну",
        ],
    ),
    ("зброя", &["зброї", "зброю", "зброєю", "озброєння", "озброєнні", "озброєнням"]),
    ("місто", &["міста", "місті", "містом", "містах", "містами", "містян", "міське"]),
    ("війн", &["війна", "війни", "війну", "війною", "війні", "війнах"]),
    ("переговор", &["переговори", "переговорів", "переговорам", "переговорами", "переговорах"]),
    ("біженц", &["біженці", "біженців", "біженцям", "біженцями", "біженцях"]),
    ("допомог", &["допомога", "допомоги", "допомозі", "допомогу", "допомогою"]),
    (
        "укр",
        &[
            "україна", "україни", "україні", "україну", "українці", "українців", "українцям",
            "українським", "українська",
        ],
    ),
    // ru
    (
        "военн",
        &[
            "военный", "военная", "военное", "военные", "военных", "военным", "военными",
            "военного", "военному", "военной",
        ],
    ),
    (
        "обстрел",
        &[
            "обстрелы", "обстрелов", "обстрелами", "обстрелу", "обстрелом", "обстрелах",
            "обстреляли", "обстреливают",
        ],
    ),
    (
        "атак_ru",
        &["атаке", "атаку", "атакой", "атакуют", "атаковать", "атаками", "атакован"],
    ),
    (
        "оборон_ru",
        &[
            "обороны", "обороне", "обороной", "обороняются", "оборонительный", "оборонительная",
        ],
    ),
    (
        "эвакуац",
        &[
            "эвакуация", "эвакуации", "эвакуацию", "эвакуацией", "эвакуационный", "эвакуированы",
            "эвакуированных",
        ],
    ),
    (
        "территор",
        &[
            "территория", "территории", "территорию", "территорией", "территориальный",
            "территориальные", "территориального",
        ],
    ),
    (
        "оружие",
        &["оружия", "оружию", "оружием", "вооружение", "вооружения", "вооружении", "вооружением"],
    ),
    ("город", &["города", "городу", "городом", "городах", "городами", "городской", "городское"]),
    ("войн", &["война", "войны", "войне", "войну", "войной"]),
    ("переговор_ru", &["переговоры", "переговоров"]),
    ("беженц", &["беженцы", "беженцев", "беженцам", "беженцами", "беженцах"]),
    ("помощ", &["помощь", "помощи", "помощью", "помогают", "помогли"]),
    (
        "рос",
        &["россия", "россии", "россию", "российский", "российская", "российские", "российских"],
    ),
];

/// Inverted form → stem lookup.
#[derive(Debug, Clone, Default)]
pub struct StemTable {
    forms: HashMap<String, String>,
}

impl StemTable {
    /// Invert a stem → forms dictionary. Every stem also maps to itself.
    ///
    /// ```
    /// use factwatch_nlp::{NlpError, StemTable};
    ///
    /// let table = StemTable::from_entries([("кіт", &["кота", "коту"][..])]).unwrap();
    /// assert_eq!(table.normalize("коту"), "кіт");
    ///
    /// let err = StemTable::from_entries([
    ///     ("атак", &["атака"][..]),
    ///     ("атак_ru", &["атака"][..]),
    /// ])
    /// .unwrap_err();
    /// assert!(matches!(err, NlpError::StemCollision { .. }));
    /// ```
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, NlpError>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let mut forms: HashMap<String, String> = HashMap::new();
        for (stem, words) in entries {
            let stem_key = stem.to_lowercase();
            for word in words.iter().map(|w| w.to_lowercase()).chain([stem_key.clone()]) {
                match forms.get(&word) {
                    Some(owner) if *owner != stem => {
                        return Err(NlpError::StemCollision {
                            form: word,
                            first: owner.clone(),
                            second: stem.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        forms.insert(word, stem.to_string());
                    }
                }
            }
        }
        Ok(Self { forms })
    }

    /// The table built from [`STEM_FORMS`].
    pub fn builtin() -> &'static StemTable {
        static TABLE: OnceLock<StemTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            StemTable::from_entries(STEM_FORMS.iter().copied())
                .expect("built-in stem dictionary has no colliding forms")
        })
    }

    pub fn stem_of(&self, form: &str) -> Option<&str> {
        self.forms.get(form).map(String::as_str)
    }

    /// Canonical stem for `token`, or `token` itself when it is not in the table.
    pub fn normalize<'a>(&'a self, token: &'a str) -> &'a str {
        self.stem_of(token).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// Normalize a lowercase, punctuation-free token with the built-in table.
pub fn normalize_term(token: &str) -> &str {
    StemTable::builtin().normalize(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dictionary_has_no_collisions() {
        assert!(StemTable::from_entries(STEM_FORMS.iter().copied()).is_ok());
    }

    #[test]
    fn every_form_maps_to_its_stem() {
        for (stem, forms) in STEM_FORMS {
            assert_eq!(normalize_term(stem), *stem);
            for form in *forms {
                assert_eq!(normalize_term(form), *stem, "form {form}");
            }
        }
    }

    #[test]
    fn shared_spellings_belong_to_ukrainian_stem() {
        assert_eq!(normalize_term("атака"), "атак");
        assert_eq!(normalize_term("атакой"), "атак_ru");
        assert_eq!(normalize_term("оборону"), "оборон");
        assert_eq!(normalize_term("переговорам"), "переговор");
        assert_eq!(normalize_term("переговоров"), "переговор_ru");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(normalize_term("спокійно"), "спокійно");
        assert_eq!(normalize_term("drone"), "drone");
    }

    #[test]
    fn repeated_form_within_one_stem_is_fine() {
        let table = StemTable::from_entries([("оборон", &["обороною", "обороною"][..])]).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn collision_names_both_stems() {
        let err = StemTable::from_entries([
            ("оборон", &["оборона"][..]),
            ("оборон_ru", &["обороны", "оборона"][..]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            NlpError::StemCollision {
                form: "оборона".into(),
                first: "оборон".into(),
                second: "оборон_ru".into(),
            }
        );
    }
}
