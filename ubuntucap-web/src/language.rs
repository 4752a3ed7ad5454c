use std::collections::HashMap;

/// Information about a supported language
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub flag: &'static str,
    pub translation: &'static str,
    pub native_name: &'static str,
}

/// Language shown before the user picks one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Get information about a supported language
pub fn get_language_info(code: &str) -> Option<LanguageInfo> {
    supported_languages().get(code).cloned()
}

/// Get a map of supported languages
pub fn supported_languages() -> HashMap<&'static str, LanguageInfo> {
    HashMap::from([
        (
            "en",
            LanguageInfo {
                code: "en",
                flag: "🇬🇧",
                translation: include_str!("../translations/en.json"),
                native_name: "English",
            },
        ),
        (
            "sw",
            LanguageInfo {
                code: "sw",
                flag: "🇰🇪",
                translation: include_str!("../translations/sw.json"),
                native_name: "Kiswahili",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Route;
    use strum::IntoEnumIterator;

    fn lookup<'a>(document: &'a serde_json::Value, key: &str) -> Option<&'a str> {
        key.split('.')
            .try_fold(document, |node, part| node.get(part))
            .and_then(serde_json::Value::as_str)
    }

    /// Tests every translation parses and names every route
    #[test]
    fn test_translations_cover_routes() {
        for info in supported_languages().values() {
            let document: serde_json::Value =
                serde_json::from_str(info.translation).expect("translation is JSON");
            for route in Route::iter() {
                assert!(
                    lookup(&document, route.title_key()).is_some(),
                    "{} is missing {}",
                    info.code,
                    route.title_key()
                );
            }
            assert!(lookup(&document, "app.title").is_some());
        }
    }

    /// Tests every language can describe each score factor and tip
    #[test]
    fn test_translations_cover_score_breakdown() {
        use shared::models::{ImprovementTip, ScoreFactor, improvement_tips, score_factors};

        for info in supported_languages().values() {
            let document: serde_json::Value =
                serde_json::from_str(info.translation).expect("translation is JSON");
            let mut keys: Vec<String> = ScoreFactor::iter()
                .flat_map(|factor| {
                    [
                        format!("credit.factors.{factor}.name"),
                        format!("credit.factors.{factor}.description"),
                    ]
                })
                .chain(ImprovementTip::iter().map(|tip| format!("credit.tips.{tip}")))
                .collect();
            for score in [30.0, 68.0, 90.0] {
                keys.extend(score_factors(score).into_iter().flat_map(|rating| {
                    [
                        format!("credit.impact.{}", rating.impact),
                        format!("credit.status.{}", rating.status),
                    ]
                }));
                assert!(!improvement_tips(score).is_empty());
            }
            for key in keys {
                assert!(lookup(&document, &key).is_some(), "{} is missing {key}", info.code);
            }
        }
    }

    #[test]
    fn test_default_language_is_supported() {
        assert_eq!(
            get_language_info(DEFAULT_LANGUAGE).map(|info| info.native_name),
            Some("English")
        );
        assert!(get_language_info("xx").is_none());
    }
}
