use anyhow::{Result, bail};

pub const DEFAULT_LOCALE: &str = "en";
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ko"];

const EN: &[(&str, &str)] = &[
    ("header.title", "Pour"),
    ("header.byline", "brew by the second."),
    ("buttons.newRecipe", "New Recipe"),
    ("buttons.export", "Export Recipes"),
    ("buttons.import", "Import Recipes"),
    ("buttons.reset", "Reset App"),
    ("buttons.dupe", "Duplicate"),
    ("buttons.remove", "Remove"),
    ("config.title", "Feedback Settings"),
    ("config.desc", "Manage sound and vibration feedback."),
    ("config.sound", "Sound"),
    ("config.vibration", "Vibration"),
    ("config.locale", "Language"),
    ("card.brewer", "Brewer"),
    ("card.dose", "Dose"),
    ("card.water", "Water"),
    ("card.totalTime", "Total time"),
    ("reset.title", "Are you absolutely sure?"),
    (
        "reset.desc",
        "This action cannot be undone. This will permanently delete all your custom recipes and restore the application to its default state.",
    ),
    ("cardRemove.title", "Are you absolutely sure?"),
    (
        "cardRemove.desc",
        "This action cannot be undone. This will permanently delete your recipe.",
    ),
    ("list.empty", "No recipes found. Add some recipes to get started!"),
    ("detail.brewer", "Brewer"),
    ("detail.dosage", "Dose"),
    ("detail.water", "Water"),
    ("detail.ratio", "Ratio"),
    ("detail.temp", "Temperature"),
    ("detail.grind", "Grind Size"),
    ("detail.timer", "Timer"),
    ("detail.currStage", "Current Stage"),
    ("detail.name", "Name"),
    ("detail.instruction", "Instructions"),
    ("detail.allStage", "All Stages"),
    ("detail.noStage", "No active stage."),
    ("detail.drain", "Drain"),
    ("detail.drainInstruction", "Allow to drain"),
    ("detail.notFound", "Recipe not found."),
];

const KO: &[(&str, &str)] = &[
    ("header.title", "Pour"),
    ("header.byline", "초 단위로 내리는 커피."),
    ("buttons.newRecipe", "새 레시피"),
    ("buttons.export", "레시피 내보내기"),
    ("buttons.import", "레시피 가져오기"),
    ("buttons.reset", "앱 초기화"),
    ("buttons.dupe", "복제"),
    ("buttons.remove", "삭제"),
    ("config.title", "피드백 설정"),
    ("config.desc", "소리와 진동 피드백을 관리합니다."),
    ("config.sound", "소리"),
    ("config.vibration", "진동"),
    ("config.locale", "언어"),
    ("card.brewer", "추출 도구"),
    ("card.dose", "원두량"),
    ("card.water", "물"),
    ("card.totalTime", "총 시간"),
    ("reset.title", "정말 초기화하시겠습니까?"),
    (
        "reset.desc",
        "이 작업은 되돌릴 수 없습니다. 모든 사용자 레시피가 삭제되고 기본 상태로 복원됩니다.",
    ),
    ("cardRemove.title", "정말 삭제하시겠습니까?"),
    (
        "cardRemove.desc",
        "이 작업은 되돌릴 수 없습니다. 레시피가 영구적으로 삭제됩니다.",
    ),
    ("list.empty", "레시피가 없습니다. 레시피를 추가해 보세요!"),
    ("detail.brewer", "추출 도구"),
    ("detail.dosage", "원두량"),
    ("detail.water", "물"),
    ("detail.ratio", "비율"),
    ("detail.temp", "온도"),
    ("detail.grind", "분쇄도"),
    ("detail.timer", "타이머"),
    ("detail.currStage", "현재 단계"),
    ("detail.name", "이름"),
    ("detail.instruction", "설명"),
    ("detail.allStage", "전체 단계"),
    ("detail.noStage", "진행 중인 단계가 없습니다."),
    ("detail.drain", "드레인"),
    ("detail.drainInstruction", "물이 빠질 때까지 기다리세요"),
    ("detail.notFound", "레시피를 찾을 수 없습니다."),
];

/// Static label dictionary for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Dictionary {
    locale: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl Dictionary {
    /// Dictionary for `locale`, falling back to English for unknown codes.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        match locale {
            "ko" => Dictionary {
                locale: "ko",
                entries: KO,
            },
            "en" => Dictionary::english(),
            other => {
                tracing::warn!("failed to load '{other}' dictionary, using English");
                Dictionary::english()
            }
        }
    }

    fn english() -> Self {
        Dictionary {
            locale: DEFAULT_LOCALE,
            entries: EN,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// Strict lookup by dotted path. A missing path is an error.
    pub fn lookup(&self, path: &str) -> Result<&'static str> {
        match self.entries.iter().find(|(k, _)| *k == path) {
            Some((_, v)) => Ok(*v),
            None => bail!("Missing translation: {path}"),
        }
    }

    /// Lookup that falls back to `default` when the path is missing.
    #[must_use]
    pub fn label(&self, path: &str, default: &'static str) -> &'static str {
        self.lookup(path).unwrap_or(default)
    }
}

pub fn validate_locale(locale: &str) -> Result<String> {
    let lower = locale.trim().to_lowercase();
    if SUPPORTED_LOCALES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        bail!(
            "Unsupported locale '{locale}'. Must be one of: {}",
            SUPPORTED_LOCALES.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_english() {
        let dict = Dictionary::for_locale("en");
        assert_eq!(dict.lookup("detail.brewer").unwrap(), "Brewer");
    }

    #[test]
    fn test_lookup_korean() {
        let dict = Dictionary::for_locale("ko");
        assert_eq!(dict.locale(), "ko");
        assert_eq!(dict.lookup("config.sound").unwrap(), "소리");
    }

    #[test]
    fn test_lookup_missing_is_error() {
        let dict = Dictionary::for_locale("en");
        let err = dict.lookup("detail.nope").unwrap_err();
        assert_eq!(err.to_string(), "Missing translation: detail.nope");
    }

    #[test]
    fn test_label_falls_back() {
        let dict = Dictionary::for_locale("en");
        assert_eq!(dict.label("detail.nope", "Fallback"), "Fallback");
        assert_eq!(dict.label("detail.timer", "Fallback"), "Timer");
    }

    #[test]
    fn test_unknown_locale_uses_english() {
        let dict = Dictionary::for_locale("fr");
        assert_eq!(dict.locale(), "en");
    }

    #[test]
    fn test_dictionaries_have_same_keys() {
        let en: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        let ko: Vec<&str> = KO.iter().map(|(k, _)| *k).collect();
        assert_eq!(en, ko);
    }

    #[test]
    fn test_validate_locale() {
        assert_eq!(validate_locale("KO").unwrap(), "ko");
        assert_eq!(validate_locale("en").unwrap(), "en");
        assert!(validate_locale("de").is_err());
    }
}
