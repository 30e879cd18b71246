//! Coarse language tagging.
//!
//! With the `lang-detect` feature the statistical detector from `whatlang` is the
//! primary path. Without it (or when disabled in config) a script-range heuristic
//! counts Hangul, Latin, Kana and Han characters and picks the largest group.

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::models::Language;

/// Inputs shorter than this (after trimming) are not sent to the detector.
#[cfg(feature = "lang-detect")]
const MIN_DETECT_CHARS: usize = 3;

#[derive(Debug, Clone)]
pub struct LanguageTagger {
    use_detector: bool,
}

impl LanguageTagger {
    pub fn new(config: &AnalyzerConfig) -> Self {
        if config.language_detector && !detector_available() {
            debug!("Language detector not compiled in, using script heuristic");
        }
        Self {
            use_detector: config.language_detector && detector_available(),
        }
    }

    /// Tagger that only uses the script-range heuristic.
    pub fn heuristic() -> Self {
        Self {
            use_detector: false,
        }
    }

    pub fn uses_detector(&self) -> bool {
        self.use_detector
    }

    pub fn tag(&self, text: &str) -> Language {
        if self.use_detector {
            detect(text)
        } else {
            script_language(text)
        }
    }
}

pub fn detector_available() -> bool {
    cfg!(feature = "lang-detect")
}

#[cfg(feature = "lang-detect")]
fn detect(text: &str) -> Language {
    use whatlang::Lang;

    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_DETECT_CHARS {
        return Language::Unknown;
    }
    match whatlang::detect(trimmed) {
        Some(info) => match info.lang() {
            Lang::Kor => Language::Korean,
            Lang::Eng => Language::English,
            Lang::Jpn => Language::Japanese,
            Lang::Cmn => Language::Chinese,
            Lang::Spa => Language::Spanish,
            Lang::Por => Language::Portuguese,
            Lang::Fra => Language::French,
            Lang::Deu => Language::German,
            Lang::Rus => Language::Russian,
            Lang::Vie => Language::Vietnamese,
            Lang::Tha => Language::Thai,
            Lang::Ind => Language::Indonesian,
            _ => Language::Other,
        },
        None => Language::Unknown,
    }
}

#[cfg(not(feature = "lang-detect"))]
fn detect(text: &str) -> Language {
    script_language(text)
}

/// Picks the script with the most characters; ties go to the earlier script.
pub fn script_language(text: &str) -> Language {
    // Korean, English, Japanese, Chinese
    let mut counts = [0usize; 4];
    for c in text.chars() {
        match c {
            '\u{AC00}'..='\u{D7A3}' => counts[0] += 1,
            'a'..='z' | 'A'..='Z' => counts[1] += 1,
            '\u{3040}'..='\u{30FF}' => counts[2] += 1,
            '\u{4E00}'..='\u{9FFF}' => counts[3] += 1,
            _ => {}
        }
    }

    let languages = [
        Language::Korean,
        Language::English,
        Language::Japanese,
        Language::Chinese,
    ];
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    if counts[best] == 0 {
        Language::Unknown
    } else {
        languages[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_heuristic_picks_dominant_script() {
        assert_eq!(script_language("노래 너무 좋아요"), Language::Korean);
        assert_eq!(script_language("this song is great"), Language::English);
        assert_eq!(script_language("この曲が好きです"), Language::Japanese);
        assert_eq!(script_language("我很喜欢"), Language::Chinese);
        assert_eq!(script_language("노래 정말 좋아 good"), Language::Korean);
        // 2 Hangul vs 4 Latin characters
        assert_eq!(script_language("노래 good"), Language::English);
    }

    #[test]
    fn test_script_heuristic_unknown_without_letters() {
        assert_eq!(script_language(""), Language::Unknown);
        assert_eq!(script_language("ㅋㅋㅋ 123 !!"), Language::Unknown);
        assert_eq!(script_language("😂😂"), Language::Unknown);
    }

    #[test]
    fn test_script_heuristic_tie_goes_to_first_script() {
        assert_eq!(script_language("가a"), Language::Korean);
    }

    #[test]
    fn test_heuristic_tagger_ignores_detector() {
        let tagger = LanguageTagger::heuristic();
        assert!(!tagger.uses_detector());
        assert_eq!(tagger.tag("hello there"), Language::English);
    }

    #[test]
    fn test_detector_can_be_disabled_by_config() {
        let config = AnalyzerConfig {
            language_detector: false,
            ..AnalyzerConfig::default()
        };
        assert!(!LanguageTagger::new(&config).uses_detector());
    }

    #[cfg(feature = "lang-detect")]
    #[test]
    fn test_detector_short_input_is_unknown() {
        let tagger = LanguageTagger::new(&AnalyzerConfig::default());
        assert!(tagger.uses_detector());
        assert_eq!(tagger.tag("  ab  "), Language::Unknown);
        assert_eq!(tagger.tag(""), Language::Unknown);
    }

    #[cfg(feature = "lang-detect")]
    #[test]
    fn test_detector_recognises_clear_text() {
        let tagger = LanguageTagger::new(&AnalyzerConfig::default());
        assert_eq!(
            tagger.tag("이 노래 정말 좋아요 매일 듣고 있어요 가사도 너무 예뻐요"),
            Language::Korean
        );
        assert_eq!(
            tagger.tag("This is honestly the best music video I have seen this year"),
            Language::English
        );
    }
}
