//! Keyword relevance filter.
//!
//! Classification is a linear scan over a fixed vocabulary: the combined
//! title and body are lowercased once, and the first term (in declaration
//! order) contained in that text decides the verdict. No stemming, no scoring.

use crate::models::RelevanceVerdict;

/// Relevance vocabulary. Order is priority: earlier terms win ties.
pub const VOCABULARY: &[&str] = &[
    "건강", "피트니스", "PT", "헬스", "케어", "시니어",
    "운동", "트레이닝", "다이어트", "체중", "근육",
    "요가", "필라테스", "스트레칭", "웨이트",
    "노인", "고령", "재활", "치료", "병원",
    "영양", "식단", "비만", "당뇨", "혈압",
    "걷기", "달리기", "수영", "등산", "헬스장",
    "트레이너", "피티", "홈트", "스포츠",
];

/// Classify an item by its title and body text.
///
/// An empty body is fine; the title alone can carry the match.
pub fn classify(title: &str, body: &str) -> RelevanceVerdict {
    classify_with(VOCABULARY, title, body)
}

pub fn classify_with(
    vocabulary: &'static [&'static str],
    title: &str,
    body: &str,
) -> RelevanceVerdict {
    let haystack = format!("{title} {body}").to_lowercase();
    vocabulary
        .iter()
        .find(|term| haystack.contains(&term.to_lowercase()))
        .map(|keyword| RelevanceVerdict::Relevant { keyword })
        .unwrap_or(RelevanceVerdict::Irrelevant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vocabulary_term_wins() {
        // "운동" appears first in the text, but "건강" is declared first.
        let verdict = classify("운동으로 건강 지키기", "");
        assert_eq!(verdict.keyword(), Some("건강"));
    }

    #[test]
    fn test_body_only_match() {
        let verdict = classify("오늘의 소식 정리", "아침 요가 수업이 인기");
        assert_eq!(verdict.keyword(), Some("요가"));
    }

    #[test]
    fn test_title_match_with_empty_body() {
        assert!(classify("겨울철 다이어트 비법", "").is_relevant());
    }

    #[test]
    fn test_case_insensitive_latin_terms() {
        let verdict = classify("1:1 pt 수업 가격 비교", "");
        assert_eq!(verdict.keyword(), Some("PT"));
    }

    #[test]
    fn test_no_match_is_irrelevant() {
        let verdict = classify("속보: 환율 급등", "코스피 하락 마감");
        assert_eq!(verdict, RelevanceVerdict::Irrelevant);
    }

    #[test]
    fn test_custom_vocabulary() {
        static TERMS: &[&str] = &["marathon", "sleep"];
        let verdict = classify_with(TERMS, "Better SLEEP tips", "");
        assert_eq!(verdict.keyword(), Some("sleep"));
    }
}
