//! 文档内 Lookup 算法
//!
//! - fuzzy_lookup：按 `.`/`!`/`?` 切句，partial-ratio 打分（0-100），取最高分句及其前后窗口，
//!   超过字符上限时在最后一个句末标点处截断，找不到则硬截断并追加 `...`
//! - keyword_lookup：逐条返回包含关键词的句子，带游标，重复查同一关键词时前进

use std::sync::OnceLock;

use regex::Regex;

use crate::retrieval::LookupOptions;

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"))
}

/// 在句末标点后的空白处切句；标点保留在句尾，空白丢弃
pub fn split_sentences(document: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in sentence_boundary().find_iter(document) {
        // 标点均为单字节 ASCII
        sentences.push(&document[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&document[start..]);
    sentences.retain(|s| !s.is_empty());
    sentences
}

/// 最长公共子序列长度
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Indel 归一化相似度：2 * LCS / (|a| + |b|) * 100
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// partial-ratio：较短串与较长串中所有等长（含首尾不完整）窗口的最高 ratio
pub fn partial_ratio(s1: &str, s2: &str) -> f64 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let m = short.len() as isize;
    let n = long.len() as isize;
    let mut best: f64 = 0.0;
    for start in (1 - m)..n {
        let lo = start.max(0) as usize;
        let hi = (start + m).min(n) as usize;
        let score = ratio(&short, &long[lo..hi]);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// 超过 max_chars 时截断：优先停在上限内最后一个句末标点，否则硬截断加省略号
fn clip_window(context: String, max_chars: usize) -> String {
    let Some((cut, _)) = context.char_indices().nth(max_chars) else {
        return context;
    };
    let prefix = &context[..cut];
    match prefix.rfind(|c| matches!(c, '.' | '!' | '?')) {
        Some(end) => context[..=end].to_string(),
        None => format!("{prefix}..."),
    }
}

/// 模糊 Lookup：返回最佳匹配句的上下文窗口；没有句子达到阈值时返回 None
pub fn fuzzy_lookup(document: &str, query: &str, options: &LookupOptions) -> Option<String> {
    let sentences = split_sentences(document);
    let query = query.to_lowercase();
    let threshold = options.score_threshold as f64;

    let mut best: Option<(usize, f64)> = None;
    for (idx, sentence) in sentences.iter().enumerate() {
        let score = partial_ratio(&query, &sentence.to_lowercase());
        if score < threshold {
            continue;
        }
        // 同分取靠前的句子
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((idx, score));
        }
    }

    let (idx, score) = best?;
    tracing::debug!(sentence = idx, score, "fuzzy lookup hit");
    let start = idx.saturating_sub(options.window_radius);
    let end = idx
        .saturating_add(options.window_radius)
        .saturating_add(1)
        .min(sentences.len());
    Some(clip_window(sentences[start..end].join(" "), options.max_chars))
}

/// 关键词 Lookup 的游标：同一关键词重复查询时前进到下一条结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCursor {
    pub keyword: String,
    pub index: usize,
}

/// 关键词 Lookup：返回 `(Result k / n) sentence`，结果用尽时返回 None
pub fn keyword_lookup(
    document: &str,
    keyword: &str,
    cursor: &mut Option<LookupCursor>,
) -> Option<String> {
    let keyword = keyword.trim().to_lowercase();
    let index = match cursor {
        Some(c) if c.keyword == keyword => c.index,
        _ => 0,
    };
    let hits: Vec<&str> = split_sentences(document)
        .into_iter()
        .filter(|s| s.to_lowercase().contains(&keyword))
        .collect();
    *cursor = Some(LookupCursor {
        keyword,
        index: index + 1,
    });
    hits.get(index)
        .map(|s| format!("(Result {} / {}) {}", index + 1, hits.len(), s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("The sky is blue. Water is wet!  Fire is hot? Done"),
            vec!["The sky is blue.", "Water is wet!", "Fire is hot?", "Done"]
        );
        assert!(split_sentences("").is_empty());
        // 小数点后无空白，不切分
        assert_eq!(split_sentences("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
    }

    #[test]
    fn test_partial_ratio_bounds() {
        assert_eq!(partial_ratio("water", "water is wet."), 100.0);
        assert_eq!(partial_ratio("water is wet.", "water"), 100.0);
        assert_eq!(partial_ratio("", "anything"), 0.0);
        assert_eq!(partial_ratio("", ""), 100.0);
        let s = partial_ratio("zzzz", "abc def");
        assert!(s < 60.0, "unexpected score {s}");
    }

    #[test]
    fn test_fuzzy_lookup_window_covers_short_document() {
        let doc = "The sky is blue. Water is wet. Fire is hot.";
        let got = fuzzy_lookup(doc, "water", &LookupOptions::default()).unwrap();
        assert_eq!(got, "The sky is blue. Water is wet. Fire is hot.");
    }

    #[test]
    fn test_fuzzy_lookup_window_radius() {
        let doc = "S0 alpha. S1 beta. S2 gamma. S3 delta. S4 omega. S5 kappa. S6 sigma.";
        let got = fuzzy_lookup(doc, "omega", &LookupOptions::default()).unwrap();
        assert_eq!(got, "S2 gamma. S3 delta. S4 omega. S5 kappa. S6 sigma.");

        let narrow = LookupOptions {
            window_radius: 0,
            ..LookupOptions::default()
        };
        assert_eq!(fuzzy_lookup(doc, "omega", &narrow).unwrap(), "S4 omega.");
    }

    #[test]
    fn test_fuzzy_lookup_huge_radius_takes_whole_document() {
        let doc = "The sky is blue. Water is wet. Fire is hot.";
        let wide = LookupOptions {
            window_radius: usize::MAX,
            ..LookupOptions::default()
        };
        assert_eq!(
            fuzzy_lookup(doc, "water", &wide).unwrap(),
            "The sky is blue. Water is wet. Fire is hot."
        );
    }

    #[test]
    fn test_fuzzy_lookup_no_match() {
        let doc = "The sky is blue. Water is wet.";
        assert_eq!(fuzzy_lookup(doc, "xylophone quartz", &LookupOptions::default()), None);
    }

    #[test]
    fn test_fuzzy_lookup_clips_at_sentence_end() {
        let filler = format!("{}end.", "word ".repeat(18));
        let target = format!("{}marker.", "word ".repeat(18));
        let parts = [&filler, &filler, &target, &filler, &filler];
        let doc = parts.map(|s| s.as_str()).join(" ");
        assert!(doc.chars().count() > 400);

        let got = fuzzy_lookup(&doc, "marker", &LookupOptions::default()).unwrap();
        assert_eq!(got, parts[..4].iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" "));
        assert!(got.chars().count() <= 400);
    }

    #[test]
    fn test_fuzzy_lookup_hard_clip_adds_ellipsis() {
        let doc = "a".repeat(500);
        let got = fuzzy_lookup(&doc, "aaa", &LookupOptions::default()).unwrap();
        assert_eq!(got, format!("{}...", "a".repeat(400)));
    }

    #[test]
    fn test_keyword_lookup_cursor() {
        let doc = "Cats purr. Dogs bark. Big cats roar.";
        let mut cursor = None;
        assert_eq!(
            keyword_lookup(doc, "cats", &mut cursor).as_deref(),
            Some("(Result 1 / 2) Cats purr.")
        );
        assert_eq!(
            keyword_lookup(doc, "Cats", &mut cursor).as_deref(),
            Some("(Result 2 / 2) Big cats roar.")
        );
        assert_eq!(keyword_lookup(doc, "cats", &mut cursor), None);
        // 换关键词后游标重置
        assert_eq!(
            keyword_lookup(doc, "dogs", &mut cursor).as_deref(),
            Some("(Result 1 / 1) Dogs bark.")
        );
    }
}
