//! Scratchpad：当前 trial 的 Thought / Action / Observation 记录
//!
//! 只追加；仅在 trial 边界清空。截断只用于把上一轮记录放进反思提示，不作用于实时 scratchpad。

use std::fmt;

/// 截断默认长度上限（字符数）
pub const DEFAULT_TRUNCATE_LEN: usize = 2000;

const TRUNCATED: &str = "[truncated]";

/// scratchpad 中的三类条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Thought,
    Action,
    Observation,
}

impl Section {
    /// 段标记：`\nThought N:`
    pub fn tag(&self, step: usize) -> String {
        format!("\n{} {}:", self, step)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Section::Thought => "Thought",
            Section::Action => "Action",
            Section::Observation => "Observation",
        };
        f.write_str(label)
    }
}

/// 追加一段：标记 + 空格 + 内容
pub fn append_entry(scratchpad: &mut String, section: Section, step: usize, content: &str) {
    scratchpad.push_str(&section.tag(step));
    scratchpad.push(' ');
    scratchpad.push_str(content);
}

/// 去掉首尾空白并删除内部换行，保证一条记录占一行
pub fn format_step(step: &str) -> String {
    step.trim().replace('\n', "")
}

fn char_len(lines: &[String]) -> usize {
    let newlines = lines.len().saturating_sub(1);
    lines.iter().map(|l| l.chars().count()).sum::<usize>() + newlines
}

/// 截断 scratchpad：超出 max_len 时从最长的 Observation 行开始，把内容替换为 `[truncated]`
///
/// 只替换确实会变短的行；结果长度不超过原长度，且对已截断结果再次截断不变。
pub fn truncate_scratchpad(scratchpad: &str, max_len: usize) -> String {
    let mut lines: Vec<String> = scratchpad.split('\n').map(String::from).collect();
    let mut observations: Vec<String> = lines
        .iter()
        .filter(|l| l.starts_with("Observation"))
        .cloned()
        .collect();
    // 稳定排序：等长时保留原顺序
    observations.sort_by_key(|l| l.chars().count());

    while char_len(&lines) > max_len {
        let Some(largest) = observations.pop() else {
            break;
        };
        let prefix = largest.split(':').next().unwrap_or_default();
        let replacement = format!("{}: {}", prefix, TRUNCATED);
        if replacement.chars().count() >= largest.chars().count() {
            continue;
        }
        if let Some(line) = lines.iter_mut().find(|l| **l == largest) {
            *line = replacement;
        }
    }
    lines.join("\n")
}
