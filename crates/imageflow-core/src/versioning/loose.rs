//! loose スキーム
//!
//! 1〜4個の数値コンポーネントと任意のサフィックスからなる緩いバージョン表記。
//! 例: `2.7`, `3.11.4`, `1.2.3.4`, `1.0.0-rc1`, `5.0.beta2`
//! サフィックス付きは不安定版として扱う。

use crate::provider::VersionScheme;
use std::cmp::Ordering;

const MAX_COMPONENTS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct LooseScheme;

#[derive(Debug)]
struct LooseVersion<'a> {
    release: Vec<u64>,
    suffix: &'a str,
}

impl<'a> LooseVersion<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let s = input.trim();
        let s = s.strip_prefix('v').unwrap_or(s);

        let end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (numeric, suffix) = s.split_at(end);
        let numeric = if suffix.is_empty() {
            numeric
        } else {
            numeric.strip_suffix('.').unwrap_or(numeric)
        };

        if numeric.is_empty() {
            return None;
        }

        let release = numeric
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    None
                } else {
                    part.parse::<u64>().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;

        if release.len() > MAX_COMPONENTS {
            return None;
        }

        let suffix = suffix.trim_start_matches(['-', '.', '_', '+']);
        if !suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '+'))
        {
            return None;
        }

        Some(Self { release, suffix })
    }

    fn component(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }
}

impl Ord for LooseVersion<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in 0..MAX_COMPONENTS {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        match (self.suffix.is_empty(), other.suffix.is_empty()) {
            (true, true) => Ordering::Equal,
            // 正式版はプレリリースより新しい
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => compare_suffix(self.suffix, other.suffix),
        }
    }
}

impl PartialEq for LooseVersion<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LooseVersion<'_> {}

impl PartialOrd for LooseVersion<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 数字部分は数値として比較する（rc9 < rc10）
fn compare_suffix(a: &str, b: &str) -> Ordering {
    let mut a_chunks = chunks(a);
    let mut b_chunks = chunks(b);

    loop {
        match (a_chunks.next(), b_chunks.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// 数字の連続と非数字の連続に分割
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

impl VersionScheme for LooseScheme {
    fn name(&self) -> &str {
        "loose"
    }

    fn is_version(&self, version: &str) -> bool {
        LooseVersion::parse(version).is_some()
    }

    fn is_stable(&self, version: &str) -> bool {
        LooseVersion::parse(version).is_some_and(|v| v.suffix.is_empty())
    }

    fn is_less_than_range(&self, version: &str, range: &str) -> bool {
        match (LooseVersion::parse(version), LooseVersion::parse(range)) {
            (Some(v), Some(bound)) => v < bound,
            _ => false,
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (LooseVersion::parse(a), LooseVersion::parse(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}
