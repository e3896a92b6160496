// 命名シーケンサー - 出力ファイル名の生成と衝突回避

use crate::core::RenamingRule;
use std::collections::HashSet;
use std::path::Path;

/// 元のファイル名からベース名を取り出せない場合の代替
const FALLBACK_STEM: &str = "image";

/// 元のファイル名から拡張子を除いたベース名
pub fn base_name(original: &str) -> &str {
    Path::new(original)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(FALLBACK_STEM)
}

/// 連番をゼロ埋めした文字列
pub fn padded_index(index: u32, padding: usize) -> String {
    format!("{index:0padding$}")
}

/// 1アイテム分の出力ファイル名を生成
///
/// `index`は`sequence_start`から始まる連番。`extension`はドットなし。
pub fn next_name(original: &str, index: u32, rule: &RenamingRule, extension: &str) -> String {
    let body = if rule.use_sequence {
        padded_index(index, rule.sequence_padding)
    } else {
        base_name(original).to_string()
    };
    format!("{}{}{}.{}", rule.prefix, body, rule.suffix, extension)
}

/// 入力位置に対応する連番
pub fn sequence_index(position: usize, rule: &RenamingRule) -> u32 {
    let offset = u32::try_from(position).unwrap_or(u32::MAX);
    rule.sequence_start.saturating_add(offset)
}

/// 同名の出力を入力順に`_2`, `_3`, ... で区別する
///
/// 各名前の最初の出現はそのまま残し、後続だけに接尾辞を付ける。接尾辞付きの候補は
/// バッチ内のどの計算済みの名前とも衝突しない。`None`は名前を持たない
/// アイテム（失敗）で、そのまま返す。
pub fn disambiguate(names: Vec<Option<String>>) -> Vec<Option<String>> {
    // 計算済みの名前を先に全て予約する
    let reserved: HashSet<String> = names.iter().flatten().cloned().collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());

    names
        .into_iter()
        .map(|name| {
            let name = name?;
            if taken.insert(name.clone()) {
                return Some(name);
            }

            let (stem, extension) = split_extension(&name);
            let mut counter = 2usize;
            loop {
                let candidate = match extension {
                    Some(extension) => format!("{stem}_{counter}.{extension}"),
                    None => format!("{stem}_{counter}"),
                };
                if !reserved.contains(&candidate) && taken.insert(candidate.clone()) {
                    return Some(candidate);
                }
                counter += 1;
            }
        })
        .collect()
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (name, None),
    }
}
