//! 雑多なテキスト（LLM の生出力など）から最初の JSON 値を取り出す
//!
//! 候補は `{` / `[` の出現位置を左から順に試す。各候補について、文字列・エスケープ・
//! 括弧の入れ子を追う走査で対応する閉じ括弧までを切り出し、serde_json に渡す。
//! パースできた最初の候補を採用し、後ろにより「正しそうな」値があっても比較しない。
//!
//! serde_json の既定の再帰上限（128）は外し、代わりに走査時の入れ子の深さを
//! `MAX_DEPTH` で打ち切る。上限を超えた候補は読み飛ばさずエラーにする
//! （読み飛ばすと内側の値を返してしまうため）。

use crate::error::Error;
use serde::Deserialize;
use serde_json::Value;

/// 受け付ける入れ子の深さの上限
pub const MAX_DEPTH: usize = 1024;

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];

/// 先頭バイトで符号化を判定してデコードする。
///
/// - UTF-16 BOM（LE / BE）: BOM を除いて UTF-16 として読む
/// - UTF-8 BOM: BOM を除く
/// - それ以外: UTF-8。不正なバイト列は U+FFFD に置き換え、失敗にはしない
pub fn decode_input(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(BOM_UTF16_LE) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(BOM_UTF16_BE) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    let body = bytes.strip_prefix(BOM_UTF8).unwrap_or(bytes);
    String::from_utf8_lossy(body).into_owned()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let odd_tail = !chunks.remainder().is_empty();
    let units: Vec<u16> = chunks.map(|c| unit([c[0], c[1]])).collect();
    let mut s = String::from_utf16_lossy(&units);
    if odd_tail {
        s.push(char::REPLACEMENT_CHARACTER);
    }
    s
}

/// 開き括弧から対応する閉じ括弧までの範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpan {
    /// 閉じ括弧の直後のバイト位置
    pub end: usize,
    /// 最も深い入れ子の段数（`[]` は 1）
    pub depth: usize,
}

/// `start` の開き括弧に対応する閉じ括弧の直後のバイト位置を返す。
pub fn find_value_end(text: &str, start: usize) -> Option<usize> {
    find_value_span(text, start).map(|span| span.end)
}

/// 括弧の種類が食い違った時点、または末尾まで閉じなかった場合は None。
/// どちらの場合もこの位置から始まる JSON は存在しない。
pub fn find_value_span(text: &str, start: usize) -> Option<ValueSpan> {
    let bytes = text.as_bytes();
    let mut closers: Vec<u8> = Vec::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                closers.push(if b == b'{' { b'}' } else { b']' });
                depth = depth.max(closers.len());
            }
            b'}' | b']' => {
                if closers.pop() != Some(b) {
                    return None;
                }
                if closers.is_empty() {
                    return Some(ValueSpan { end: i + 1, depth });
                }
            }
            _ => {}
        }
        if closers.is_empty() {
            // start が開き括弧でない
            return None;
        }
    }
    None
}

/// デコード済みテキストから最初の JSON 値を取り出す
pub fn extract_first_json_str(text: &str) -> Result<Value, Error> {
    for (start, _) in text.match_indices(|c: char| c == '{' || c == '[') {
        let Some(span) = find_value_span(text, start) else {
            continue;
        };
        if span.depth > MAX_DEPTH {
            return Err(Error::json(format!(
                "value at byte {} nests {} levels (limit {})",
                start, span.depth, MAX_DEPTH
            )));
        }
        if let Ok(value) = parse_unbounded(&text[start..span.end]) {
            return Ok(value);
        }
    }
    Err(Error::NoJsonFound)
}

/// 再帰上限なしでパースする。深さは呼び出し側で MAX_DEPTH 以下に抑えてある。
fn parse_unbounded(slice: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(slice);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// 生バイト列から最初の JSON 値を取り出す（デコード込み）
pub fn extract_first_json(bytes: &[u8]) -> Result<Value, Error> {
    extract_first_json_str(&decode_input(bytes))
}
