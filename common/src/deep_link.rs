//! ディープリンク（URLクエリ ⇔ 開いている作品）
//!
//! `?project={id}` が「作品Xのモーダルが開いている」唯一の永続表現。
//! 読み取りはロード時とパラメータ変更時、書き込みはディープリンクで開いた
//! モーダルを閉じるときの削除のみ。

use crate::types::ItemId;

/// 既定のクエリパラメータ名
pub const DEFAULT_PARAM: &str = "project";

/// URLを「クエリより前」「クエリ」「フラグメント」に分ける
struct UrlParts<'a> {
    base: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split_url(url: &str) -> UrlParts<'_> {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, frag)) => (rest, Some(frag)),
        None => (url, None),
    };
    let (base, query) = match rest.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (rest, None),
    };
    UrlParts { base, query, fragment }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn pair_key(pair: &str) -> String {
    decode_component(pair.split_once('=').map(|(k, _)| k).unwrap_or(pair))
}

/// クエリ文字列からパラメータ値を取得（同名が複数あれば先頭）
pub fn query_value(query: &str, param: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find(|pair| pair_key(pair) == param)
        .map(|pair| decode_component(pair.split_once('=').map(|(_, v)| v).unwrap_or("")))
}

/// パラメータ値を作品IDとして解釈
///
/// 空・非数値は None。前後の空白は許容する。
pub fn parse_item_id(value: &str) -> Option<ItemId> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok().map(ItemId)
}

/// URLからディープリンク先の作品IDを読む
pub fn read_deep_link(url: &str, param: &str) -> Option<ItemId> {
    let parts = split_url(url);
    let value = query_value(parts.query?, param)?;
    parse_item_id(&value)
}

/// URLのディープリンクを書き換える
///
/// - `Some(id)`: 既存の値を置き換え（なければ末尾に追加）
/// - `None`: 同名パラメータをすべて削除し、空になれば `?` も落とす
///
/// 他のパラメータとその順序、フラグメントは保持する。
pub fn write_deep_link(url: &str, param: &str, id: Option<ItemId>) -> String {
    let parts = split_url(url);

    let mut pairs: Vec<String> = Vec::new();
    let mut written = false;
    for pair in parts.query.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
        if pair_key(pair) != param {
            pairs.push(pair.to_string());
            continue;
        }
        if let (Some(id), false) = (id, written) {
            pairs.push(format!("{}={}", urlencoding::encode(param), id));
            written = true;
        }
    }
    if let (Some(id), false) = (id, written) {
        pairs.push(format!("{}={}", urlencoding::encode(param), id));
    }

    let mut out = parts.base.to_string();
    if !pairs.is_empty() {
        out.push('?');
        out.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
