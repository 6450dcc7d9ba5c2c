// crates/company-directory-core/src/i18n.rs
// ============================================================================
// Module: Directory Message Catalog
// Description: Localized user-facing messages for directory outcomes.
// Purpose: Render error details in the language a request asked for.
// Dependencies: crate::core::language
// ============================================================================

//! ## Overview
//! User-facing error details are stored in a static catalog per supported
//! language and rendered through [`translate`] or the [`t!`](crate::t) macro.
//! Unlike record names, message lookup never fails: a key missing from the
//! requested catalog falls back to English and then to the key itself.
//!
//! ## Invariants
//! - Catalogs are built once and read-only thereafter.
//! - Placeholder substitution is applied in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::core::language::LanguageCode;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `name`).
#[derive(Debug, Clone)]
pub struct MessageArg {
    /// Placeholder name used in message templates.
    pub key: &'static str,
    /// Preformatted substitution value.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self { key, value: value.into() }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("company.not_found", "Company not found: {name}"),
    ("company.name_missing", "Company name is required for language {language}."),
    ("tag.not_found", "Tag not found: {name}"),
    ("tag.not_associated", "Tag not associated with this company: {tag}"),
    ("name.too_long", "Name exceeds {max_chars} characters: {name}"),
    ("store.failure", "Internal store error."),
    ("request.language_invalid", "Unsupported language: {value}"),
    ("request.body_invalid", "Invalid request body: {error}"),
    ("request.body_too_large", "Request body exceeds {limit} bytes."),
    ("request.query_missing", "Missing query parameter: {name}"),
    ("request.query_invalid", "Invalid query string: {error}"),
    ("cli.version", "company-directory {version}"),
    ("cli.config.load_failed", "Failed to load config: {error}"),
    ("cli.config.valid", "Config valid."),
    ("cli.serve.init_failed", "Failed to initialize server: {error}"),
    ("cli.serve.listening", "Serving company directory on {bind} ({store} store)."),
    ("cli.serve.failed", "Server failed: {error}"),
    ("cli.output.write_failed", "Failed to write to {stream}: {error}"),
];

/// Korean catalog entries.
const CATALOG_KO: &[(&str, &str)] = &[
    ("company.not_found", "{name} 회사가 존재하지 않습니다."),
    ("company.name_missing", "{language} 회사 이름이 필요합니다."),
    ("tag.not_found", "{name} 태그가 존재하지 않습니다."),
    ("tag.not_associated", "{tag} 태그가 이 회사에 연결되어 있지 않습니다."),
    ("name.too_long", "이름이 {max_chars}자를 초과합니다: {name}"),
    ("store.failure", "내부 저장소 오류가 발생했습니다."),
    ("request.language_invalid", "지원하지 않는 언어입니다: {value}"),
    ("request.body_invalid", "요청 본문이 올바르지 않습니다: {error}"),
    ("request.body_too_large", "요청 본문이 {limit} 바이트를 초과합니다."),
    ("request.query_missing", "{name} 쿼리 매개변수가 필요합니다."),
    ("request.query_invalid", "쿼리 문자열이 올바르지 않습니다: {error}"),
    ("cli.version", "company-directory {version}"),
    ("cli.config.load_failed", "설정을 불러오지 못했습니다: {error}"),
    ("cli.config.valid", "설정이 올바릅니다."),
    ("cli.serve.init_failed", "서버를 초기화하지 못했습니다: {error}"),
    ("cli.serve.listening", "{bind} 에서 회사 디렉터리를 제공합니다 ({store} 저장소)."),
    ("cli.serve.failed", "서버 오류: {error}"),
    ("cli.output.write_failed", "{stream} 에 쓰지 못했습니다: {error}"),
];

/// Japanese catalog entries.
const CATALOG_JA: &[(&str, &str)] = &[
    ("company.not_found", "{name} 会社が存在しません。"),
    ("company.name_missing", "{language} の会社名が必要です。"),
    ("tag.not_found", "{name} タグが存在しません。"),
    ("tag.not_associated", "{tag} タグはこの会社に関連付けられていません。"),
    ("name.too_long", "名前が{max_chars}文字を超えています: {name}"),
    ("store.failure", "内部ストアエラーが発生しました。"),
    ("request.language_invalid", "サポートされていない言語です: {value}"),
    ("request.body_invalid", "リクエスト本文が無効です: {error}"),
    ("request.body_too_large", "リクエスト本文が {limit} バイトを超えています。"),
    ("request.query_missing", "クエリパラメータ {name} が必要です。"),
    ("request.query_invalid", "クエリ文字列が無効です: {error}"),
    ("cli.version", "company-directory {version}"),
    ("cli.config.load_failed", "設定を読み込めませんでした: {error}"),
    ("cli.config.valid", "設定は有効です。"),
    ("cli.serve.init_failed", "サーバーを初期化できませんでした: {error}"),
    ("cli.serve.listening", "{bind} で会社ディレクトリを提供しています ({store} ストア)。"),
    ("cli.serve.failed", "サーバーエラー: {error}"),
    ("cli.output.write_failed", "{stream} に書き込めませんでした: {error}"),
];

/// Traditional Chinese catalog entries.
const CATALOG_TW: &[(&str, &str)] = &[
    ("company.not_found", "{name} 公司不存在。"),
    ("company.name_missing", "需要 {language} 公司名稱。"),
    ("tag.not_found", "{name} 標籤不存在。"),
    ("tag.not_associated", "{tag} 標籤未與此公司關聯。"),
    ("name.too_long", "名稱超過 {max_chars} 個字元: {name}"),
    ("store.failure", "內部儲存錯誤。"),
    ("request.language_invalid", "不支援的語言: {value}"),
    ("request.body_invalid", "請求內容無效: {error}"),
    ("request.body_too_large", "請求內容超過 {limit} 位元組。"),
    ("request.query_missing", "缺少查詢參數: {name}"),
    ("request.query_invalid", "查詢字串無效: {error}"),
    ("cli.version", "company-directory {version}"),
    ("cli.config.load_failed", "無法載入設定: {error}"),
    ("cli.config.valid", "設定有效。"),
    ("cli.serve.init_failed", "無法初始化伺服器: {error}"),
    ("cli.serve.listening", "正在 {bind} 提供公司目錄 ({store} 儲存)。"),
    ("cli.serve.failed", "伺服器錯誤: {error}"),
    ("cli.output.write_failed", "無法寫入 {stream}: {error}"),
];

/// Returns the message catalog for the requested language.
fn catalog_for(language: LanguageCode) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_KO_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_JA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_TW_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match language {
        LanguageCode::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        LanguageCode::Ko => CATALOG_KO_MAP.get_or_init(|| CATALOG_KO.iter().copied().collect()),
        LanguageCode::Ja => CATALOG_JA_MAP.get_or_init(|| CATALOG_JA.iter().copied().collect()),
        LanguageCode::Tw => CATALOG_TW_MAP.get_or_init(|| CATALOG_TW.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` into `language` while substituting `args`.
#[must_use]
pub fn translate(language: LanguageCode, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(language)
        .get(key)
        .copied()
        .or_else(|| catalog_for(LanguageCode::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a language, a key, and named arguments.
///
/// # Arguments
///
/// - `$language` is the [`LanguageCode`] to render in.
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($language:expr, $key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($language, $key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================
