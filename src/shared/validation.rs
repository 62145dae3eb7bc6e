use serde::{Deserialize, Serialize};
use std::fmt;

/// フォーム境界で検出するバリデーション失敗理由。
/// ここで弾かれた入力はゲートウェイ呼び出しに到達しない。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValidationFailureKind {
    /// 汎用的なバリデーションエラー。
    Generic,
    /// 表示名が短すぎる場合。
    NameTooShort,
    /// ユーザー名が短すぎる場合。
    UsernameTooShort,
    /// メールアドレスの形式が不正な場合。
    EmailInvalid,
    /// パスワードが規定長に満たない場合。
    PasswordTooShort,
    /// キャプションが許容範囲（5〜2200文字）を外れた場合。
    CaptionLength,
    /// ロケーションが許容範囲（2〜100文字）を外れた場合。
    LocationLength,
}

impl ValidationFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationFailureKind::Generic => "generic",
            ValidationFailureKind::NameTooShort => "name_too_short",
            ValidationFailureKind::UsernameTooShort => "username_too_short",
            ValidationFailureKind::EmailInvalid => "email_invalid",
            ValidationFailureKind::PasswordTooShort => "password_too_short",
            ValidationFailureKind::CaptionLength => "caption_length",
            ValidationFailureKind::LocationLength => "location_length",
        }
    }
}

impl fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_USERNAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const CAPTION_RANGE: std::ops::RangeInclusive<usize> = 5..=2200;
pub const LOCATION_RANGE: std::ops::RangeInclusive<usize> = 2..=100;

/// ローカル部とドメイン部が揃った形式かどうかの簡易チェック。
pub fn is_well_formed_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// 文字数（バイト数ではなく `char` 単位）が範囲内かどうか。
pub fn char_len_in(value: &str, range: &std::ops::RangeInclusive<usize>) -> bool {
    range.contains(&value.chars().count())
}
