//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum nickname length in characters
pub const MAX_NICKNAME_LENGTH: usize = 32;

/// Nickname value object.
///
/// Represents the display name of a chat participant. A nickname never
/// contains `:` because `FROM:<nick>:<text>` is split on the first colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nickname(String);

impl Nickname {
    /// Create a new Nickname.
    ///
    /// # Arguments
    ///
    /// * `name` - The requested nickname
    ///
    /// # Returns
    ///
    /// A Result containing the Nickname or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::NicknameEmpty);
        }
        let len = name.chars().count();
        if len > MAX_NICKNAME_LENGTH {
            return Err(ValueObjectError::NicknameTooLong {
                max: MAX_NICKNAME_LENGTH,
                actual: len,
            });
        }
        if let Some(c) = name.chars().find(|&c| c == ':' || c.is_control()) {
            return Err(ValueObjectError::NicknameInvalidCharacter(c));
        }
        Ok(Self(name))
    }

    /// Server-generated guest name (`Guest<N>`).
    pub(crate) fn guest(number: u64) -> Self {
        Self(format!("Guest{number}"))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat message text value object.
///
/// Length is already bounded by the frame assembler's line cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_new_success() {
        // テスト項目: 有効なニックネームを作成できる
        // given (前提条件):
        let name = "alice".to_string();

        // when (操作):
        let result = Nickname::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_nickname_new_empty_fails() {
        // テスト項目: 空のニックネームは作成できない
        // when (操作):
        let result = Nickname::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::NicknameEmpty);
    }

    #[test]
    fn test_nickname_new_too_long_fails() {
        // テスト項目: 33 文字以上のニックネームは作成できない
        // given (前提条件):
        let name = "a".repeat(33);

        // when (操作):
        let result = Nickname::new(name);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::NicknameTooLong {
                max: 32,
                actual: 33
            }
        );
    }

    #[test]
    fn test_nickname_counts_characters_not_bytes() {
        // テスト項目: 長さはバイト数ではなく文字数で数える
        // given (前提条件):
        let name = "あ".repeat(32);

        // then (期待する結果):
        assert!(Nickname::new(name).is_ok());
    }

    #[test]
    fn test_nickname_rejects_colon_and_control() {
        // テスト項目: コロンや制御文字を含むニックネームは作成できない
        // then (期待する結果):
        assert_eq!(
            Nickname::new("al:ice".to_string()).unwrap_err(),
            ValueObjectError::NicknameInvalidCharacter(':')
        );
        assert_eq!(
            Nickname::new("bob\r".to_string()).unwrap_err(),
            ValueObjectError::NicknameInvalidCharacter('\r')
        );
    }

    #[test]
    fn test_guest_nickname_format() {
        // テスト項目: ゲスト名は Guest<N> 形式になる
        // then (期待する結果):
        assert_eq!(Nickname::guest(7).as_str(), "Guest7");
    }

    #[test]
    fn test_message_text_new() {
        // テスト項目: 空でないメッセージは作成でき、空のメッセージは作成できない
        // then (期待する結果):
        assert_eq!(
            MessageText::new("hello: world".to_string()).unwrap().as_str(),
            "hello: world"
        );
        assert_eq!(
            MessageText::new(String::new()).unwrap_err(),
            ValueObjectError::MessageTextEmpty
        );
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }
}
