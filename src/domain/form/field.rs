use derive_more::Display;
use serde::Serialize;

/// フォームの項目名
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "time")]
    Time,
    #[display(fmt = "name")]
    Name,
    #[display(fmt = "email")]
    Email,
    #[display(fmt = "phone")]
    Phone,
    #[display(fmt = "partySize")]
    PartySize,
    #[display(fmt = "region")]
    Region,
    #[display(fmt = "childrenCount")]
    ChildrenCount,
    #[display(fmt = "smoking")]
    Smoking,
    #[display(fmt = "birthday")]
    Birthday,
    #[display(fmt = "birthdayName")]
    BirthdayName,
}

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        FieldName::Date,
        FieldName::Time,
        FieldName::Name,
        FieldName::Email,
        FieldName::Phone,
        FieldName::PartySize,
        FieldName::Region,
        FieldName::ChildrenCount,
        FieldName::Smoking,
        FieldName::Birthday,
        FieldName::BirthdayName,
    ];
}

/// 値と有効/無効を明示的に持つ入力項目
///
/// 無効化された項目も値を保持する。強制された値 (0 / false) がそのまま送信上の値になる。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field<T> {
    value: T,
    enabled: bool,
    touched: bool,
}

impl<T> Field<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            enabled: true,
            touched: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub(super) fn set(&mut self, value: T) {
        self.value = value;
    }

    pub(super) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(super) fn touch(&mut self) {
        self.touched = true;
    }
}

/// 項目単位の検証エラー
#[derive(Clone, Debug, PartialEq, Eq, Display, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldError {
    #[display(fmt = "This field is required")]
    Required,
    #[display(fmt = "Must be at least {} characters", required)]
    MinLength { required: usize, actual: usize },
    #[display(fmt = "Please enter a valid email address")]
    Email,
    #[display(fmt = "Please enter a valid 10-digit phone number")]
    Phone,
    #[display(fmt = "Must be at least {}", min)]
    Min { min: u32, actual: u32 },
    #[display(fmt = "Must be at most {}", max)]
    Max { max: u32, actual: u32 },
    #[display(fmt = "Please select a dining region")]
    UnknownRegion,
    #[display(fmt = "Please select an available time")]
    UnknownTimeSlot,
    #[display(fmt = "Date is outside the booking period")]
    OutsideBookingWindow,
}

/// 表示層に渡す項目の状態
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatus {
    pub field: FieldName,
    pub enabled: bool,
    pub touched: bool,
    pub errors: Vec<FieldError>,
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 触れられた項目のエラーだけを表示する
    pub fn visible_errors(&self) -> &[FieldError] {
        if self.touched {
            &self.errors
        } else {
            &[]
        }
    }
}
