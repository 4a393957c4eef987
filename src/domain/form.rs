mod field;
mod rules;

use std::sync::Arc;

use derive_more::{Display, Error};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};
use tracing::{debug, info, warn};

pub use self::field::*;

use super::{
    AvailabilityCheck, BookingWindow, DiningRegion, EventQueue, RegionCatalog, RegionConfig,
    ReservationRequest, SlotSchedule,
};

/// 1組の人数上限 (エリア未選択時)
pub const DEFAULT_MAX_PARTY_SIZE: u32 = 12;

pub const SLOT_UNAVAILABLE: &str = "Selected time slot is no longer available";

/// フォームの変更通知
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum FormEvent {
    /// 項目の値が変更された
    ValueChanged { field: FieldName },
    /// 項目が有効化/無効化された
    EnabledChanged { field: FieldName, enabled: bool },
    /// 人数の上限が変更された
    PartySizeLimitChanged { max: u32 },
    /// 誕生日のお名前の必須/任意が切り替わった
    BirthdayNameRequirementChanged { required: bool },
}

/// 送信結果
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "payload", rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// 入力に誤りがあるため送信しなかった
    Invalid,
    /// 送信処理中のため無視した
    Busy,
    /// 確認画面へ進む
    Navigate(ReservationPayload),
    /// 空席がない
    Rejected(String),
}

/// 確認画面へ渡す入力値 (無効化された項目は含まない)
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPayload {
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub party_size: u32,
    #[serde_as(as = "DisplayFromStr")]
    pub region: DiningRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking: Option<bool>,
    pub birthday: bool,
    pub birthday_name: String,
}

impl ReservationPayload {
    /// 無効化された項目は強制値 (0 / false) として扱う
    pub fn into_request(self) -> ReservationRequest {
        let birthday_name = match self.birthday_name.is_empty() {
            true => None,
            false => Some(self.birthday_name),
        };
        ReservationRequest {
            date: self.date,
            time: self.time,
            name: self.name,
            email: self.email,
            phone: self.phone,
            party_size: self.party_size,
            region: self.region,
            children_count: self.children_count.unwrap_or(0),
            smoking: self.smoking.unwrap_or(false),
            birthday: self.birthday,
            birthday_name,
        }
    }
}

#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[display(fmt = "Field {} is disabled for the selected region", _0)]
    FieldDisabled(#[error(not(source))] FieldName),
}

/// 予約フォームの入力検証
///
/// 値が変わるたびに [`FormEvent`] を発行し、登録されたハンドラを同期的に呼び出して
/// エリアや誕生日フラグに依存する制約を再計算する。
pub struct ReservationForm {
    catalog: Arc<RegionCatalog>,
    time_labels: Vec<String>,
    booking_window: BookingWindow,

    date: Field<String>,
    time: Field<String>,
    name: Field<String>,
    email: Field<String>,
    phone: Field<String>,
    party_size: Field<Option<u32>>,
    region: Field<String>,
    children_count: Field<Option<u32>>,
    smoking: Field<bool>,
    birthday: Field<bool>,
    birthday_name: Field<String>,

    party_size_max: u32,
    birthday_name_required: bool,
    submitting: bool,
    events: EventQueue<FormEvent>,
}

impl ReservationForm {
    pub fn new(catalog: Arc<RegionCatalog>, schedule: &SlotSchedule) -> Self {
        Self {
            catalog,
            time_labels: schedule.time_slots().into_iter().map(|s| s.time).collect(),
            booking_window: BookingWindow::default(),
            date: Field::new(String::new()),
            time: Field::new(String::new()),
            name: Field::new(String::new()),
            email: Field::new(String::new()),
            phone: Field::new(String::new()),
            party_size: Field::new(Some(1)),
            region: Field::new(String::new()),
            children_count: Field::new(Some(0)),
            smoking: Field::new(false),
            birthday: Field::new(false),
            birthday_name: Field::new(String::new()),
            party_size_max: DEFAULT_MAX_PARTY_SIZE,
            birthday_name_required: false,
            submitting: false,
            events: EventQueue::new(),
        }
    }

    pub fn with_booking_window(mut self, window: BookingWindow) -> Self {
        self.booking_window = window;
        self
    }

    /// エリア未選択時の人数上限
    pub fn with_default_max_party_size(mut self, max: u32) -> Self {
        if self.selected_region().is_none() {
            self.party_size_max = max;
        }
        self
    }

    pub fn regions(&self) -> &[RegionConfig] {
        self.catalog.list_regions()
    }

    pub fn time_labels(&self) -> &[String] {
        &self.time_labels
    }

    pub fn date(&self) -> &Field<String> {
        &self.date
    }

    pub fn time(&self) -> &Field<String> {
        &self.time
    }

    pub fn name(&self) -> &Field<String> {
        &self.name
    }

    pub fn email(&self) -> &Field<String> {
        &self.email
    }

    pub fn phone(&self) -> &Field<String> {
        &self.phone
    }

    pub fn party_size(&self) -> &Field<Option<u32>> {
        &self.party_size
    }

    pub fn region(&self) -> &Field<String> {
        &self.region
    }

    pub fn children_count(&self) -> &Field<Option<u32>> {
        &self.children_count
    }

    pub fn smoking(&self) -> &Field<bool> {
        &self.smoking
    }

    pub fn birthday(&self) -> &Field<bool> {
        &self.birthday
    }

    pub fn birthday_name(&self) -> &Field<String> {
        &self.birthday_name
    }

    pub fn party_size_max(&self) -> u32 {
        self.party_size_max
    }

    pub fn is_birthday_name_required(&self) -> bool {
        self.birthday_name_required
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.date.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Date,
        });
    }

    pub fn set_time(&mut self, value: impl Into<String>) {
        self.time.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Time,
        });
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Name,
        });
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Email,
        });
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Phone,
        });
    }

    pub fn set_party_size(&mut self, value: impl Into<Option<u32>>) {
        self.party_size.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::PartySize,
        });
    }

    pub fn set_region(&mut self, value: impl Into<String>) {
        self.region.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Region,
        });
    }

    pub fn set_children_count(&mut self, value: impl Into<Option<u32>>) -> Result<(), FormError> {
        if !self.children_count.is_enabled() {
            return Err(FormError::FieldDisabled(FieldName::ChildrenCount));
        }
        self.children_count.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::ChildrenCount,
        });
        Ok(())
    }

    pub fn set_smoking(&mut self, value: bool) -> Result<(), FormError> {
        if !self.smoking.is_enabled() {
            return Err(FormError::FieldDisabled(FieldName::Smoking));
        }
        self.smoking.set(value);
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Smoking,
        });
        Ok(())
    }

    pub fn set_birthday(&mut self, value: bool) {
        self.birthday.set(value);
        self.publish(FormEvent::ValueChanged {
            field: FieldName::Birthday,
        });
    }

    pub fn set_birthday_name(&mut self, value: impl Into<String>) {
        self.birthday_name.set(value.into());
        self.publish(FormEvent::ValueChanged {
            field: FieldName::BirthdayName,
        });
    }

    /// 項目からフォーカスが外れた
    pub fn touch(&mut self, field: FieldName) {
        match field {
            FieldName::Date => self.date.touch(),
            FieldName::Time => self.time.touch(),
            FieldName::Name => self.name.touch(),
            FieldName::Email => self.email.touch(),
            FieldName::Phone => self.phone.touch(),
            FieldName::PartySize => self.party_size.touch(),
            FieldName::Region => self.region.touch(),
            FieldName::ChildrenCount => self.children_count.touch(),
            FieldName::Smoking => self.smoking.touch(),
            FieldName::Birthday => self.birthday.touch(),
            FieldName::BirthdayName => self.birthday_name.touch(),
        }
    }

    pub fn mark_all_touched(&mut self) {
        for field in FieldName::ALL {
            self.touch(field);
        }
    }

    pub fn is_enabled(&self, field: FieldName) -> bool {
        match field {
            FieldName::ChildrenCount => self.children_count.is_enabled(),
            FieldName::Smoking => self.smoking.is_enabled(),
            _ => true,
        }
    }

    fn is_touched(&self, field: FieldName) -> bool {
        match field {
            FieldName::Date => self.date.is_touched(),
            FieldName::Time => self.time.is_touched(),
            FieldName::Name => self.name.is_touched(),
            FieldName::Email => self.email.is_touched(),
            FieldName::Phone => self.phone.is_touched(),
            FieldName::PartySize => self.party_size.is_touched(),
            FieldName::Region => self.region.is_touched(),
            FieldName::ChildrenCount => self.children_count.is_touched(),
            FieldName::Smoking => self.smoking.is_touched(),
            FieldName::Birthday => self.birthday.is_touched(),
            FieldName::BirthdayName => self.birthday_name.is_touched(),
        }
    }

    /// 項目の検証エラー。無効化された項目は検証しない
    pub fn errors(&self, field: FieldName) -> Vec<FieldError> {
        if !self.is_enabled(field) {
            return Vec::new();
        }
        let errors = match field {
            FieldName::Date => vec![
                rules::required(self.date.value()),
                (!self.date.value().is_empty() && !self.booking_window.contains(self.date.value()))
                    .then_some(FieldError::OutsideBookingWindow),
            ],
            FieldName::Time => vec![
                rules::required(self.time.value()),
                (!self.time.value().is_empty()
                    && !self.time_labels.iter().any(|t| t == self.time.value()))
                .then_some(FieldError::UnknownTimeSlot),
            ],
            FieldName::Name => vec![
                rules::required(self.name.value()),
                rules::min_length(self.name.value(), rules::NAME_MIN_LENGTH),
            ],
            FieldName::Email => vec![
                rules::required(self.email.value()),
                rules::email(self.email.value()),
            ],
            FieldName::Phone => vec![
                rules::required(self.phone.value()),
                rules::phone(self.phone.value()),
            ],
            FieldName::PartySize => vec![rules::bounded(
                *self.party_size.value(),
                rules::PARTY_MIN,
                Some(self.party_size_max),
            )],
            FieldName::Region => vec![
                rules::required(self.region.value()),
                (!self.region.value().is_empty() && self.selected_region().is_none())
                    .then_some(FieldError::UnknownRegion),
            ],
            FieldName::ChildrenCount => vec![rules::bounded(*self.children_count.value(), 0, None)],
            FieldName::Smoking | FieldName::Birthday => Vec::new(),
            FieldName::BirthdayName => vec![self
                .birthday_name_required
                .then(|| rules::required(self.birthday_name.value()))
                .flatten()],
        };
        errors.into_iter().flatten().collect()
    }

    pub fn status(&self, field: FieldName) -> FieldStatus {
        FieldStatus {
            field,
            enabled: self.is_enabled(field),
            touched: self.is_touched(field),
            errors: self.errors(field),
        }
    }

    pub fn statuses(&self) -> Vec<FieldStatus> {
        FieldName::ALL.into_iter().map(|f| self.status(f)).collect()
    }

    pub fn is_valid(&self) -> bool {
        FieldName::ALL.into_iter().all(|f| self.errors(f).is_empty())
    }

    /// 選択中のエリア設定 (未選択・不明なら `None`)
    pub fn selected_region(&self) -> Option<&RegionConfig> {
        self.catalog.resolve(self.region.value())
    }

    /// 送信用の入力値。エリアか人数が確定していなければ `None`
    pub fn payload(&self) -> Option<ReservationPayload> {
        let region = self.selected_region()?.id;
        let party_size = (*self.party_size.value())?;
        Some(ReservationPayload {
            date: self.date.value().clone(),
            time: self.time.value().clone(),
            name: self.name.value().clone(),
            email: self.email.value().clone(),
            phone: self.phone.value().clone(),
            party_size,
            region,
            children_count: match self.children_count.is_enabled() {
                true => Some(self.children_count.value().unwrap_or(0)),
                false => None,
            },
            smoking: self.smoking.is_enabled().then_some(*self.smoking.value()),
            birthday: *self.birthday.value(),
            birthday_name: self.birthday_name.value().clone(),
        })
    }

    /// 発行済みの変更通知を取り出す
    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        self.events.pop_all()
    }

    /// 送信する
    ///
    /// 入力に誤りがあれば全項目を触れた状態にして終わる。空席確認は送信中フラグを
    /// 立ててから行い、結果にかかわらずフラグを下ろす。予約の登録は行わない。
    pub fn on_submit<A: AvailabilityCheck + ?Sized>(&mut self, availability: &A) -> SubmitOutcome {
        if !self.is_valid() {
            self.mark_all_touched();
            debug!("入力に誤りがあるため送信しませんでした");
            return SubmitOutcome::Invalid;
        }
        if self.submitting {
            debug!("送信処理中のため無視しました");
            return SubmitOutcome::Busy;
        }
        self.submitting = true;
        let outcome = match self.payload() {
            Some(payload) => {
                if availability.check_availability(
                    &payload.date,
                    &payload.time,
                    payload.region,
                    payload.party_size,
                ) {
                    info!(
                        date = %payload.date,
                        time = %payload.time,
                        region = %payload.region,
                        party_size = payload.party_size,
                        "空席を確認しました。確認画面へ進みます"
                    );
                    SubmitOutcome::Navigate(payload)
                } else {
                    warn!(
                        date = %payload.date,
                        time = %payload.time,
                        region = %payload.region,
                        party_size = payload.party_size,
                        "{}",
                        SLOT_UNAVAILABLE
                    );
                    SubmitOutcome::Rejected(SLOT_UNAVAILABLE.to_owned())
                }
            }
            None => SubmitOutcome::Invalid,
        };
        self.submitting = false;
        outcome
    }

    fn publish(&mut self, event: FormEvent) {
        self.events.push(event.clone());
        match event {
            FormEvent::ValueChanged {
                field: FieldName::Region,
            } => self.on_region_changed(),
            FormEvent::ValueChanged {
                field: FieldName::Birthday,
            } => self.on_birthday_changed(),
            _ => {}
        }
    }

    fn on_birthday_changed(&mut self) {
        let required = *self.birthday.value();
        if self.birthday_name_required != required {
            self.birthday_name_required = required;
            self.publish(FormEvent::BirthdayNameRequirementChanged { required });
        }
    }

    fn on_region_changed(&mut self) {
        let Some(region) = self.selected_region().cloned() else {
            debug!(region = %self.region.value(), "不明なエリアのため制約は変更しません");
            return;
        };
        debug!(region = %region.id, "エリアに合わせて制約を再計算します");

        self.party_size_max = region.max_party_size;
        self.publish(FormEvent::PartySizeLimitChanged {
            max: region.max_party_size,
        });

        if !region.allows_children && *self.children_count.value() != Some(0) {
            self.children_count.set(Some(0));
            self.publish(FormEvent::ValueChanged {
                field: FieldName::ChildrenCount,
            });
        }
        self.set_field_enabled(FieldName::ChildrenCount, region.allows_children);

        if !region.allows_smoking && *self.smoking.value() {
            self.smoking.set(false);
            self.publish(FormEvent::ValueChanged {
                field: FieldName::Smoking,
            });
        }
        self.set_field_enabled(FieldName::Smoking, region.allows_smoking);
    }

    fn set_field_enabled(&mut self, field: FieldName, enabled: bool) {
        let changed = match field {
            FieldName::ChildrenCount => {
                let changed = self.children_count.is_enabled() != enabled;
                self.children_count.set_enabled(enabled);
                changed
            }
            FieldName::Smoking => {
                let changed = self.smoking.is_enabled() != enabled;
                self.smoking.set_enabled(enabled);
                changed
            }
            _ => false,
        };
        if changed {
            self.publish(FormEvent::EnabledChanged { field, enabled });
        }
    }
}
