use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::{
    DiningRegion, IdGenerator, RegionCatalog, Reservation, ReservationId, ReservationRequest,
    SlotSchedule, TimeSlot,
};

/// 空き状況の問い合わせ
///
/// 予約フォームの送信処理はこのトレイト越しに空席を確認する。
pub trait AvailabilityCheck {
    /// 指定した日付・時間帯・エリアに `party_size` 名が入れるかどうか
    fn check_availability(
        &self,
        date: &str,
        time: &str,
        region: DiningRegion,
        party_size: u32,
    ) -> bool;
}

/// 受付済み予約のインメモリストア
///
/// 予約一覧は `Mutex` で保護された単一書き込み者のコンテナ。
/// `check_availability` と `add_reservation` は別々の呼び出しであり、
/// 複数の呼び出し元が同時に確認してから追加すると定員を超え得る。
/// 同時実行に対応する場合はストアの前段に書き込みキューを置くか、
/// 確認と追加を一つの操作にまとめる必要がある。
pub struct AvailabilityStore {
    catalog: Arc<RegionCatalog>,
    schedule: SlotSchedule,
    reservations: Mutex<Vec<Reservation>>,
    ids: Mutex<IdGenerator>,
}

impl AvailabilityStore {
    pub fn new(catalog: Arc<RegionCatalog>, schedule: SlotSchedule) -> Self {
        Self {
            catalog,
            schedule,
            reservations: Mutex::new(Vec::new()),
            ids: Mutex::new(IdGenerator::default()),
        }
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// 表示用の時間帯カタログ (予約状況とは無関係)
    pub fn get_time_slots(&self) -> Vec<TimeSlot> {
        self.schedule.time_slots()
    }

    /// 予約を無条件に追加する。空席確認は呼び出し側の責務
    pub fn add_reservation(&self, reservation: Reservation) {
        info!(
            id = %reservation.id(),
            date = reservation.date(),
            time = reservation.time(),
            region = %reservation.region(),
            party_size = reservation.party_size(),
            "予約を受け付けました"
        );
        self.lock().push(reservation);
    }

    /// 新しいIDを採番して予約を追加する。空席確認は行わない
    pub fn admit(&self, request: ReservationRequest) -> Reservation {
        let id: ReservationId = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate();
        let reservation = Reservation::new(id, request);
        self.add_reservation(reservation.clone());
        reservation
    }

    /// 受付順の予約一覧のコピー
    pub fn get_reservations(&self) -> Vec<Reservation> {
        self.lock().clone()
    }

    /// 同じ日付・時間帯・エリアの予約人数の合計 (`u32` を超えても溢れない)
    pub fn occupied_seats(&self, date: &str, time: &str, region: DiningRegion) -> u64 {
        self.lock()
            .iter()
            .filter(|r| r.occupies(date, time, region))
            .map(|r| u64::from(r.party_size()))
            .sum()
    }

    /// 残席数。エリアがカタログに無ければ `None`
    pub fn remaining_seats(&self, date: &str, time: &str, region: DiningRegion) -> Option<u32> {
        let config = self.catalog.get(region)?;
        let remaining = u64::from(config.max_capacity)
            .saturating_sub(self.occupied_seats(date, time, region));
        Some(u32::try_from(remaining).unwrap_or(config.max_capacity))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Reservation>> {
        self.reservations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl AvailabilityCheck for AvailabilityStore {
    fn check_availability(
        &self,
        date: &str,
        time: &str,
        region: DiningRegion,
        party_size: u32,
    ) -> bool {
        let Some(config) = self.catalog.get(region) else {
            debug!(%region, "カタログに無いエリアです");
            return false;
        };
        if party_size > config.max_party_size {
            debug!(%region, party_size, max = config.max_party_size, "1組の上限人数を超えています");
            return false;
        }
        let occupied = self.occupied_seats(date, time, region);
        let available = occupied + u64::from(party_size) <= u64::from(config.max_capacity);
        debug!(
            date,
            time,
            %region,
            occupied,
            party_size,
            capacity = config.max_capacity,
            available,
            "空席を確認しました"
        );
        available
    }
}

impl Default for AvailabilityStore {
    fn default() -> Self {
        Self::new(Arc::new(RegionCatalog::default()), SlotSchedule::default())
    }
}
