use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::domain::Id;

use super::DiningRegion;

/// 予約ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct ReservationId(u64);

impl Id for ReservationId {
    type Inner = u64;
}

/// 受付前の予約リクエスト
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub party_size: u32,
    #[serde_as(as = "DisplayFromStr")]
    pub region: DiningRegion,
    pub children_count: u32,
    pub smoking: bool,
    pub birthday: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday_name: Option<String>,
}

/// 受付済みの予約 (作成後は変更しない)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    #[serde(flatten)]
    request: ReservationRequest,
}

impl Reservation {
    pub fn new(id: ReservationId, request: ReservationRequest) -> Self {
        Self { id, request }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn request(&self) -> &ReservationRequest {
        &self.request
    }

    pub fn date(&self) -> &str {
        &self.request.date
    }

    pub fn time(&self) -> &str {
        &self.request.time
    }

    pub fn region(&self) -> DiningRegion {
        self.request.region
    }

    pub fn party_size(&self) -> u32 {
        self.request.party_size
    }

    /// 同じ日付・時間帯・エリアの予約かどうか
    pub fn occupies(&self, date: &str, time: &str, region: DiningRegion) -> bool {
        self.request.date == date && self.request.time == time && self.request.region == region
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn request(
        date: &str,
        time: &str,
        region: DiningRegion,
        party_size: u32,
    ) -> ReservationRequest {
        ReservationRequest {
            date: date.to_owned(),
            time: time.to_owned(),
            name: "Test".to_owned(),
            email: "test@test.com".to_owned(),
            phone: "1234567890".to_owned(),
            party_size,
            region,
            children_count: 0,
            smoking: false,
            birthday: false,
            birthday_name: None,
        }
    }

    #[test]
    fn test_occupies_matches_exactly() {
        let reservation = Reservation::new(
            ReservationId::from(1),
            request("2024-07-24", "18:00", DiningRegion::Bar, 4),
        );
        assert!(reservation.occupies("2024-07-24", "18:00", DiningRegion::Bar));
        assert!(!reservation.occupies("2024-07-24", "18:30", DiningRegion::Bar));
        assert!(!reservation.occupies("2024-07-25", "18:00", DiningRegion::Bar));
        assert!(!reservation.occupies("2024-07-24", "18:00", DiningRegion::MainHall));
        assert!(!reservation.occupies("2024-07-24", "18:00 ", DiningRegion::Bar));
    }

    #[test]
    fn test_reservation_serializes_region_identifier() {
        let reservation = Reservation::new(
            ReservationId::from(7),
            request("2024-07-24", "18:00", DiningRegion::RiversideSmoking, 2),
        );
        let json = serde_json::to_value(&reservation).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["region"], "riverside-smoking");
        assert_eq!(json["partySize"], 2);
        assert!(json.get("birthdayName").is_none());
    }
}
