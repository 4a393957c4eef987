use std::{error::Error, io::Read, sync::Arc};

use diner::{
    domain::{
        AvailabilityStore, FieldStatus, RegionCatalog, ReservationForm, SlotSchedule,
        SubmitOutcome,
    },
    DinerConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn, Level};

fn main() {
    match DinerConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .with_writer(std::io::stderr)
                .init();
            if let Err(error) = run(&config) {
                error!("アプリケーションエラー: {}", error);
                std::process::exit(1);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .init();
            error!("設定の読み込みに失敗しました: {}", error);
            std::process::exit(1);
        }
    }
}

/// 標準入力で受け取る入力値 (指定された項目だけ反映する)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FormInput {
    date: Option<String>,
    time: Option<String>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    region: Option<String>,
    party_size: Option<u32>,
    children_count: Option<u32>,
    smoking: Option<bool>,
    birthday: Option<bool>,
    birthday_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    outcome: SubmitOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldStatus>,
}

fn run(config: &DinerConfig) -> Result<(), Box<dyn Error>> {
    let catalog = Arc::new(RegionCatalog::default());
    let schedule = config.slot_schedule()?;
    let store = AvailabilityStore::new(catalog.clone(), schedule);

    match std::env::args().nth(1).as_deref() {
        Some("regions") => print(&catalog.list_regions()),
        Some("slots") => print(&store.get_time_slots()),
        Some(other) => Err(format!("unknown command: {other}").into()),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            let input = serde_json::from_str::<FormInput>(&buf)?;
            let mut form = build_form(catalog, &schedule, config);
            apply(&mut form, input);
            let outcome = form.on_submit(&store);
            let errors = form
                .statuses()
                .into_iter()
                .filter(|s| !s.is_valid())
                .collect();
            print(&Report { outcome, errors })
        }
    }
}

fn build_form(
    catalog: Arc<RegionCatalog>,
    schedule: &SlotSchedule,
    config: &DinerConfig,
) -> ReservationForm {
    let form = ReservationForm::new(catalog, schedule)
        .with_default_max_party_size(config.form.default_max_party_size);
    match config.booking_window() {
        Some(window) => form.with_booking_window(window),
        None => form,
    }
}

/// エリアを先に反映し、人数の上限や子供・喫煙の制約が適用された状態で残りを入力する
fn apply(form: &mut ReservationForm, input: FormInput) {
    if let Some(x) = input.region {
        form.set_region(x);
    }
    if let Some(x) = input.date {
        form.set_date(x);
    }
    if let Some(x) = input.time {
        form.set_time(x);
    }
    if let Some(x) = input.name {
        form.set_name(x);
    }
    if let Some(x) = input.email {
        form.set_email(x);
    }
    if let Some(x) = input.phone {
        form.set_phone(x);
    }
    if let Some(x) = input.party_size {
        form.set_party_size(x);
    }
    if let Some(x) = input.children_count {
        if let Err(e) = form.set_children_count(x) {
            warn!("{}", e);
        }
    }
    if let Some(x) = input.smoking {
        if let Err(e) = form.set_smoking(x) {
            warn!("{}", e);
        }
    }
    if let Some(x) = input.birthday {
        form.set_birthday(x);
    }
    if let Some(x) = input.birthday_name {
        form.set_birthday_name(x);
    }
    info!("入力を反映しました: {} 件の変更", form.drain_events().len());
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
