//! Sample data loader for demos and manual testing.

use anyhow::Result;
use chrono::{Duration, Local, NaiveTime};
use tracing::info;

use asistan_store::AssistantStore;

pub struct SeedReport {
    pub notes: usize,
    pub events: usize,
}

const SAMPLE_NOTES: [(&str, &str); 7] = [
    (
        "Bitirme Projesi",
        "AI asistan uygulaması geliştiriliyor. React Native + Rust backend kullanılıyor.",
    ),
    (
        "Market Listesi",
        "Süt, ekmek, peynir, domates, yumurta, makarna, salatalık",
    ),
    (
        "Toplantı Notları",
        "Proje ilerlemesi: %85 tamamlandı. Kalan işler: UI düzenlemeleri, test edilmesi",
    ),
    (
        "Günlük Hedefler",
        "1. Kod review yap\n2. Hata düzeltmeleri\n3. Dokümantasyon güncelle\n4. Test senaryoları hazırla",
    ),
    (
        "Kitap Önerileri",
        "Clean Code - Robert Martin\nDesign Patterns - Gang of Four\nRefactoring - Martin Fowler",
    ),
    (
        "Fitness Planı",
        "Pazartesi: Göğüs\nSalı: Sırt\nÇarşamba: Dinlenme\nPerşembe: Bacak\nCuma: Omuz ve kol",
    ),
    (
        "Önemli Linkler",
        "GitHub repo: https://github.com/...\nAPI docs: https://docs.api.com/",
    ),
];

struct SampleEvent {
    title: &'static str,
    days_ahead: i64,
    hour: u32,
    minute: u32,
    description: &'static str,
}

const SAMPLE_EVENTS: [SampleEvent; 7] = [
    SampleEvent {
        title: "Bitirme Projesi Sunumu",
        days_ahead: 3,
        hour: 14,
        minute: 0,
        description: "Final sunumu için hazırlık. Sunum 30 dakika sürecek.",
    },
    SampleEvent {
        title: "Takım Toplantısı",
        days_ahead: 1,
        hour: 10,
        minute: 0,
        description: "Haftalık takım toplantısı. Proje ilerlemesi değerlendirilecek.",
    },
    SampleEvent {
        title: "Doktor Randevusu",
        days_ahead: 5,
        hour: 15,
        minute: 30,
        description: "Genel sağlık kontrolü. Dr. Ahmet Yılmaz ile.",
    },
    SampleEvent {
        title: "Kod Review",
        days_ahead: 2,
        hour: 16,
        minute: 0,
        description: "Backend kodlarının incelenmesi. Erencan ve Selin katılacak.",
    },
    SampleEvent {
        title: "Öğle Yemeği",
        days_ahead: 4,
        hour: 12,
        minute: 30,
        description: "Arkadaşlarla öğle yemeği. Restoran: Sultanahmet Köftecisi",
    },
    SampleEvent {
        title: "Spor Antrenmanı",
        days_ahead: 6,
        hour: 18,
        minute: 0,
        description: "Haftalık fitness antrenmanı. Bacak günü.",
    },
    SampleEvent {
        title: "Proje Teslimi",
        days_ahead: 7,
        hour: 17,
        minute: 0,
        description: "Bitirme projesi final teslimi. Tüm belgeler hazır olmalı.",
    },
];

/// Insert the sample notes and events for the `default` user.
pub fn load_sample_data(store: &AssistantStore) -> Result<SeedReport> {
    for (title, content) in SAMPLE_NOTES {
        let note = store.create_note(title, content, "default", false)?;
        info!("Not eklendi: {} ({})", note.title, note.id);
    }

    let today = Local::now().date_naive();
    for event in &SAMPLE_EVENTS {
        let time = NaiveTime::from_hms_opt(event.hour, event.minute, 0).unwrap_or_default();
        let start = (today + Duration::days(event.days_ahead)).and_time(time);
        let end = start + Duration::hours(1);
        let created = store.create_event(
            event.title,
            Some(event.description),
            &start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            &end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "default",
        )?;
        info!("Etkinlik eklendi: {} ({})", created.title, created.id);
    }

    Ok(SeedReport {
        notes: SAMPLE_NOTES.len(),
        events: SAMPLE_EVENTS.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_seed_populates_store() {
        let dir = TempDir::new().unwrap();
        let store = AssistantStore::open(dir.path()).unwrap();

        let report = load_sample_data(&store).unwrap();
        assert_eq!(report.notes, 7);
        assert_eq!(report.events, 7);

        let notes = store.list_notes(Some("default")).unwrap();
        assert_eq!(notes.len(), 7);
        assert!(notes.iter().any(|n| n.title == "Market Listesi"));

        let events = store.events_for_user("default").unwrap();
        assert_eq!(events.len(), 7);
        // sorted by start time, so tomorrow's team meeting comes first
        assert_eq!(events[0].title, "Takım Toplantısı");
        assert_eq!(events[6].title, "Proje Teslimi");
    }
}
