//! API shape tests: validates that response shapes match what the mobile
//! client expects, field by field.
//!
//! Route handlers serialize stored records directly, so these tests pin
//! both the record serialization and the literal wrapper shapes the
//! handlers build around them.

use asistan_store::{AssistantStore, CalendarEvent, ChatMessage, Note, Reminder};

/// Root and health probes: { message, version, status } and
/// { status, message }.
#[test]
fn test_root_and_health_shapes() {
    let root = serde_json::json!({
        "message": "Kişisel Asistan API",
        "version": "1.0.0",
        "status": "active",
    });
    assert_eq!(root["message"], "Kişisel Asistan API");
    assert!(root["version"].is_string());

    let health = serde_json::json!({
        "status": "healthy",
        "message": "API çalışıyor",
    });
    assert_eq!(health["status"], "healthy");
}

/// Notes are returned as full records. The client reads id, title,
/// content, user_id, is_voice_note, created_at and updated_at.
#[test]
fn test_note_record_shape() {
    let store = AssistantStore::in_memory().unwrap();
    let note = store.create_note("Market Listesi", "süt, ekmek", "default", false).unwrap();

    let json = serde_json::to_value(&note).unwrap();
    assert!(json["id"].is_string());
    assert_eq!(json["title"], "Market Listesi");
    assert_eq!(json["content"], "süt, ekmek");
    assert_eq!(json["user_id"], "default");
    assert_eq!(json["is_voice_note"], false);
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
}

/// POST /api/notes (query flavor) answers with a flat confirmation:
/// { id, title, content, message }.
#[test]
fn test_note_created_confirmation_shape() {
    let confirmation = serde_json::json!({
        "id": "b0a1",
        "title": "Yeni Not",
        "content": "deneme",
        "message": "Not başarıyla oluşturuldu",
    });
    assert!(confirmation["id"].is_string());
    assert_eq!(confirmation["message"], "Not başarıyla oluşturuldu");
}

/// GET /api/notes wraps the records: { notes: [...], count }.
#[test]
fn test_note_list_wrapper_shape() {
    let list = serde_json::json!({
        "notes": [],
        "count": 0,
    });
    assert!(list["notes"].is_array());
    assert!(list["count"].is_number());
}

/// Calendar events keep start_time and end_time as ISO strings.
#[test]
fn test_calendar_event_record_shape() {
    let store = AssistantStore::in_memory().unwrap();
    let event = store
        .create_event(
            "Takım Toplantısı",
            Some("Haftalık durum"),
            "2026-06-10T10:00:00",
            "2026-06-10T11:00:00",
            "default",
        )
        .unwrap();

    let json = serde_json::to_value(&event).unwrap();
    assert!(json["id"].is_string());
    assert_eq!(json["title"], "Takım Toplantısı");
    assert_eq!(json["description"], "Haftalık durum");
    assert_eq!(json["start_time"], "2026-06-10T10:00:00");
    assert_eq!(json["end_time"], "2026-06-10T11:00:00");
    assert_eq!(json["user_id"], "default");
    assert!(json["created_at"].is_string());
}

/// The chat pipeline embeds events as summary items:
/// { id, title, description, datetime, created_at }. `datetime` carries
/// the start time and `description` is never null.
#[test]
fn test_event_summary_item_shape() {
    let item = serde_json::json!({
        "id": "ev-1",
        "title": "Takım Toplantısı",
        "description": "",
        "datetime": "2026-06-10T10:00:00",
        "created_at": "2026-06-01T09:00:00",
    });
    assert!(item["datetime"].is_string());
    assert!(item["description"].is_string());
    assert!(item.get("start_time").is_none());
}

/// GET /api/calendar/events/today/{user} answers
/// { date, count, events } and the upcoming variant
/// { period_days, count, events }.
#[test]
fn test_calendar_window_wrapper_shapes() {
    let today = serde_json::json!({
        "date": "2026-06-10",
        "count": 1,
        "events": [],
    });
    assert!(today["date"].is_string());
    assert!(today["events"].is_array());

    let upcoming = serde_json::json!({
        "period_days": 7,
        "count": 0,
        "events": [],
    });
    assert!(upcoming["period_days"].is_number());
}

/// Reminder records expose is_completed so the client can filter.
#[test]
fn test_reminder_record_shape() {
    let store = AssistantStore::in_memory().unwrap();
    let reminder = store
        .create_reminder("İlaç", None, "2026-06-10T08:00:00", "default")
        .unwrap();

    let json = serde_json::to_value(&reminder).unwrap();
    assert!(json["id"].is_string());
    assert_eq!(json["title"], "İlaç");
    assert_eq!(json["description"], serde_json::Value::Null);
    assert_eq!(json["reminder_time"], "2026-06-10T08:00:00");
    assert_eq!(json["is_completed"], false);
}

/// POST /api/chat/message answers { response, message_id, timestamp }.
#[test]
fn test_chat_message_response_shape() {
    let response = serde_json::json!({
        "response": "✅ Notunuz başarıyla kaydedildi!\n📝 Başlık: Market Listesi\n🆔 Not ID: b0a1",
        "message_id": "8c5e7d1a-0000-0000-0000-000000000000",
        "timestamp": "2026-06-10T10:00:00",
    });
    assert!(response["response"].is_string());
    assert!(response["message_id"].is_string());
    assert!(response["timestamp"].is_string());
}

/// GET /api/chat/history/{user} wraps stored messages oldest first:
/// { user_id, count, messages: [{ id, user_id, user_message,
/// ai_response, intent, timestamp }] }.
#[test]
fn test_chat_history_shape() {
    let store = AssistantStore::in_memory().unwrap();
    store.save_chat_message("default", "Merhaba", "Merhaba!", "chat").unwrap();
    let messages = store.chat_history("default", 50).unwrap();

    let json = serde_json::json!({
        "user_id": "default",
        "count": messages.len(),
        "messages": messages,
    });
    assert_eq!(json["count"], 1);
    let first = &json["messages"][0];
    assert_eq!(first["user_message"], "Merhaba");
    assert_eq!(first["ai_response"], "Merhaba!");
    assert_eq!(first["intent"], "chat");
    assert!(first["timestamp"].is_string());
}

/// POST /api/chat/analyze-intent answers
/// { message, intent_analysis: { intent, confidence, entities }, timestamp }.
#[test]
fn test_intent_analysis_shape() {
    let analysis = serde_json::json!({
        "message": "yarın saat 14:00'da toplantı kur",
        "intent_analysis": {
            "intent": "calendar",
            "confidence": 0.9,
            "entities": {
                "title": "Yeni Toplantı",
                "datetime": "2026-06-11T14:00:00",
            },
        },
        "timestamp": "2026-06-10T10:00:00",
    });
    assert!(analysis["intent_analysis"]["intent"].is_string());
    assert!(analysis["intent_analysis"]["confidence"].is_number());
    assert!(analysis["intent_analysis"]["entities"].is_object());
}

/// GET /api/weather answers the flat report the client renders:
/// { city, country, temperature, condition, humidity, wind_speed,
/// pressure, feels_like, timestamp }. The POST variant renames
/// condition to description and drops feels_like.
#[test]
fn test_weather_report_shapes() {
    let report = serde_json::json!({
        "city": "İstanbul",
        "country": "TR",
        "temperature": 21.5,
        "condition": "açık",
        "humidity": 60,
        "wind_speed": 3.2,
        "pressure": 1013,
        "feels_like": 20.8,
        "timestamp": "2026-06-10T10:00:00",
    });
    assert!(report["temperature"].is_number());
    assert!(report["condition"].is_string());
    assert!(report["feels_like"].is_number());

    let posted = serde_json::json!({
        "city": "İstanbul",
        "country": "TR",
        "temperature": 21.5,
        "description": "açık",
        "humidity": 60,
        "wind_speed": 3.2,
        "pressure": 1013,
        "timestamp": "2026-06-10T10:00:00",
    });
    assert!(posted["description"].is_string());
    assert!(posted.get("feels_like").is_none());
    assert!(posted.get("condition").is_none());
}

/// Error responses carry a single detail field: { detail: "..." }.
#[test]
fn test_error_detail_shape() {
    let error = serde_json::json!({ "detail": "Not bulunamadı" });
    assert!(error["detail"].is_string());
    assert!(error.get("message").is_none());
}

/// Delete confirmations echo the removed id under a route specific key.
#[test]
fn test_delete_confirmation_shapes() {
    let note = serde_json::json!({
        "message": "Not başarıyla silindi",
        "deleted_note_id": "b0a1",
    });
    assert!(note["deleted_note_id"].is_string());

    let event = serde_json::json!({
        "message": "Etkinlik başarıyla silindi",
        "deleted_event_id": "ev-1",
    });
    assert!(event["deleted_event_id"].is_string());

    let reminder = serde_json::json!({
        "message": "Hatırlatıcı başarıyla silindi",
        "deleted_reminder_id": "rm-1",
    });
    assert!(reminder["deleted_reminder_id"].is_string());

    let history = serde_json::json!({
        "message": "Chat geçmişi başarıyla silindi",
        "user_id": "default",
    });
    assert!(history["user_id"].is_string());
}

/// Full records survive a serialize/deserialize round trip with the
/// exact field names above.
#[test]
fn test_record_field_names_are_stable() {
    let note: Note = serde_json::from_value(serde_json::json!({
        "id": "n1", "title": "t", "content": "c", "user_id": "default",
        "is_voice_note": false, "created_at": "2026-06-10T10:00:00",
        "updated_at": "2026-06-10T10:00:00",
    }))
    .unwrap();
    assert_eq!(note.title, "t");

    let event: CalendarEvent = serde_json::from_value(serde_json::json!({
        "id": "e1", "title": "t", "description": null,
        "start_time": "2026-06-10T10:00:00", "end_time": "2026-06-10T11:00:00",
        "user_id": "default", "created_at": "2026-06-10T09:00:00",
    }))
    .unwrap();
    assert!(event.description.is_none());

    let reminder: Reminder = serde_json::from_value(serde_json::json!({
        "id": "r1", "title": "t", "description": "d",
        "reminder_time": "2026-06-10T08:00:00", "user_id": "default",
        "is_completed": true, "created_at": "2026-06-09T08:00:00",
    }))
    .unwrap();
    assert!(reminder.is_completed);

    let message: ChatMessage = serde_json::from_value(serde_json::json!({
        "id": "m1", "user_id": "default", "user_message": "q",
        "ai_response": "a", "intent": "chat",
        "timestamp": "2026-06-10T10:00:00",
    }))
    .unwrap();
    assert_eq!(message.intent, "chat");
}
