//! Chat endpoints: the assistant pipeline.
//!
//! `/chat/message` runs the whole flow for one message: classify the
//! intent, extract slots, gather calendar and weather context, perform
//! the side effects the message asks for (save a note, create an event)
//! and answer. Deterministic Turkish replies cover the actions and the
//! common questions; everything else goes to the generative model with
//! the gathered context attached.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use asistan_nlu::text::lower_tr;
use asistan_nlu::{
    contains_calendar_keyword, contains_note_keyword, detect_city, extract_entities,
    resolve_datetime, to_iso, Classifier, EntityBag, Intent, FALLBACK_NOTE_TITLE,
};
use asistan_store::{now_iso, parse_iso};

use super::calendar::event_summary;
use super::internal_error;
use super::weather::report_payload;
use crate::state::AppState;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Messages mentioning any of these get calendar context even when the
/// classifier said something else.
const CALENDAR_CONTEXT_KEYWORDS: [&str; 3] = ["toplantı", "etkinlik", "takvim"];

/// How long a fetched weather report stays usable.
const WEATHER_CACHE_MINUTES: i64 = 30;

/// How many events a calendar answer lists at most.
const CALENDAR_ANSWER_LIMIT: usize = 5;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/message", post(send_message))
        .route(
            "/chat/history/{user_id}",
            get(get_history).delete(clear_history),
        )
        .route("/chat/analyze-intent", post(analyze_intent))
        .route("/chat/health", get(chat_health))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default = "default_message_type")]
    message_type: String,
    user_id: Option<String>,
}

fn default_message_type() -> String {
    "text".to_string()
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

// ---------------------------------------------------------------
// POST /chat/message
// ---------------------------------------------------------------

async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let user_id = req.user_id.as_deref().unwrap_or("default");
    let lowered = lower_tr(&req.message);
    let now = Local::now().naive_local();

    let analysis = state.classifier.classify(&req.message).await;
    let entities = analysis
        .entities
        .clone()
        .merged_with(extract_entities(&req.message, analysis.intent, now));
    debug!(
        "Message classified as {} ({:.2})",
        analysis.intent.as_str(),
        analysis.confidence
    );

    let mut context = serde_json::Map::new();

    if analysis.intent == Intent::Calendar
        || CALENDAR_CONTEXT_KEYWORDS.iter().any(|k| lowered.contains(k))
    {
        calendar_context(&state, &lowered, now, &mut context);
    }
    if analysis.intent == Intent::Weather || lowered.contains("hava") {
        weather_context(&state, &req.message, &entities, &mut context).await;
    }
    if analysis.intent == Intent::Note || contains_note_keyword(&req.message) {
        capture_note(&state, &req, &entities, user_id, &mut context);
    }
    if analysis.intent == Intent::Calendar || contains_calendar_keyword(&req.message) {
        capture_event(&state, &req.message, &entities, user_id, now, &mut context);
    }

    let reply = match smart_reply(&lowered, analysis.intent, &entities, &context) {
        Some(text) => text,
        None => {
            let context_json = if context.is_empty() {
                None
            } else {
                serde_json::to_string(&context).ok()
            };
            state
                .gemini
                .generate_response(&req.message, context_json.as_deref())
                .await
        }
    };

    // History is best effort, the reply still goes out if the write fails.
    if let Err(err) =
        state
            .store
            .save_chat_message(user_id, &req.message, &reply, analysis.intent.as_str())
    {
        warn!("Chat message not persisted: {}", err);
    }

    (
        StatusCode::OK,
        Json(json!({
            "response": reply,
            "message_id": Uuid::new_v4().to_string(),
            "timestamp": now_iso(),
        })),
    )
}

// ---------------------------------------------------------------
// Context gathering and side effects
// ---------------------------------------------------------------

/// All events as summary items, plus a `tomorrow_events` list when the
/// message mentions tomorrow. A store failure degrades to an empty list.
fn calendar_context(
    state: &AppState,
    lowered: &str,
    now: NaiveDateTime,
    context: &mut serde_json::Map<String, serde_json::Value>,
) {
    let events = match state.store.all_events() {
        Ok(events) => events,
        Err(err) => {
            warn!("Calendar context unavailable: {}", err);
            Vec::new()
        }
    };

    let summaries: Vec<serde_json::Value> = events.iter().map(event_summary).collect();
    context.insert(
        "calendar".to_string(),
        json!({ "events": summaries, "count": summaries.len() }),
    );

    if lowered.contains("yarın") {
        let tomorrow = (now + Duration::days(1)).date();
        let tomorrow_events: Vec<serde_json::Value> = events
            .iter()
            .filter(|e| parse_iso(&e.start_time).map_or(false, |t| t.date() == tomorrow))
            .map(event_summary)
            .collect();
        context.insert("tomorrow_events".to_string(), json!(tomorrow_events));
    }
}

/// Current weather for the city the message names, the slot extractor
/// found, or the configured default. Served from the cache when fresh;
/// a miss fetches and refills it. Failures leave the context untouched.
async fn weather_context(
    state: &AppState,
    message: &str,
    entities: &EntityBag,
    context: &mut serde_json::Map<String, serde_json::Value>,
) {
    let city = entities
        .location
        .clone()
        .or_else(|| detect_city(message))
        .unwrap_or_else(|| state.config.default_city.clone());

    let now = now_iso();
    match state.store.cached_weather(&city, &now) {
        Ok(Some(cached)) => {
            debug!("Weather cache hit for {}", city);
            context.insert("weather".to_string(), cached);
            return;
        }
        Ok(None) => {}
        Err(err) => warn!("Weather cache lookup failed: {}", err),
    }

    match state.weather.current(&city, None).await {
        Ok(report) => {
            let payload = report_payload(&report);
            let expires_at = Local::now().naive_local() + Duration::minutes(WEATHER_CACHE_MINUTES);
            let expires = expires_at.format(ISO_FORMAT).to_string();
            if let Err(err) = state.store.cache_weather(&city, &payload, &now, &expires) {
                warn!("Weather cache write failed: {}", err);
            }
            context.insert("weather".to_string(), payload);
        }
        Err(err) => debug!("Weather context unavailable: {}", err),
    }
}

/// Persist the message as a note. Title and content fall back to the
/// extractor defaults and the raw message.
fn capture_note(
    state: &AppState,
    req: &ChatRequest,
    entities: &EntityBag,
    user_id: &str,
    context: &mut serde_json::Map<String, serde_json::Value>,
) {
    let title = entities
        .title
        .clone()
        .unwrap_or_else(|| FALLBACK_NOTE_TITLE.to_string());
    let content = entities.content.clone().unwrap_or_else(|| req.message.clone());
    let is_voice = req.message_type == "voice";

    match state.store.create_note(&title, &content, user_id, is_voice) {
        Ok(note) => {
            context.insert(
                "note_saved".to_string(),
                json!({ "id": note.id, "title": note.title, "content": note.content }),
            );
        }
        Err(err) => warn!("Note capture failed: {}", err),
    }
}

/// Create a one hour event from the extracted slots. A missing or
/// unparseable time falls back to one hour from now.
fn capture_event(
    state: &AppState,
    message: &str,
    entities: &EntityBag,
    user_id: &str,
    now: NaiveDateTime,
    context: &mut serde_json::Map<String, serde_json::Value>,
) {
    let title = entities
        .title
        .clone()
        .unwrap_or_else(|| "Yeni Etkinlik".to_string());
    let datetime_str = entities
        .datetime
        .clone()
        .unwrap_or_else(|| to_iso(resolve_datetime(message, now)));
    let description = entities.description.clone().unwrap_or_default();

    let start = parse_iso(&datetime_str).unwrap_or_else(|| now + Duration::hours(1));
    let end = start + Duration::hours(1);

    match state.store.create_event(
        &title,
        Some(&description),
        &start.format(ISO_FORMAT).to_string(),
        &end.format(ISO_FORMAT).to_string(),
        user_id,
    ) {
        Ok(event) => {
            context.insert("event_created".to_string(), event_summary(&event));
        }
        Err(err) => warn!("Event capture failed: {}", err),
    }
}

// ---------------------------------------------------------------
// Deterministic replies
// ---------------------------------------------------------------

/// Canned Turkish replies for completed actions, calendar questions,
/// weather questions and underspecified intents. `None` means the
/// generative model should answer.
fn smart_reply(
    lowered: &str,
    intent: Intent,
    entities: &EntityBag,
    context: &serde_json::Map<String, serde_json::Value>,
) -> Option<String> {
    if let Some(event) = context.get("event_created") {
        let formatted = match event.get("datetime").and_then(|v| v.as_str()) {
            Some(raw) if !raw.is_empty() => parse_iso(raw)
                .map(|t| t.format("%d.%m.%Y %H:%M").to_string())
                .unwrap_or_else(|| raw.to_string()),
            _ => "Belirtilmemiş".to_string(),
        };
        return Some(format!(
            "📅 Etkinliğiniz başarıyla oluşturuldu!\n🎯 Başlık: {}\n⏰ Tarih/Saat: {}\n🆔 Etkinlik ID: {}",
            field_or(event, "title", "Başlıksız"),
            formatted,
            field_or(event, "id", "Bilinmiyor"),
        ));
    }

    if let Some(note) = context.get("note_saved") {
        return Some(format!(
            "✅ Notunuz başarıyla kaydedildi!\n📝 Başlık: {}\n🆔 Not ID: {}",
            field_or(note, "title", "Başlıksız"),
            field_or(note, "id", "Bilinmiyor"),
        ));
    }

    let asks_for_events = lowered.contains("toplantı var mı")
        || lowered.contains("etkinlik var mı")
        || (lowered.contains("yarın") && lowered.contains("var mı"));
    if context.contains_key("calendar") && asks_for_events {
        if lowered.contains("yarın") {
            let tomorrow = context
                .get("tomorrow_events")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();
            if tomorrow.is_empty() {
                return Some("Yarın herhangi bir etkinliğiniz bulunmuyor.".to_string());
            }
            let lines: Vec<String> = tomorrow
                .iter()
                .map(|e| format!("• {} - {}", field_or(e, "title", ""), event_clock(e, "%H:%M")))
                .collect();
            return Some(format!("Yarın şu etkinlikleriniz var:\n{}", lines.join("\n")));
        }

        let events = context
            .get("calendar")
            .and_then(|c| c.get("events"))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        if events.is_empty() {
            return Some("Şu anda herhangi bir etkinliğiniz bulunmuyor.".to_string());
        }
        let lines: Vec<String> = events
            .iter()
            .take(CALENDAR_ANSWER_LIMIT)
            .map(|e| {
                format!(
                    "• {} - {}",
                    field_or(e, "title", ""),
                    event_clock(e, "%d.%m.%Y %H:%M")
                )
            })
            .collect();
        return Some(format!("Yaklaşan etkinlikleriniz:\n{}", lines.join("\n")));
    }

    if lowered.contains("hava") {
        if let Some(weather) = context.get("weather") {
            return Some(format!(
                "{} için güncel hava durumu:\n🌡️ Sıcaklık: {}°C\n☁️ Durum: {}\n💧 Nem: {}%",
                field_or(weather, "city", ""),
                number_or_empty(weather.get("temperature")),
                field_or(weather, "condition", ""),
                number_or_empty(weather.get("humidity")),
            ));
        }
    }

    match intent {
        Intent::Note => Some(
            "Not almak istediğinizi anlıyorum. Not başlığını ve içeriğini belirtir misiniz?"
                .to_string(),
        ),
        Intent::Reminder => Some(
            "Hatırlatıcı kurmak istiyorsunuz. Hangi tarih ve saatte size hatırlatmamı istiyorsunuz?"
                .to_string(),
        ),
        Intent::Calendar => Some(
            "Takvim etkinliği oluşturmak istiyorsunuz. Etkinlik başlığını, tarihini ve saatini belirtir misiniz? Örnek: 'Yarın saat 14:00'da toplantı kur'"
                .to_string(),
        ),
        Intent::Weather => Some(match &entities.location {
            Some(location) if !location.is_empty() => {
                format!("{} için hava durumu bilgisini getiriyorum...", location)
            }
            _ => "Hangi şehir için hava durumu bilgisi istiyorsunuz?".to_string(),
        }),
        Intent::Chat => None,
    }
}

fn field_or<'a>(value: &'a serde_json::Value, key: &str, default: &'a str) -> &'a str {
    value.get(key).and_then(|v| v.as_str()).unwrap_or(default)
}

fn event_clock(event: &serde_json::Value, format: &str) -> String {
    event
        .get("datetime")
        .and_then(|v| v.as_str())
        .and_then(parse_iso)
        .map(|t| t.format(format).to_string())
        .unwrap_or_default()
}

fn number_or_empty(value: Option<&serde_json::Value>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------
// History and diagnostics
// ---------------------------------------------------------------

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let limit = query.limit.unwrap_or(50);
    match state.store.chat_history(&user_id, limit) {
        Ok(messages) => (
            StatusCode::OK,
            Json(json!({
                "user_id": user_id,
                "count": messages.len(),
                "messages": messages,
            })),
        ),
        Err(err) => internal_error(&err, "Chat geçmişi getirilirken hata oluştu"),
    }
}

async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.delete_chat_history(&user_id) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "message": "Chat geçmişi başarıyla silindi",
                "user_id": user_id,
            })),
        ),
        Err(err) => internal_error(&err, "Chat geçmişi silinirken hata oluştu"),
    }
}

/// Expose the classifier directly so the client can show what a message
/// would trigger without running the side effects.
async fn analyze_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let now = Local::now().naive_local();
    let analysis = state.classifier.classify(&req.message).await;
    let entities = analysis
        .entities
        .clone()
        .merged_with(extract_entities(&req.message, analysis.intent, now));

    (
        StatusCode::OK,
        Json(json!({
            "message": req.message,
            "intent_analysis": {
                "intent": analysis.intent,
                "confidence": analysis.confidence,
                "entities": entities,
            },
            "timestamp": now_iso(),
        })),
    )
}

async fn chat_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let test_response = state.gemini.generate_response("Merhaba", None).await;
    let gemini_status = if state.gemini.is_configured() {
        "active"
    } else {
        "inactive"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "gemini_service": gemini_status,
            "store": "active",
            "test_response": preview(&test_response, 50),
        })),
    )
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn event_confirmation_formats_the_scheduled_time() {
        let context = ctx(json!({
            "event_created": {
                "id": "ev-1",
                "title": "Takım Toplantısı",
                "datetime": "2026-06-10T14:00:00",
            }
        }));
        let reply = smart_reply("toplantı kur", Intent::Calendar, &EntityBag::default(), &context)
            .unwrap();
        assert!(reply.contains("📅 Etkinliğiniz başarıyla oluşturuldu!"));
        assert!(reply.contains("🎯 Başlık: Takım Toplantısı"));
        assert!(reply.contains("⏰ Tarih/Saat: 10.06.2026 14:00"));
        assert!(reply.contains("🆔 Etkinlik ID: ev-1"));
    }

    #[test]
    fn event_confirmation_without_time_says_so() {
        let context = ctx(json!({
            "event_created": { "id": "ev-2", "title": "Plan", "datetime": "" }
        }));
        let reply =
            smart_reply("etkinlik", Intent::Calendar, &EntityBag::default(), &context).unwrap();
        assert!(reply.contains("⏰ Tarih/Saat: Belirtilmemiş"));
    }

    #[test]
    fn note_confirmation_uses_title_and_id() {
        let context = ctx(json!({
            "note_saved": { "id": "nt-7", "title": "Market Listesi", "content": "süt" }
        }));
        let reply = smart_reply("not al", Intent::Note, &EntityBag::default(), &context).unwrap();
        assert_eq!(
            reply,
            "✅ Notunuz başarıyla kaydedildi!\n📝 Başlık: Market Listesi\n🆔 Not ID: nt-7"
        );
    }

    #[test]
    fn tomorrow_question_lists_tomorrow_events_with_clock_times() {
        let context = ctx(json!({
            "calendar": { "events": [], "count": 0 },
            "tomorrow_events": [
                { "id": "a", "title": "Standup", "datetime": "2026-06-11T09:30:00" },
            ],
        }));
        let reply = smart_reply(
            "yarın toplantı var mı",
            Intent::Calendar,
            &EntityBag::default(),
            &context,
        )
        .unwrap();
        assert_eq!(reply, "Yarın şu etkinlikleriniz var:\n• Standup - 09:30");
    }

    #[test]
    fn tomorrow_question_with_no_events_says_none() {
        let context = ctx(json!({
            "calendar": { "events": [{ "title": "X", "datetime": "2026-06-20T10:00:00" }], "count": 1 },
            "tomorrow_events": [],
        }));
        let reply = smart_reply(
            "yarın etkinlik var mı",
            Intent::Calendar,
            &EntityBag::default(),
            &context,
        )
        .unwrap();
        assert_eq!(reply, "Yarın herhangi bir etkinliğiniz bulunmuyor.");
    }

    #[test]
    fn upcoming_question_lists_at_most_five_events() {
        let events: Vec<serde_json::Value> = (0..7)
            .map(|i| {
                json!({
                    "id": format!("e{}", i),
                    "title": format!("Etkinlik {}", i),
                    "datetime": format!("2026-06-1{}T10:00:00", i),
                })
            })
            .collect();
        let context = ctx(json!({ "calendar": { "events": events, "count": 7 } }));
        let reply = smart_reply(
            "toplantı var mı",
            Intent::Calendar,
            &EntityBag::default(),
            &context,
        )
        .unwrap();
        assert!(reply.starts_with("Yaklaşan etkinlikleriniz:\n"));
        assert_eq!(reply.matches('•').count(), 5);
        assert!(reply.contains("• Etkinlik 0 - 10.06.2026 10:00"));
        assert!(!reply.contains("Etkinlik 5"));
    }

    #[test]
    fn weather_question_reads_the_gathered_report() {
        let context = ctx(json!({
            "weather": {
                "city": "Ankara",
                "temperature": 21.5,
                "condition": "açık",
                "humidity": 40,
            }
        }));
        let reply = smart_reply(
            "ankara'da hava nasıl",
            Intent::Weather,
            &EntityBag::default(),
            &context,
        )
        .unwrap();
        assert_eq!(
            reply,
            "Ankara için güncel hava durumu:\n🌡️ Sıcaklık: 21.5°C\n☁️ Durum: açık\n💧 Nem: 40%"
        );
    }

    #[test]
    fn weather_intent_without_report_asks_or_promises_by_location() {
        let with_city = EntityBag {
            location: Some("İzmir".to_string()),
            ..EntityBag::default()
        };
        assert_eq!(
            smart_reply("izmir sıcak mı", Intent::Weather, &with_city, &serde_json::Map::new()),
            Some("İzmir için hava durumu bilgisini getiriyorum...".to_string())
        );
        assert_eq!(
            smart_reply("hava", Intent::Weather, &EntityBag::default(), &serde_json::Map::new()),
            Some("Hangi şehir için hava durumu bilgisi istiyorsunuz?".to_string())
        );
    }

    #[test]
    fn note_and_reminder_intents_ask_for_details() {
        let reply = smart_reply("not", Intent::Note, &EntityBag::default(), &serde_json::Map::new())
            .unwrap();
        assert!(reply.starts_with("Not almak istediğinizi anlıyorum."));
        let reply = smart_reply(
            "hatırlat",
            Intent::Reminder,
            &EntityBag::default(),
            &serde_json::Map::new(),
        )
        .unwrap();
        assert!(reply.starts_with("Hatırlatıcı kurmak istiyorsunuz."));
    }

    #[test]
    fn plain_chat_defers_to_the_model() {
        assert_eq!(
            smart_reply("merhaba", Intent::Chat, &EntityBag::default(), &serde_json::Map::new()),
            None
        );
    }

    #[test]
    fn preview_truncates_only_past_the_limit() {
        assert_eq!(preview("kısa", 50), "kısa");
        let long = "a".repeat(60);
        let cut = preview(&long, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
    }
}
