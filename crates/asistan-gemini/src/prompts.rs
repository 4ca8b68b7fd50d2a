//! Prompt construction for the generative collaborator.

use chrono::{Duration, NaiveDate};

/// Persona and ground rules sent ahead of every conversational exchange.
const SYSTEM_PROMPT: &str = "\
Sen Türkçe konuşan, yardımsever bir kişisel asistansın. Adın \"Asistan\".

Görevlerin:
1. Kullanıcıların sorularını Türkçe olarak yanıtlamak
2. Günlük görevlerde yardım etmek
3. Not alma, hatırlatıcı kurma, takvim etkinlikleri konularında rehberlik etmek
4. Hava durumu bilgisi sağlamak
5. Genel bilgi ve sohbet desteği sunmak

Özellikler:
- Her zaman kibar ve yardımsever ol
- Türkçe dilbilgisi kurallarına uy
- Kısa ve net yanıtlar ver
- Eğer bir şeyi bilmiyorsan, bilmediğini söyle
- Kullanıcının taleplerini anlamaya çalış ve uygun önerilerde bulun

Önemli: Sadece güvenli ve yararlı bilgiler paylaş.";

/// Full prompt for a conversational reply. `context` carries serialized
/// calendar/weather lookups gathered by the chat pipeline.
pub fn chat_prompt(message: &str, context: Option<&str>) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\n");
    if let Some(context) = context {
        prompt.push_str(&format!("Bağlam bilgileri: {}\n\n", context));
    }
    prompt.push_str(&format!("Kullanıcı: {}\nAsistan:", message));
    prompt
}

/// Constrained classification prompt. The event example date is derived
/// from `today` so the model never anchors on a stale year.
pub fn intent_prompt(message: &str, today: NaiveDate) -> String {
    let sample_date = (today + Duration::days(5)).format("%d/%m/%Y");
    format!(
        "Aşağıdaki kullanıcı mesajını analiz et ve amacını belirle:\n\
         \n\
         Mesaj: \"{message}\"\n\
         \n\
         Lütfen şu formatda JSON yanıtı ver:\n\
         {{\n\
             \"intent\": \"chat|note|reminder|calendar|weather\",\n\
             \"confidence\": 0.0-1.0,\n\
             \"entities\": {{\n\
                 \"title\": \"başlık varsa\",\n\
                 \"datetime\": \"tarih/saat varsa\",\n\
                 \"location\": \"konum varsa\"\n\
             }}\n\
         }}\n\
         \n\
         Intent türleri:\n\
         - chat: Genel sohbet\n\
         - note: Not alma (örnekler: \"not al\", \"kaydet\", \"not olarak kaydet\", \"bunu not et\")\n\
         - reminder: Hatırlatıcı kurma\n\
         - calendar: Takvim etkinliği (örnekler: \"etkinlik oluştur\", \"toplantı kur\", \"randevu al\")\n\
         - weather: Hava durumu\n\
         \n\
         Not alma örnekleri:\n\
         - \"Bunu not olarak kaydet\"\n\
         - \"Not al: toplantı yarın\"\n\
         - \"Kaydet: market listesi\"\n\
         - \"Bunu not et\"\n\
         - \"not olarak ekle\"\n\
         - \"Test notu not olarak ekle\"\n\
         - \"Market listesi not ekle\"\n\
         - \"Toplantı notları not olarak ekle\"\n\
         \n\
         Etkinlik oluşturma örnekleri:\n\
         - \"Yarın saat 10:00'da toplantı kur\"\n\
         - \"Etkinlik oluştur: Proje sunumu {sample_date} 14:00\"\n\
         - \"Bugün 16:00'da randevu al\"\n\
         - \"Toplantı: Müşteri görüşmesi yarın\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_prompt_wraps_the_message() {
        let prompt = chat_prompt("selam", None);
        assert!(prompt.starts_with("Sen Türkçe konuşan"));
        assert!(prompt.ends_with("Kullanıcı: selam\nAsistan:"));
        assert!(!prompt.contains("Bağlam bilgileri"));
    }

    #[test]
    fn chat_prompt_injects_context_block() {
        let prompt = chat_prompt("selam", Some("{\"weather\":{\"city\":\"İzmir\"}}"));
        assert!(prompt.contains("Bağlam bilgileri: {\"weather\":{\"city\":\"İzmir\"}}"));
    }

    #[test]
    fn intent_prompt_derives_example_date_from_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let prompt = intent_prompt("selam", today);
        assert!(prompt.contains("Proje sunumu 06/03/2026 14:00"));
        assert!(!prompt.contains("2025"));
        assert!(prompt.contains("Mesaj: \"selam\""));
    }
}
