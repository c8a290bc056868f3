use std::fmt::Write;

use crate::plan::UserProfile;

use super::Answers;

fn or_none(s: &str) -> &str {
    let s = s.trim();
    if s.is_empty() {
        "Yok"
    } else {
        s
    }
}

/// First call: decide whether to ask 2-3 follow-up questions or plan directly.
pub fn analysis_prompt(p: &UserProfile) -> String {
    let restrictions = p
        .restrictions
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Bir kullanıcı kişisel diyet planı istiyor. Aşağıdaki bilgileri incele.\n\
         Planı iyileştirmek için ek bilgiye ihtiyacın varsa (bütçe, mutfak ekipmanı, çalışma saatleri gibi) \
         en fazla 2-3 kısa soru sor ve \"questions\" tipinde yanıt ver.\n\
         Bilgiler yeterliyse doğrudan \"plan\" tipinde 7 günlük eksiksiz bir plan oluştur.\n\n\
         Kullanıcı bilgileri:\n\
         - Yaş: {age}, Cinsiyet: {gender}\n\
         - Kilo: {weight} kg, Boy: {height} cm\n\
         - Hedef: {goal}, Aktivite düzeyi: {activity}\n\
         - Kısıtlamalar: {restrictions}\n\
         - Alerjiler: {allergies}\n\
         - Sevilmeyen yiyecekler: {disliked}\n\
         - Sağlık durumu: {medical}\n\
         - Özel istekler: {notes}\n\n\
         Yanıt yalnızca JSON olmalı ve \"type\" alanı (\"questions\" ya da \"plan\") içermeli.",
        age = p.age,
        gender = p.gender.as_str(),
        weight = p.weight,
        height = p.height,
        goal = p.goal.as_str(),
        activity = p.activity_level.as_str(),
        restrictions = or_none(&restrictions),
        allergies = or_none(&p.allergies),
        disliked = or_none(&p.disliked_foods),
        medical = or_none(&p.medical_conditions),
        notes = or_none(&p.extra_notes),
    )
}

/// Second call: profile plus the answers to the clarifying questions.
pub fn final_plan_prompt(p: &UserProfile, answers: &Answers) -> String {
    let profile_json = serde_json::to_string(p).unwrap_or_default();
    let mut qa = String::new();
    for (question, answer) in answers {
        let _ = writeln!(qa, "Soru: {question}\nCevap: {answer}");
    }
    format!(
        "Kullanıcının temel bilgileri ve ek sorulara verdiği yanıtlar aşağıda.\n\
         Profesyonel, esnek ve ayrıntılı 7 günlük bir diyet planı hazırla.\n\
         Her öğün için benzersiz bir id (ör. gun1-kahvalti), hazırlık süresi, porsiyon bilgisi, \
         liste halinde malzemeler (\"2 adet yumurta\", \"100 g tavuk\" biçiminde) ve 1-2 alternatif ver.\n\n\
         Kullanıcının şu notunu özellikle dikkate al: \"{notes}\"\n\n\
         Temel bilgiler: {profile_json}\n\
         Ek yanıtlar:\n{qa}\n\
         Yanıt dili Türkçe olmalı.",
        notes = or_none(&p.extra_notes),
    )
}
